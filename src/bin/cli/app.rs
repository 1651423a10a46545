use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};

use recall_lib::flashcards::{Card, CardManager};
use recall_lib::knowledge::KnowledgeGraph;
use recall_lib::{DeckSnapshot, StudyConfig};

/// Shared application state for CLI commands
pub struct App {
    pub deck_path: PathBuf,
    pub config: StudyConfig,
    pub cards: CardManager,
    pub graph: KnowledgeGraph,
}

impl App {
    /// Load the deck file and, when given, the study config
    pub fn new(deck_path: PathBuf, config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => StudyConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => StudyConfig::default(),
        };

        let snapshot = DeckSnapshot::load(&deck_path)
            .with_context(|| format!("Failed to read deck {}", deck_path.display()))?;
        let (cards, graph) = snapshot
            .into_parts(config.strength)
            .context("Deck file is inconsistent")?;

        Ok(Self {
            deck_path,
            config,
            cards,
            graph,
        })
    }

    /// The only clock read in the program
    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    pub fn save(&self) -> Result<()> {
        DeckSnapshot::capture(&self.cards, &self.graph)
            .save(&self.deck_path)
            .with_context(|| format!("Failed to write deck {}", self.deck_path.display()))
    }

    /// Find a card by full id or unique id prefix
    pub fn find_card(&self, key: &str) -> Result<&Card> {
        let key = key.to_lowercase();

        // Exact match first
        if let Some(card) = self.cards.cards().iter().find(|c| c.id.to_string() == key) {
            return Ok(card);
        }

        // Prefix match
        let matches: Vec<&Card> = self
            .cards
            .cards()
            .iter()
            .filter(|c| c.id.to_string().starts_with(&key))
            .collect();

        match matches.len() {
            0 => bail!("No card matching '{}'", key),
            1 => Ok(matches[0]),
            _ => bail!(
                "Ambiguous card id '{}'. Matches:\n{}",
                key,
                matches
                    .iter()
                    .map(|c| format!("  - {} {}", c.id, c.question))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }
}
