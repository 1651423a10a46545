//! Deck snapshot files
//!
//! A deck file is a single pretty-printed JSON document holding the plain
//! records the core works on:
//! ```text
//! {
//!   "cards":   [ Card, ... ],
//!   "reviews": [ ReviewRecord, ... ],
//!   "nodes":   [ KnowledgeNode, ... ],
//!   "links":   [ KnowledgeLink, ... ]
//! }
//! ```
//! Only the CLI reads and writes these; the scheduler itself never touches
//! the filesystem.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::StrengthConfig;
use crate::flashcards::{Card, CardError, CardManager, ReviewRecord};
use crate::knowledge::{KnowledgeError, KnowledgeGraph, KnowledgeLink, KnowledgeNode};

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Card(#[from] CardError),

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
}

pub type Result<T> = std::result::Result<T, DeckError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSnapshot {
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub reviews: Vec<ReviewRecord>,
    #[serde(default)]
    pub nodes: Vec<KnowledgeNode>,
    #[serde(default)]
    pub links: Vec<KnowledgeLink>,
}

impl DeckSnapshot {
    /// Read a deck file. A missing file is an empty deck.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let deck: Self = serde_json::from_str(&content)?;
        log::info!(
            "Loaded {} cards and {} nodes from {:?}",
            deck.cards.len(),
            deck.nodes.len(),
            path
        );
        Ok(deck)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Saved {} cards to {:?}", self.cards.len(), path);
        Ok(())
    }

    /// Capture the current records of a manager and graph
    pub fn capture(cards: &CardManager, graph: &KnowledgeGraph) -> Self {
        Self {
            cards: cards.cards().to_vec(),
            reviews: cards.reviews().to_vec(),
            nodes: graph.nodes().to_vec(),
            links: graph.links().to_vec(),
        }
    }

    /// Rebuild the manager and graph, checking ids on the way
    pub fn into_parts(self, strength: StrengthConfig) -> Result<(CardManager, KnowledgeGraph)> {
        let cards = CardManager::with_history(self.cards, self.reviews)?;
        let graph = KnowledgeGraph::from_parts(self.nodes, self.links, strength)?;
        Ok((cards, graph))
    }
}
