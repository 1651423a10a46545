//! Data models for the flashcard system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::algorithm::{ReviewResult, INITIAL_EASE_FACTOR, INITIAL_INTERVAL};

/// How hard the author judged a card to be.
///
/// Informational only: the scheduling formula never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// Where a card sits in the review lifecycle, derived from its schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardStatus {
    /// Never reviewed
    New,
    /// One successful review since the last reset
    Learning,
    /// Regular spaced review
    Review,
    /// Failed and re-learning
    Relearning,
}

impl CardStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Review => "review",
            Self::Relearning => "relearning",
        }
    }
}

/// The three fields the scheduler reads and replaces on every review
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingState {
    /// Consecutive successful reviews since the last lapse
    pub repetitions: u32,
    /// SM-2 ease factor, never below 1.3
    pub ease_factor: f64,
    /// Days until the next review, never below 1
    pub interval: u32,
}

impl Default for SchedulingState {
    fn default() -> Self {
        Self {
            repetitions: 0,
            ease_factor: INITIAL_EASE_FACTOR,
            interval: INITIAL_INTERVAL,
        }
    }
}

/// A reviewable unit of knowledge with its spaced repetition state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub repetitions: u32,
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_review: Option<DateTime<Utc>>,
}

fn default_ease_factor() -> f64 {
    INITIAL_EASE_FACTOR
}

fn default_interval() -> u32 {
    INITIAL_INTERVAL
}

impl Card {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), question, answer)
    }

    pub fn with_id(id: Uuid, question: impl Into<String>, answer: impl Into<String>) -> Self {
        let state = SchedulingState::default();
        Self {
            id,
            question: question.into(),
            answer: answer.into(),
            category: String::new(),
            difficulty: Difficulty::default(),
            repetitions: state.repetitions,
            ease_factor: state.ease_factor,
            interval: state.interval,
            last_reviewed: None,
            next_review: None,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn scheduling_state(&self) -> SchedulingState {
        SchedulingState {
            repetitions: self.repetitions,
            ease_factor: self.ease_factor,
            interval: self.interval,
        }
    }

    /// Produce the record that results from a review, leaving `self` untouched
    pub fn reviewed(&self, result: &ReviewResult) -> Self {
        Self {
            repetitions: result.repetitions,
            ease_factor: result.ease_factor,
            interval: result.interval,
            last_reviewed: Some(result.last_reviewed),
            next_review: Some(result.next_review),
            ..self.clone()
        }
    }

    /// Never-reviewed cards are always due
    pub fn is_due(&self, as_of: DateTime<Utc>) -> bool {
        self.next_review.map_or(true, |next| next <= as_of)
    }

    pub fn status(&self) -> CardStatus {
        if self.last_reviewed.is_none() {
            return CardStatus::New;
        }
        match self.repetitions {
            0 => CardStatus::Relearning,
            1 => CardStatus::Learning,
            _ => CardStatus::Review,
        }
    }
}

/// A record of a single review, kept so reviews can be listed and undone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub card_id: Uuid,
    /// Quality rating after clamping into 0..=5
    pub quality: u8,
    pub reviewed_at: DateTime<Utc>,
    /// The card as it was before this review
    pub previous: Card,
    /// Scheduling state the review produced
    pub result: SchedulingState,
}

impl ReviewRecord {
    pub fn was_correct(&self) -> bool {
        self.quality >= super::algorithm::PASSING_QUALITY
    }
}

/// Statistics over the cards held by a manager
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_cards: usize,
    pub new_cards: usize,
    pub learning_cards: usize,
    pub review_cards: usize,
    pub due_cards: usize,
    pub reviews_today: usize,
    pub correct_today: usize,
}
