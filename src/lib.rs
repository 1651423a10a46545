//! Recall: an adaptive review scheduler for spaced-repetition study.
//!
//! - [`flashcards`] schedules cards with SM-2 and owns their records
//! - [`study`] tracks one pass over a queue of cards
//! - [`knowledge`] derives topic mastery from card review history
//!
//! Nothing here reads the system clock; every operation that depends on time
//! takes it as an argument.

pub mod config;
pub mod deck;
pub mod flashcards;
pub mod knowledge;
pub mod study;

pub use config::{StrengthConfig, StudyConfig};
pub use deck::DeckSnapshot;
pub use flashcards::{Card, CardError, CardManager};
pub use knowledge::{KnowledgeGraph, KnowledgeNode};
pub use study::{StudyError, StudySession, StudySessionTracker};
