//! Knowledge graph module
//!
//! Topics linked to the cards that test them, with a mastery strength read
//! from those cards' review history.

pub mod models;
pub mod strength;

pub use models::*;
pub use strength::{card_strength, KnowledgeError, KnowledgeGraph};
