//! Flashcard scheduling for Recall
//!
//! This module provides:
//! - Card records with their spaced repetition state
//! - SM-2 spaced repetition algorithm
//! - Card lifecycle management (due queries, reviews, undo)

pub mod algorithm;
pub mod manager;
pub mod models;

pub use algorithm::{schedule, ReviewResult};
pub use manager::{CardError, CardManager, SharedCardManager};
pub use models::*;
