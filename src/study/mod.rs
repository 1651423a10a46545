//! Study session module

pub mod models;
pub mod tracker;

pub use models::*;
pub use tracker::{StudyError, StudySessionTracker};
