//! Study session data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a session still accepts responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    Active,
    Complete,
}

/// Statistics for one study pass.
///
/// `cards_studied == correct_answers + incorrect_answers` for every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub cards_studied: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
}

impl StudySession {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::new_v4(), start_time)
    }

    pub fn with_id(id: Uuid, start_time: DateTime<Utc>) -> Self {
        Self {
            id,
            start_time,
            end_time: None,
            cards_studied: 0,
            correct_answers: 0,
            incorrect_answers: 0,
        }
    }

    /// The record after one more answer
    pub(crate) fn answered(&self, correct: bool) -> Self {
        let (correct_answers, incorrect_answers) = if correct {
            (self.correct_answers + 1, self.incorrect_answers)
        } else {
            (self.correct_answers, self.incorrect_answers + 1)
        };
        Self {
            cards_studied: self.cards_studied + 1,
            correct_answers,
            incorrect_answers,
            ..self.clone()
        }
    }

    pub(crate) fn finished(&self, end_time: DateTime<Utc>) -> Self {
        Self {
            end_time: Some(end_time),
            ..self.clone()
        }
    }

    pub fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }

    /// Share of answers that were correct, if anything was answered
    pub fn accuracy(&self) -> Option<f64> {
        (self.cards_studied > 0)
            .then(|| f64::from(self.correct_answers) / f64::from(self.cards_studied))
    }
}
