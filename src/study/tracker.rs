//! Study session tracking
//!
//! A [`StudySessionTracker`] walks a fixed queue of card ids once. After the
//! last card is answered it stays current, so its answer can still be shown,
//! and the session reports itself complete. Completion is polled through
//! [`StudySessionTracker::is_complete`]; nothing is pushed to the caller.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::models::{SessionState, StudySession};
use crate::flashcards::algorithm::{clamp_quality, PASSING_QUALITY};
use crate::flashcards::{Card, CardError, CardManager};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StudyError {
    #[error("Study session is already complete")]
    SessionComplete,

    #[error(transparent)]
    Card(#[from] CardError),
}

pub type Result<T> = std::result::Result<T, StudyError>;

#[derive(Debug, Clone)]
pub struct StudySessionTracker {
    queue: Vec<Uuid>,
    cursor: usize,
    /// Set once the card at the last position has been answered
    last_answered: bool,
    session: StudySession,
}

impl StudySessionTracker {
    /// Start a session over `queue`, which stays fixed for its lifetime
    pub fn new(queue: Vec<Uuid>, start_time: DateTime<Utc>) -> Self {
        Self::from_session(queue, StudySession::new(start_time))
    }

    fn from_session(queue: Vec<Uuid>, session: StudySession) -> Self {
        // An empty queue has nothing left to answer
        let session = if queue.is_empty() {
            session.finished(session.start_time)
        } else {
            session
        };
        Self {
            queue,
            cursor: 0,
            last_answered: false,
            session,
        }
    }

    pub fn queue(&self) -> &[Uuid] {
        &self.queue
    }

    /// The current session record
    pub fn session(&self) -> &StudySession {
        &self.session
    }

    /// The card being shown. The last card stays current after it is answered.
    pub fn current_card(&self) -> Option<Uuid> {
        self.queue.get(self.cursor).copied()
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Cards not yet answered
    pub fn remaining(&self) -> usize {
        self.queue.len() - self.session.cards_studied as usize
    }

    pub fn is_complete(&self) -> bool {
        self.queue.is_empty() || (self.cursor + 1 == self.queue.len() && self.last_answered)
    }

    pub fn state(&self) -> SessionState {
        if self.is_complete() {
            SessionState::Complete
        } else {
            SessionState::Active
        }
    }

    pub fn accuracy(&self) -> Option<f64> {
        self.session.accuracy()
    }

    /// Count an answer for the current card and move to the next one.
    ///
    /// Answering the last card ends the session at `now`.
    pub fn respond(&mut self, correct: bool, now: DateTime<Utc>) -> Result<&StudySession> {
        if self.is_complete() {
            return Err(StudyError::SessionComplete);
        }

        self.session = self.session.answered(correct);
        if self.cursor + 1 < self.queue.len() {
            self.cursor += 1;
        } else {
            self.last_answered = true;
            self.session = self.session.finished(now);
            log::info!(
                "Study session {} complete: {} correct, {} incorrect",
                self.session.id,
                self.session.correct_answers,
                self.session.incorrect_answers
            );
        }

        debug_assert_eq!(
            self.session.cards_studied,
            self.session.correct_answers + self.session.incorrect_answers
        );
        debug_assert!(self.session.cards_studied as usize <= self.queue.len());
        Ok(&self.session)
    }

    /// Rate the current card: record the review with `cards`, then count it
    /// as correct when the quality passes.
    ///
    /// If the review cannot be recorded the session is left unchanged.
    pub fn grade(&mut self, cards: &mut CardManager, quality: i32, now: DateTime<Utc>) -> Result<Card> {
        let card_id = match self.current_card() {
            Some(id) if !self.is_complete() => id,
            _ => return Err(StudyError::SessionComplete),
        };

        let card = cards.record_review(card_id, quality, now)?;
        self.respond(clamp_quality(quality) >= PASSING_QUALITY, now)?;
        Ok(card)
    }

    /// Start over on the same queue with zeroed counters
    pub fn reset(&mut self) {
        let session = StudySession::with_id(self.session.id, self.session.start_time);
        *self = Self::from_session(std::mem::take(&mut self.queue), session);
    }
}
