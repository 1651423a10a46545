//! Card lifecycle management
//!
//! [`CardManager`] owns the authoritative card records. It is the only place
//! card scheduling state is replaced, and every replacement goes through
//! [`schedule`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::algorithm::{clamp_quality, schedule, MIN_EASE_FACTOR};
use super::models::*;
use crate::config::StudyConfig;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    #[error("Card not found: {0}")]
    NotFound(Uuid),

    #[error("Card already exists: {0}")]
    DuplicateId(Uuid),

    #[error("Card {id} has invalid scheduling state: {reason}")]
    InvalidState { id: Uuid, reason: String },
}

pub type Result<T> = std::result::Result<T, CardError>;

/// A manager shared between threads. Reviews take the write lock, so
/// read-modify-write cycles on a card never interleave.
pub type SharedCardManager = Arc<RwLock<CardManager>>;

/// Owns the current record of every card and the log of reviews applied to them
#[derive(Debug, Clone, Default)]
pub struct CardManager {
    /// Cards in insertion order
    cards: Vec<Card>,
    /// Card id -> position in `cards`
    index: HashMap<Uuid, usize>,
    reviews: Vec<ReviewRecord>,
}

impl CardManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a manager from existing card records
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Result<Self> {
        let mut manager = Self::new();
        for card in cards {
            manager.insert(card)?;
        }
        Ok(manager)
    }

    /// Build a manager from card records and a previously recorded review log
    pub fn with_history(
        cards: impl IntoIterator<Item = Card>,
        reviews: Vec<ReviewRecord>,
    ) -> Result<Self> {
        let mut manager = Self::from_cards(cards)?;
        if let Some(orphan) = reviews.iter().find(|r| !manager.index.contains_key(&r.card_id)) {
            return Err(CardError::NotFound(orphan.card_id));
        }
        for review in &reviews {
            check_card_state(&review.previous)?;
        }
        manager.reviews = reviews;
        Ok(manager)
    }

    pub fn into_parts(self) -> (Vec<Card>, Vec<ReviewRecord>) {
        (self.cards, self.reviews)
    }

    /// Add a card authored elsewhere. Records with impossible scheduling
    /// state are rejected.
    pub fn insert(&mut self, card: Card) -> Result<()> {
        if self.index.contains_key(&card.id) {
            return Err(CardError::DuplicateId(card.id));
        }
        check_card_state(&card)?;

        self.index.insert(card.id, self.cards.len());
        self.cards.push(card);
        Ok(())
    }

    pub fn get(&self, card_id: Uuid) -> Result<&Card> {
        self.index
            .get(&card_id)
            .map(|&pos| &self.cards[pos])
            .ok_or(CardError::NotFound(card_id))
    }

    pub fn contains(&self, card_id: Uuid) -> bool {
        self.index.contains_key(&card_id)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    // ==================== Review Operations ====================

    /// Get all cards due as of `as_of`.
    ///
    /// Ordered by next review date, with never-reviewed cards first. Cards
    /// sharing a date keep insertion order.
    pub fn get_due_cards(&self, as_of: DateTime<Utc>) -> Vec<Card> {
        let mut due: Vec<Card> = self
            .cards
            .iter()
            .filter(|card| card.is_due(as_of))
            .cloned()
            .collect();

        // Option orders None before Some
        due.sort_by(|a, b| a.next_review.cmp(&b.next_review));
        due
    }

    /// Submit a review for a card and return its new record.
    ///
    /// Out-of-range quality ratings are clamped. Nothing is changed when the
    /// card is unknown.
    pub fn record_review(&mut self, card_id: Uuid, quality: i32, now: DateTime<Utc>) -> Result<Card> {
        let pos = *self.index.get(&card_id).ok_or(CardError::NotFound(card_id))?;

        let clamped = clamp_quality(quality);
        if i32::from(clamped) != quality {
            log::warn!(
                "Quality {} for card {} is outside 0-5, using {}",
                quality,
                card_id,
                clamped
            );
        }

        let previous = &self.cards[pos];
        let result = schedule(&previous.scheduling_state(), i32::from(clamped), now);
        let updated = previous.reviewed(&result);
        assert_card_invariants(&updated);

        log::debug!(
            "Reviewed card {} with quality {}: repetitions={}, ease={:.2}, interval={}d",
            card_id,
            clamped,
            updated.repetitions,
            updated.ease_factor,
            updated.interval
        );

        self.reviews.push(ReviewRecord {
            card_id,
            quality: clamped,
            reviewed_at: now,
            previous: previous.clone(),
            result: result.state(),
        });
        self.cards[pos] = updated.clone();

        Ok(updated)
    }

    /// Revert the most recent review, returning the restored card record
    pub fn undo_last_review(&mut self) -> Option<Card> {
        let record = self.reviews.pop()?;
        let pos = self.index[&record.card_id];
        self.cards[pos] = record.previous.clone();

        log::debug!("Undid review of card {} from {}", record.card_id, record.reviewed_at);
        Some(record.previous)
    }

    /// All reviews of one card, oldest first
    pub fn history(&self, card_id: Uuid) -> Result<Vec<&ReviewRecord>> {
        if !self.contains(card_id) {
            return Err(CardError::NotFound(card_id));
        }
        Ok(self.reviews.iter().filter(|r| r.card_id == card_id).collect())
    }

    pub fn reviews(&self) -> &[ReviewRecord] {
        &self.reviews
    }

    /// Get review statistics as of a point in time.
    ///
    /// "Today" is the UTC calendar day containing `as_of`.
    pub fn review_stats(&self, as_of: DateTime<Utc>) -> ReviewStats {
        let mut stats = ReviewStats {
            total_cards: self.cards.len(),
            ..ReviewStats::default()
        };

        for card in &self.cards {
            match card.status() {
                CardStatus::New => stats.new_cards += 1,
                CardStatus::Learning => stats.learning_cards += 1,
                CardStatus::Review | CardStatus::Relearning => stats.review_cards += 1,
            }

            if card.is_due(as_of) {
                stats.due_cards += 1;
            }
        }

        let today = as_of.date_naive();
        for review in self.reviews.iter().filter(|r| r.reviewed_at.date_naive() == today) {
            stats.reviews_today += 1;
            if review.was_correct() {
                stats.correct_today += 1;
            }
        }

        stats
    }

    /// Card ids for a study pass: the due cards, capped by the configured
    /// daily limits for new and already-reviewed cards.
    pub fn study_queue(&self, as_of: DateTime<Utc>, config: &StudyConfig) -> Vec<Uuid> {
        let mut new_cards = 0;
        let mut review_cards = 0;

        self.get_due_cards(as_of)
            .into_iter()
            .filter(|card| {
                let (taken, limit) = if card.status() == CardStatus::New {
                    (&mut new_cards, config.new_cards_per_day)
                } else {
                    (&mut review_cards, config.reviews_per_day)
                };
                if *taken < limit {
                    *taken += 1;
                    true
                } else {
                    false
                }
            })
            .map(|card| card.id)
            .collect()
    }
}

/// Validate a record that came from outside the manager
fn check_card_state(card: &Card) -> Result<()> {
    let invalid = |reason: String| CardError::InvalidState {
        id: card.id,
        reason,
    };

    if !card.ease_factor.is_finite() || card.ease_factor < MIN_EASE_FACTOR {
        return Err(invalid(format!(
            "ease factor {} below {}",
            card.ease_factor, MIN_EASE_FACTOR
        )));
    }
    if card.interval < 1 {
        return Err(invalid("interval must be at least one day".to_string()));
    }
    if card.last_reviewed.is_some() != card.next_review.is_some() {
        return Err(invalid(
            "last and next review dates must be set together".to_string(),
        ));
    }
    if let (Some(last), Some(next)) = (card.last_reviewed, card.next_review) {
        if next < last {
            return Err(invalid("next review precedes last review".to_string()));
        }
    }
    Ok(())
}

/// Broken invariants after a review mean a bug in the scheduler.
fn assert_card_invariants(card: &Card) {
    debug_assert!(
        card.ease_factor >= MIN_EASE_FACTOR,
        "card {} has ease factor {} below {}",
        card.id,
        card.ease_factor,
        MIN_EASE_FACTOR
    );
    debug_assert!(card.interval >= 1, "card {} has zero interval", card.id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const EPSILON: f64 = 1e-9;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
    }

    fn sample_manager() -> (CardManager, Uuid, Uuid) {
        let first = Card::new(
            "What is spaced repetition?",
            "Reviewing material at increasing intervals",
        )
        .category("Learning Techniques")
        .difficulty(Difficulty::Medium);
        let second = Card::new(
            "What is active recall?",
            "Actively stimulating memory during learning",
        )
        .category("Learning Techniques")
        .difficulty(Difficulty::Easy);
        let ids = (first.id, second.id);

        let manager = CardManager::from_cards([first, second]).unwrap();
        (manager, ids.0, ids.1)
    }

    #[test]
    fn test_two_card_scenario() {
        let (mut manager, first, second) = sample_manager();

        let a = manager.record_review(first, 5, at(1, 9)).unwrap();
        assert_eq!(a.repetitions, 1);
        assert_eq!(a.interval, 1);
        assert!((a.ease_factor - 2.6).abs() < EPSILON);

        let b = manager.record_review(second, 2, at(1, 9)).unwrap();
        assert_eq!(b.repetitions, 0);
        assert_eq!(b.interval, 1);
        assert!((b.ease_factor - 2.3).abs() < EPSILON);

        assert_eq!(manager.get(first).unwrap(), &a);
        assert_eq!(manager.get(second).unwrap(), &b);
    }

    #[test]
    fn test_record_review_sets_dates() {
        let (mut manager, first, _) = sample_manager();
        let now = at(3, 12);

        let card = manager.record_review(first, 4, now).unwrap();
        assert_eq!(card.last_reviewed, Some(now));
        assert_eq!(card.next_review, Some(now + Duration::days(1)));
    }

    #[test]
    fn test_record_review_unknown_card() {
        let (mut manager, _, _) = sample_manager();
        let before = manager.cards().to_vec();
        let missing = Uuid::new_v4();

        let err = manager.record_review(missing, 4, at(1, 9)).unwrap_err();
        assert_eq!(err, CardError::NotFound(missing));
        assert_eq!(manager.cards(), before.as_slice());
        assert!(manager.reviews().is_empty());
    }

    #[test]
    fn test_record_review_clamps_quality() {
        let (mut manager, first, _) = sample_manager();

        manager.record_review(first, 11, at(1, 9)).unwrap();
        assert_eq!(manager.reviews()[0].quality, 5);
    }

    #[test]
    fn test_duplicate_card_rejected() {
        let card = Card::new("q", "a");
        let copy = card.clone();
        let mut manager = CardManager::new();

        manager.insert(card).unwrap();
        assert_eq!(manager.insert(copy.clone()), Err(CardError::DuplicateId(copy.id)));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_insert_rejects_invalid_state() {
        let mut manager = CardManager::new();

        let mut low_ease = Card::new("q", "a");
        low_ease.ease_factor = 0.5;
        assert!(matches!(
            manager.insert(low_ease.clone()),
            Err(CardError::InvalidState { id, .. }) if id == low_ease.id
        ));

        let mut nan_ease = Card::new("q", "a");
        nan_ease.ease_factor = f64::NAN;
        assert!(manager.insert(nan_ease).is_err());

        let mut zero_interval = Card::new("q", "a");
        zero_interval.interval = 0;
        assert!(manager.insert(zero_interval).is_err());

        let mut unpaired = Card::new("q", "a");
        unpaired.next_review = Some(at(2, 9));
        assert!(manager.insert(unpaired).is_err());

        let mut backwards = Card::new("q", "a");
        backwards.last_reviewed = Some(at(2, 9));
        backwards.next_review = Some(at(1, 9));
        assert!(manager.insert(backwards).is_err());

        assert!(manager.is_empty());
    }

    #[test]
    fn test_due_cards_new_first_then_by_date() {
        let (mut manager, first, second) = sample_manager();
        let third = Card::new("What is chunking?", "Grouping items into units");
        let third_id = third.id;
        manager.insert(third).unwrap();

        // second becomes due an hour before first
        manager.record_review(first, 4, at(1, 9)).unwrap();
        manager.record_review(second, 4, at(1, 8)).unwrap();

        let due = manager.get_due_cards(at(5, 0));
        let ids: Vec<Uuid> = due.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![third_id, second, first]);

        // Only the never-reviewed card is due before any interval elapses
        let due = manager.get_due_cards(at(1, 10));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, third_id);
    }

    #[test]
    fn test_due_boundary_is_inclusive() {
        let (mut manager, first, _) = sample_manager();
        let card = manager.record_review(first, 4, at(1, 9)).unwrap();
        let next = card.next_review.unwrap();

        assert!(manager.get_due_cards(next).iter().any(|c| c.id == first));
        assert!(!manager
            .get_due_cards(next - Duration::seconds(1))
            .iter()
            .any(|c| c.id == first));
    }

    #[test]
    fn test_undo_last_review() {
        let (mut manager, first, _) = sample_manager();
        let original = manager.get(first).unwrap().clone();

        let reviewed = manager.record_review(first, 5, at(1, 9)).unwrap();
        manager.record_review(first, 1, at(2, 9)).unwrap();

        assert_eq!(manager.undo_last_review(), Some(reviewed.clone()));
        assert_eq!(manager.get(first).unwrap(), &reviewed);
        assert_eq!(manager.undo_last_review(), Some(original.clone()));
        assert_eq!(manager.get(first).unwrap(), &original);
        assert_eq!(manager.undo_last_review(), None);
    }

    #[test]
    fn test_history() {
        let (mut manager, first, second) = sample_manager();
        manager.record_review(first, 5, at(1, 9)).unwrap();
        manager.record_review(second, 3, at(1, 9)).unwrap();
        manager.record_review(first, 2, at(2, 9)).unwrap();

        let history = manager.history(first).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].quality, 5);
        assert_eq!(history[1].quality, 2);
        assert!(!history[1].was_correct());

        assert!(manager.history(Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_with_history_rejects_orphan_reviews() {
        let (mut manager, first, _) = sample_manager();
        manager.record_review(first, 5, at(1, 9)).unwrap();
        let (cards, reviews) = manager.into_parts();

        let other_cards = cards.into_iter().filter(|c| c.id != first);
        assert_eq!(
            CardManager::with_history(other_cards, reviews).unwrap_err(),
            CardError::NotFound(first)
        );
    }

    #[test]
    fn test_review_stats() {
        let (mut manager, first, second) = sample_manager();
        manager.insert(Card::new("q", "a")).unwrap();

        manager.record_review(first, 5, at(1, 9)).unwrap();
        manager.record_review(second, 5, at(1, 9)).unwrap();
        manager.record_review(second, 4, at(2, 9)).unwrap();
        manager.record_review(first, 0, at(2, 10)).unwrap();

        let stats = manager.review_stats(at(2, 12));
        assert_eq!(stats.total_cards, 3);
        assert_eq!(stats.new_cards, 1);
        assert_eq!(stats.learning_cards, 0);
        assert_eq!(stats.review_cards, 2);
        assert_eq!(stats.due_cards, 1);
        assert_eq!(stats.reviews_today, 2);
        assert_eq!(stats.correct_today, 1);
    }

    #[test]
    fn test_study_queue_respects_limits() {
        let mut manager = CardManager::new();
        let mut reviewed = Vec::new();
        for i in 0..4 {
            let card = Card::new(format!("old {}", i), "a");
            reviewed.push(card.id);
            manager.insert(card).unwrap();
        }
        for i in 0..3 {
            manager.insert(Card::new(format!("new {}", i), "a")).unwrap();
        }
        for (i, id) in reviewed.iter().enumerate() {
            manager.record_review(*id, 4, at(1, i as u32)).unwrap();
        }

        let config = StudyConfig {
            new_cards_per_day: 2,
            reviews_per_day: 3,
            ..StudyConfig::default()
        };
        let queue = manager.study_queue(at(10, 0), &config);

        assert_eq!(queue.len(), 5);
        let new_in_queue = queue
            .iter()
            .filter(|id| manager.get(**id).unwrap().status() == CardStatus::New)
            .count();
        assert_eq!(new_in_queue, 2);
        assert_eq!(&queue[2..], &reviewed[..3]);
    }

    #[test]
    fn test_shared_manager_serializes_reviews() {
        let (manager, first, _) = sample_manager();
        let shared: SharedCardManager = Arc::new(RwLock::new(manager));

        std::thread::scope(|scope| {
            for hour in 0..8 {
                let shared = Arc::clone(&shared);
                scope.spawn(move || {
                    shared
                        .write()
                        .unwrap()
                        .record_review(first, 5, at(1, hour))
                        .unwrap();
                });
            }
            let reader = Arc::clone(&shared);
            scope.spawn(move || {
                let due = reader.read().unwrap().get_due_cards(at(1, 0));
                assert!(!due.is_empty());
            });
        });

        let manager = shared.read().unwrap();
        assert_eq!(manager.reviews().len(), 8);
        assert_eq!(manager.get(first).unwrap().repetitions, 8);
    }
}
