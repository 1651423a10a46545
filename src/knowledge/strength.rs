//! Knowledge strength model
//!
//! A card's strength grows with its run of successful reviews and decays once
//! the card is overdue:
//!
//! ```text
//! growth    = 1 - exp(-growth_rate * repetitions * ease_factor / 2.5)
//! retention = 0.5 ^ (days_overdue / (interval * overdue_half_life))
//! strength  = growth * retention
//! ```
//!
//! A node's strength is the mean over its cards. Strength is only ever read;
//! the visualization pulls it with [`KnowledgeGraph::strength`] or
//! [`KnowledgeGraph::snapshot`].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::models::{KnowledgeLink, KnowledgeNode};
use crate::config::StrengthConfig;
use crate::flashcards::algorithm::INITIAL_EASE_FACTOR;
use crate::flashcards::{Card, CardManager};

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeError {
    #[error("Knowledge node not found: {0}")]
    NodeNotFound(Uuid),

    #[error("Knowledge node already exists: {0}")]
    DuplicateNode(Uuid),

    #[error("Node {node_id} links unknown card {card_id}")]
    UnknownCard { node_id: Uuid, card_id: Uuid },
}

pub type Result<T> = std::result::Result<T, KnowledgeError>;

/// Strength of a single card as of `as_of`, in [0, 1]
pub fn card_strength(card: &Card, as_of: DateTime<Utc>, config: &StrengthConfig) -> f64 {
    if card.last_reviewed.is_none() {
        return 0.0;
    }

    let streak = f64::from(card.repetitions) * card.ease_factor / INITIAL_EASE_FACTOR;
    let growth = 1.0 - (-config.growth_rate * streak).exp();

    let retention = match card.next_review {
        Some(due) if as_of > due => {
            let overdue_days = (as_of - due).num_seconds() as f64 / SECONDS_PER_DAY;
            let half_life = f64::from(card.interval.max(1)) * config.overdue_half_life;
            0.5_f64.powf(overdue_days / half_life)
        }
        _ => 1.0,
    };

    (growth * retention).clamp(0.0, 1.0)
}

/// Topics, their links, and the cards behind them
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    nodes: Vec<KnowledgeNode>,
    links: Vec<KnowledgeLink>,
    config: StrengthConfig,
}

impl KnowledgeGraph {
    pub fn new(config: StrengthConfig) -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            config,
        }
    }

    pub fn from_parts(
        nodes: Vec<KnowledgeNode>,
        links: Vec<KnowledgeLink>,
        config: StrengthConfig,
    ) -> Result<Self> {
        let mut graph = Self::new(config);
        for node in nodes {
            graph.add_node(node)?;
        }
        for link in links {
            graph.add_link(link)?;
        }
        Ok(graph)
    }

    pub fn add_node(&mut self, node: KnowledgeNode) -> Result<()> {
        if self.nodes.iter().any(|n| n.id == node.id) {
            return Err(KnowledgeError::DuplicateNode(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Add an edge; both endpoints must already exist
    pub fn add_link(&mut self, link: KnowledgeLink) -> Result<()> {
        for endpoint in [link.source, link.target] {
            self.node(endpoint)?;
        }
        self.links.push(link);
        Ok(())
    }

    /// Attach a card to a node; attaching the same card twice is a no-op
    pub fn link_card(&mut self, node_id: Uuid, card_id: Uuid) -> Result<()> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == node_id)
            .ok_or(KnowledgeError::NodeNotFound(node_id))?;
        if !node.card_ids.contains(&card_id) {
            node.card_ids.push(card_id);
        }
        Ok(())
    }

    /// Case-insensitive lookup by label
    pub fn find_by_label(&self, label: &str) -> Option<&KnowledgeNode> {
        self.nodes
            .iter()
            .find(|n| n.label.to_lowercase() == label.to_lowercase())
    }

    pub fn node(&self, node_id: Uuid) -> Result<&KnowledgeNode> {
        self.nodes
            .iter()
            .find(|n| n.id == node_id)
            .ok_or(KnowledgeError::NodeNotFound(node_id))
    }

    pub fn nodes(&self) -> &[KnowledgeNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[KnowledgeLink] {
        &self.links
    }

    /// Links touching a node
    pub fn neighbours(&self, node_id: Uuid) -> impl Iterator<Item = &KnowledgeLink> {
        self.links
            .iter()
            .filter(move |l| l.source == node_id || l.target == node_id)
    }

    /// Mean strength of the node's cards; 0.0 for a node without cards
    pub fn strength(&self, node_id: Uuid, as_of: DateTime<Utc>, cards: &CardManager) -> Result<f64> {
        let node = self.node(node_id)?;
        self.node_strength(node, as_of, cards)
    }

    /// Every node with `strength` and `last_reviewed` derived from its cards
    pub fn snapshot(&self, as_of: DateTime<Utc>, cards: &CardManager) -> Result<Vec<KnowledgeNode>> {
        self.nodes
            .iter()
            .map(|node| {
                let strength = self.node_strength(node, as_of, cards)?;
                let last_reviewed = self
                    .linked_cards(node, cards)?
                    .iter()
                    .filter_map(|card| card.last_reviewed)
                    .max();
                Ok(KnowledgeNode {
                    strength,
                    last_reviewed,
                    ..node.clone()
                })
            })
            .collect()
    }

    fn node_strength(&self, node: &KnowledgeNode, as_of: DateTime<Utc>, cards: &CardManager) -> Result<f64> {
        let linked = self.linked_cards(node, cards)?;
        if linked.is_empty() {
            return Ok(0.0);
        }

        let total: f64 = linked
            .iter()
            .map(|card| card_strength(card, as_of, &self.config))
            .sum();
        Ok(total / linked.len() as f64)
    }

    fn linked_cards<'a>(&self, node: &KnowledgeNode, cards: &'a CardManager) -> Result<Vec<&'a Card>> {
        let mut seen = HashSet::new();
        node.card_ids
            .iter()
            .filter(|id| seen.insert(**id))
            .map(|&card_id| {
                cards.get(card_id).map_err(|_| KnowledgeError::UnknownCard {
                    node_id: node.id,
                    card_id,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::algorithm::MIN_EASE_FACTOR;
    use crate::knowledge::models::LinkType;
    use chrono::{Duration, TimeZone};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, day, 12, 0, 0).unwrap()
    }

    fn config() -> StrengthConfig {
        StrengthConfig::default()
    }

    fn reviewed_card(qualities: &[i32]) -> (CardManager, Uuid) {
        let card = Card::new("What is chunking?", "Grouping information into units");
        let id = card.id;
        let mut cards = CardManager::from_cards([card]).unwrap();
        for (day, &quality) in qualities.iter().enumerate() {
            cards.record_review(id, quality, at(1 + day as u32)).unwrap();
        }
        (cards, id)
    }

    #[test]
    fn test_unreviewed_card_has_no_strength() {
        let card = Card::new("q", "a");
        assert_eq!(card_strength(&card, at(1), &config()), 0.0);
    }

    #[test]
    fn test_strength_grows_with_streak() {
        let mut previous = 0.0;
        for streak in 1..=6 {
            let mut card = Card::new("q", "a");
            card.repetitions = streak;
            card.last_reviewed = Some(at(1));
            card.next_review = Some(at(2));

            let strength = card_strength(&card, at(1), &config());
            assert!(strength > previous, "streak {}", streak);
            assert!(strength <= 1.0);
            previous = strength;
        }
    }

    #[test]
    fn test_strength_grows_through_hard_reviews() {
        // Quality 3 lowers the ease factor on every review
        let card = Card::new("What is the testing effect?", "Retrieval strengthens memory");
        let id = card.id;
        let mut cards = CardManager::from_cards([card]).unwrap();

        let mut now = at(1);
        let mut previous = 0.0;
        for review in 1..=10 {
            let updated = cards.record_review(id, 3, now).unwrap();
            let strength = card_strength(&updated, now, &config());
            assert!(strength > previous, "review {}", review);
            assert!(strength <= 1.0);
            previous = strength;
            now = updated.next_review.unwrap();
        }
        assert_eq!(cards.get(id).unwrap().ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn test_strength_decays_when_overdue() {
        let (cards, id) = reviewed_card(&[5, 5, 5]);
        let card = cards.get(id).unwrap();
        let due = card.next_review.unwrap();

        let on_time = card_strength(card, due, &config());
        let mut previous = on_time;
        for days in [1, 3, 10, 40, 200] {
            let strength = card_strength(card, due + Duration::days(days), &config());
            assert!(strength < previous, "{} days overdue", days);
            assert!(strength >= 0.0);
            previous = strength;
        }

        // One interval overdue halves strength
        let one_interval = due + Duration::days(i64::from(card.interval));
        let halved = card_strength(card, one_interval, &config());
        assert!((halved - on_time / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_not_yet_due_does_not_decay() {
        let (cards, id) = reviewed_card(&[4, 4]);
        let card = cards.get(id).unwrap();
        let due = card.next_review.unwrap();

        assert_eq!(
            card_strength(card, due - Duration::days(3), &config()),
            card_strength(card, due, &config())
        );
    }

    #[test]
    fn test_lapse_drops_strength() {
        let (cards, id) = reviewed_card(&[5, 5, 1]);
        assert_eq!(card_strength(cards.get(id).unwrap(), at(4), &config()), 0.0);
    }

    #[test]
    fn test_node_strength_is_mean_of_cards() {
        let (mut cards, strong) = reviewed_card(&[5, 5, 5]);
        let weak = Card::new("q", "a");
        let weak_id = weak.id;
        cards.insert(weak).unwrap();

        let node = KnowledgeNode::new("Chunking", "Learning Technique").with_cards([strong, weak_id]);
        let node_id = node.id;
        let empty = KnowledgeNode::new("Memory Palace", "Memorization");
        let empty_id = empty.id;
        let graph = KnowledgeGraph::from_parts(vec![node, empty], Vec::new(), config()).unwrap();

        let expected = card_strength(cards.get(strong).unwrap(), at(4), &config()) / 2.0;
        let strength = graph.strength(node_id, at(4), &cards).unwrap();
        assert!((strength - expected).abs() < 1e-12);
        assert_eq!(graph.strength(empty_id, at(4), &cards).unwrap(), 0.0);
    }

    #[test]
    fn test_snapshot_fills_derived_fields() {
        let (cards, id) = reviewed_card(&[4, 4]);
        let node = KnowledgeNode::new("Chunking", "Learning Technique").with_cards([id]);
        let graph = KnowledgeGraph::from_parts(vec![node], Vec::new(), config()).unwrap();

        let snapshot = graph.snapshot(at(3), &cards).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].last_reviewed, Some(at(2)));
        assert!(snapshot[0].strength > 0.0 && snapshot[0].strength <= 1.0);

        // The stored node is untouched
        assert_eq!(graph.nodes()[0].strength, 0.0);
    }

    #[test]
    fn test_unknown_node_and_card() {
        let cards = CardManager::new();
        let missing_card = Uuid::new_v4();
        let node = KnowledgeNode::new("Feynman Technique", "Understanding").with_cards([missing_card]);
        let node_id = node.id;
        let graph = KnowledgeGraph::from_parts(vec![node], Vec::new(), config()).unwrap();

        let missing_node = Uuid::new_v4();
        assert_eq!(
            graph.strength(missing_node, at(1), &cards),
            Err(KnowledgeError::NodeNotFound(missing_node))
        );
        assert_eq!(
            graph.strength(node_id, at(1), &cards),
            Err(KnowledgeError::UnknownCard {
                node_id,
                card_id: missing_card
            })
        );
    }

    #[test]
    fn test_link_card() {
        let node = KnowledgeNode::new("Memory Palace", "Memorization");
        let node_id = node.id;
        let mut graph = KnowledgeGraph::from_parts(vec![node], Vec::new(), config()).unwrap();
        let card_id = Uuid::new_v4();

        graph.link_card(node_id, card_id).unwrap();
        graph.link_card(node_id, card_id).unwrap();
        assert_eq!(graph.nodes()[0].card_ids, vec![card_id]);
        assert_eq!(graph.find_by_label("memory palace").map(|n| n.id), Some(node_id));

        let missing = Uuid::new_v4();
        assert_eq!(
            graph.link_card(missing, card_id),
            Err(KnowledgeError::NodeNotFound(missing))
        );
    }

    #[test]
    fn test_links_require_known_nodes() {
        let a = KnowledgeNode::new("Active Recall", "Learning Technique");
        let b = KnowledgeNode::new("Spaced Repetition", "Learning Technique");
        let (a_id, b_id) = (a.id, b.id);
        let mut graph = KnowledgeGraph::from_parts(vec![a, b], Vec::new(), config()).unwrap();

        graph
            .add_link(KnowledgeLink {
                source: a_id,
                target: b_id,
                strength: 0.9,
                link_type: LinkType::Related,
            })
            .unwrap();
        assert_eq!(graph.neighbours(b_id).count(), 1);

        let stranger = Uuid::new_v4();
        let err = graph
            .add_link(KnowledgeLink {
                source: a_id,
                target: stranger,
                strength: 0.5,
                link_type: LinkType::Prerequisite,
            })
            .unwrap_err();
        assert_eq!(err, KnowledgeError::NodeNotFound(stranger));
        assert_eq!(graph.links().len(), 1);
    }
}
