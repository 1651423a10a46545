//! Knowledge graph data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A topic in the knowledge graph, backed by the cards that test it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeNode {
    pub id: Uuid,
    pub label: String,
    #[serde(default)]
    pub category: String,
    /// Derived mastery in [0, 1]; refreshed by [`super::KnowledgeGraph::snapshot`]
    #[serde(default)]
    pub strength: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    /// Cards whose review history feeds this node's strength
    #[serde(default)]
    pub card_ids: Vec<Uuid>,
}

impl KnowledgeNode {
    pub fn new(label: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            category: category.into(),
            strength: 0.0,
            last_reviewed: None,
            card_ids: Vec::new(),
        }
    }

    pub fn with_cards(mut self, card_ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.card_ids.extend(card_ids);
        self
    }
}

/// How two topics relate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkType {
    Prerequisite,
    Related,
    ParentChild,
}

impl LinkType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Prerequisite => "prerequisite",
            Self::Related => "related",
            Self::ParentChild => "parent-child",
        }
    }
}

/// A weighted edge between two knowledge nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeLink {
    pub source: Uuid,
    pub target: Uuid,
    /// Edge weight in [0, 1]
    pub strength: f64,
    #[serde(rename = "type")]
    pub link_type: LinkType,
}
