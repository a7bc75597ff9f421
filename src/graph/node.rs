//! Node representation in the exploration graph

use crate::model::{Article, Concept, RelativeConcept};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a node
///
/// Serializes as a plain string (e.g. "concept-1", "relative-7-9").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a NodeId from a string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The three kinds of node a user can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A concept the user owns
    Collected,
    /// An article found by expanding a concept
    Article,
    /// A concept surfaced by an article, not yet collected
    Candidate,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collected => write!(f, "collected"),
            Self::Article => write!(f, "article"),
            Self::Candidate => write!(f, "candidate"),
        }
    }
}

/// Canvas position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Domain payload of a node. The variant is the node's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "lowercase")]
pub enum NodeData {
    Collected(Concept),
    Article(Article),
    Candidate(RelativeConcept),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Collected(_) => NodeKind::Collected,
            Self::Article(_) => NodeKind::Article,
            Self::Candidate(_) => NodeKind::Candidate,
        }
    }

    /// Concept id for collected and candidate nodes
    pub fn concept_id(&self) -> Option<i64> {
        match self {
            Self::Collected(c) => Some(c.concept_id),
            Self::Candidate(rc) => Some(rc.concept_id),
            Self::Article(_) => None,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &str {
        match self {
            Self::Collected(c) => &c.name,
            Self::Article(a) => a.display_title(),
            Self::Candidate(rc) => &rc.name,
        }
    }
}

/// Node metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// When the node entered the graph
    pub created_at: Option<DateTime<Utc>>,
    /// When a candidate was promoted in place
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promoted_at: Option<DateTime<Utc>>,
}

/// A node in the exploration graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Deterministic identifier derived from kind and domain key
    pub id: NodeId,
    /// Canvas position
    pub position: Position,
    /// Kind-tagged payload
    pub data: NodeData,
    /// Node metadata
    #[serde(default)]
    pub metadata: NodeMetadata,
}

impl GraphNode {
    /// Create a new node stamped with the current time
    pub fn new(id: NodeId, position: Position, data: NodeData) -> Self {
        Self {
            id,
            position,
            data,
            metadata: NodeMetadata {
                created_at: Some(Utc::now()),
                ..Default::default()
            },
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn concept_id(&self) -> Option<i64> {
        self.data.concept_id()
    }

    pub fn label(&self) -> &str {
        self.data.label()
    }

    pub fn as_article(&self) -> Option<&Article> {
        match &self.data {
            NodeData::Article(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_candidate(&self) -> Option<&RelativeConcept> {
        match &self.data {
            NodeData::Candidate(rc) => Some(rc),
            _ => None,
        }
    }

    pub fn as_concept(&self) -> Option<&Concept> {
        match &self.data {
            NodeData::Collected(c) => Some(c),
            _ => None,
        }
    }
}
