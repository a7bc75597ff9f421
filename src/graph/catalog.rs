//! Stable node and edge identities derived from domain keys
//!
//! Identity checks in the store rely on these being pure: the same arguments
//! always produce the same id.

use super::edge::EdgeId;
use super::node::NodeId;

pub fn concept_node_id(concept_id: i64) -> NodeId {
    NodeId::from_string(format!("concept-{}", concept_id))
}

pub fn article_node_id(article_id: i64) -> NodeId {
    NodeId::from_string(format!("article-{}", article_id))
}

/// Candidates are scoped to the article that surfaced them: the same concept
/// can appear under several articles before it is collected.
pub fn candidate_node_id(article_id: i64, concept_id: i64) -> NodeId {
    NodeId::from_string(format!("relative-{}-{}", article_id, concept_id))
}

pub fn expansion_edge_id(source: &NodeId, target: &NodeId) -> EdgeId {
    EdgeId::from_string(format!("edge-{}-{}", source, target))
}
