//! Graph: the client-side projection of the user's exploration
//!
//! Every operation is total and idempotent. Merges skip anything whose
//! deterministic id is already present, so replaying the same server
//! response leaves the graph unchanged.

use super::catalog::{
    article_node_id, candidate_node_id, concept_node_id, expansion_edge_id,
};
use super::edge::{EdgeId, EdgeKind, GraphEdge};
use super::layout::LayoutConfig;
use super::node::{GraphNode, NodeData, NodeId, NodeKind, Position};
use crate::model::{Article, Concept, RelativeConcept};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Concept id given to a concept seeded by name alone.
pub const SEEDED_CONCEPT_ID: i64 = 0;

/// What a merge actually added.
///
/// Empty when the merge was a no-op (everything already present, or the
/// parent is gone).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    pub nodes_added: Vec<NodeId>,
    pub edges_added: Vec<EdgeId>,
}

impl MergeReport {
    pub fn is_noop(&self) -> bool {
        self.nodes_added.is_empty() && self.edges_added.is_empty()
    }
}

/// Nodes and edges in render order (sorted by id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// The node/edge store
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: HashMap<NodeId, GraphNode>,
    edges: HashMap<EdgeId, GraphEdge>,
    layout: LayoutConfig,
}

impl Graph {
    /// Create an empty graph with the default layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with a custom layout
    pub fn with_layout(layout: LayoutConfig) -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            layout,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Seed the graph with the user's collected concepts.
    ///
    /// Refuses to touch a non-empty graph: a snapshot that resolves again
    /// later must not clobber what the user has built since.
    pub fn load_snapshot(&mut self, collected: &[Concept]) -> MergeReport {
        let mut report = MergeReport::default();
        if !self.is_empty() {
            return report;
        }

        let mut seen = HashSet::new();
        for concept in collected {
            if !seen.insert(concept.concept_id) {
                continue;
            }
            let id = concept_node_id(concept.concept_id);
            let position = self.layout.grid_position(report.nodes_added.len());
            let mut concept = concept.clone();
            concept.is_collected = true;
            self.nodes.insert(
                id.clone(),
                GraphNode::new(id.clone(), position, NodeData::Collected(concept)),
            );
            report.nodes_added.push(id);
        }
        report
    }

    /// Seed the graph with one concept known only by name.
    ///
    /// The concept id is unknown (0) until the service is asked about it.
    pub fn seed_concept(&mut self, name: &str) -> MergeReport {
        let mut report = MergeReport::default();
        if !self.is_empty() {
            return report;
        }
        let concept = Concept::provisional(SEEDED_CONCEPT_ID, name);
        let id = concept_node_id(concept.concept_id);
        let position = self.layout.grid_position(0);
        self.nodes.insert(
            id.clone(),
            GraphNode::new(id.clone(), position, NodeData::Collected(concept)),
        );
        report.nodes_added.push(id);
        report
    }

    /// Attach articles found for a concept node.
    pub fn merge_article_expansion(
        &mut self,
        parent: &NodeId,
        articles: &[Article],
    ) -> MergeReport {
        let Some(parent_position) = self.nodes.get(parent).map(|n| n.position) else {
            return MergeReport::default();
        };

        let mut fresh: Vec<(NodeId, &Article)> = Vec::new();
        for article in articles {
            let id = article_node_id(article.article_id);
            if !self.nodes.contains_key(&id) && !fresh.iter().any(|(f, _)| f == &id) {
                fresh.push((id, article));
            }
        }

        let spacing = self.layout.article_spacing;
        let mut report = self.insert_fanned(
            parent_position,
            spacing,
            fresh
                .into_iter()
                .map(|(id, a)| (id, NodeData::Article(a.clone())))
                .collect(),
        );

        for article in articles {
            let target = article_node_id(article.article_id);
            if let Some(edge_id) = self.insert_edge(parent, &target, EdgeKind::Expansion) {
                report.edges_added.push(edge_id);
            }
        }
        report
    }

    /// Attach candidate concepts surfaced by an article node.
    pub fn merge_concept_expansion(
        &mut self,
        source: &NodeId,
        candidates: &[RelativeConcept],
    ) -> MergeReport {
        let Some((article_id, source_position)) = self
            .nodes
            .get(source)
            .and_then(|n| n.as_article().map(|a| (a.article_id, n.position)))
        else {
            return MergeReport::default();
        };

        let mut fresh: Vec<(NodeId, &RelativeConcept)> = Vec::new();
        for candidate in candidates {
            let id = candidate_node_id(article_id, candidate.concept_id);
            if !self.nodes.contains_key(&id) && !fresh.iter().any(|(f, _)| f == &id) {
                fresh.push((id, candidate));
            }
        }

        let spacing = self.layout.candidate_spacing;
        let mut report = self.insert_fanned(
            source_position,
            spacing,
            fresh
                .into_iter()
                .map(|(id, rc)| (id, NodeData::Candidate(rc.clone())))
                .collect(),
        );

        for candidate in candidates {
            let target = candidate_node_id(article_id, candidate.concept_id);
            if let Some(edge_id) = self.insert_edge(source, &target, EdgeKind::Relation) {
                report.edges_added.push(edge_id);
            }
        }
        report
    }

    /// Place new nodes to the right of `parent`, fanned over the new ones only.
    fn insert_fanned(
        &mut self,
        parent: Position,
        spacing: f64,
        fresh: Vec<(NodeId, NodeData)>,
    ) -> MergeReport {
        let mut report = MergeReport::default();
        let count = fresh.len();
        for (index, (id, data)) in fresh.into_iter().enumerate() {
            let position = self.layout.fan_out(parent, index, count, spacing);
            self.nodes
                .insert(id.clone(), GraphNode::new(id.clone(), position, data));
            report.nodes_added.push(id);
        }
        report
    }

    /// Add an edge unless it exists or an endpoint is missing.
    fn insert_edge(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        kind: EdgeKind,
    ) -> Option<EdgeId> {
        let id = expansion_edge_id(source, target);
        if self.edges.contains_key(&id)
            || !self.nodes.contains_key(source)
            || !self.nodes.contains_key(target)
        {
            return None;
        }
        self.edges.insert(
            id.clone(),
            GraphEdge::new(id.clone(), source.clone(), target.clone(), kind),
        );
        Some(id)
    }

    /// Remove a node. Edges are left alone; see [`Graph::remove_edges_touching`].
    pub fn remove_node(&mut self, id: &NodeId) -> Option<GraphNode> {
        self.nodes.remove(id)
    }

    /// Remove every edge with `id` as an endpoint, returning their ids.
    pub fn remove_edges_touching(&mut self, id: &NodeId) -> Vec<EdgeId> {
        let doomed: Vec<EdgeId> = self
            .edges
            .values()
            .filter(|e| e.touches(id))
            .map(|e| e.id.clone())
            .collect();
        for edge_id in &doomed {
            self.edges.remove(edge_id);
        }
        doomed
    }

    /// Optimistically turn a candidate into a collected concept in place.
    ///
    /// Id, position and edges are kept. Returns false and leaves the graph
    /// untouched when the node is missing, is not a candidate, or another
    /// collected node already holds `concept_id`.
    pub fn promote_candidate(&mut self, id: &NodeId, concept_id: i64, name: &str) -> bool {
        if self
            .collected_match(concept_id, name)
            .is_some_and(|existing| &existing.id != id)
        {
            return false;
        }
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        if node.kind() != NodeKind::Candidate {
            return false;
        }
        node.data = NodeData::Collected(Concept::provisional(concept_id, name));
        node.metadata.promoted_at = Some(Utc::now());
        true
    }

    /// The collected node holding `concept_id`, if any
    pub fn collected_node_for(&self, concept_id: i64) -> Option<&GraphNode> {
        self.nodes
            .values()
            .find(|n| n.kind() == NodeKind::Collected && n.concept_id() == Some(concept_id))
    }

    /// The collected node a candidate `(concept_id, name)` would duplicate.
    ///
    /// A concept seeded by name has no id yet, so it matches by name.
    pub fn collected_match(&self, concept_id: i64, name: &str) -> Option<&GraphNode> {
        self.collected_node_for(concept_id).or_else(|| {
            self.nodes.values().find(|n| {
                n.as_concept().is_some_and(|c| {
                    c.concept_id == SEEDED_CONCEPT_ID
                        && concept_id != SEEDED_CONCEPT_ID
                        && c.name == name
                })
            })
        })
    }

    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&GraphEdge> {
        self.edges.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Copy out nodes and edges sorted by id
    pub fn snapshot(&self) -> GraphSnapshot {
        let mut nodes: Vec<GraphNode> = self.nodes.values().cloned().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        let mut edges: Vec<GraphEdge> = self.edges.values().cloned().collect();
        edges.sort_by(|a, b| a.id.cmp(&b.id));
        GraphSnapshot { nodes, edges }
    }
}
