//! Graph events fired as the engine mutates the graph or hears back from
//! the knowledge service
//!
//! Transport failures travel this channel too: they never corrupt the graph,
//! they are reported.

use crate::graph::{EdgeId, NodeId};

#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    /// Nodes entered the graph
    NodesAdded { node_ids: Vec<NodeId> },
    /// Edges entered the graph
    EdgesAdded { edge_ids: Vec<EdgeId> },
    /// Nodes were discarded
    NodesRemoved { node_ids: Vec<NodeId> },
    /// Edges were discarded along with their node
    EdgesRemoved { edge_ids: Vec<EdgeId> },
    /// A candidate was rewritten into a collected concept (optimistic)
    NodePromoted { node_id: NodeId, concept_id: i64 },
    /// The service confirmed a collect
    CollectConfirmed { node_id: NodeId, concept_id: i64, message: String },
    /// The service rejected a collect; the optimistic promotion stays
    CollectFailed { node_id: NodeId, concept_id: i64, error: String },
    /// A concept -> articles search failed
    SearchFailed { node_id: NodeId, concept_name: String, error: String },
    /// The knowledge map could not be fetched
    SnapshotFailed { error: String },
    /// A snapshot arrived after the graph was already populated
    SnapshotSkipped,
}
