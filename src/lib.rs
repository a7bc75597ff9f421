//! knowmap: Incremental Knowledge-Graph Synchronization Engine
//!
//! Builds a personal knowledge graph one click at a time: collected concepts
//! expand into articles, articles expand into candidate concepts, and
//! candidates are collected into permanent concepts.
//!
//! # Core Concepts
//!
//! - **Graph**: nodes and edges with ids derived from domain keys, so
//!   merging the same server response twice changes nothing
//! - **Promotion guard**: at most one in-flight collect per candidate
//! - **Sync engine**: dispatches clicks and merges service responses
//!
//! # Example
//!
//! ```
//! use knowmap::{Graph, NodeKind};
//! use knowmap::model::Concept;
//!
//! let mut graph = Graph::new();
//! graph.load_snapshot(&[Concept::provisional(1, "Inflation")]);
//! let node = graph.nodes().next().unwrap();
//! assert_eq!(node.kind(), NodeKind::Collected);
//! ```

pub mod api;
pub mod config;
mod graph;
pub mod model;
pub mod sync;

pub use api::{ApiError, KnowledgeApi, StaticApi};
pub use config::{ConfigError, EngineConfig};
pub use graph::catalog;
pub use graph::{
    EdgeId, EdgeKind, Graph, GraphEdge, GraphNode, GraphSnapshot, LayoutConfig, MergeReport,
    NodeData, NodeId, NodeKind, NodeMetadata, Position,
};
pub use sync::{ClickOutcome, GraphEvent, PromotionGuard, Seed, SyncEngine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
