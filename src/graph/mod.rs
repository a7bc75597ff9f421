//! Core graph data structures

pub mod catalog;
mod edge;
mod layout;
mod node;
mod store;


pub use edge::{EdgeId, EdgeKind, GraphEdge};
pub use layout::LayoutConfig;
pub use node::{GraphNode, NodeData, NodeId, NodeKind, NodeMetadata, Position};
pub use store::{Graph, GraphSnapshot, MergeReport};
