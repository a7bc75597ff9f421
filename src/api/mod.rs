//! Knowledge service seam
//!
//! The engine consumes three calls of the knowledge service; this module
//! holds the trait it calls through, the wire shapes, and a static
//! implementation for tests and offline replays.

mod static_api;
mod traits;
pub mod wire;

pub use static_api::{FixtureError, StaticApi};
pub use traits::{ApiError, KnowledgeApi};
pub use wire::{CollectReceipt, KnowledgeMap, MapNode};
