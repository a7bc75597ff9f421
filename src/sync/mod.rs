//! Click handling and promotion control
//!
//! Node kinds only move one way: a candidate can become collected, and
//! nothing is ever demoted.

mod engine;
mod events;
mod guard;

pub use engine::{ClickOutcome, Seed, SyncEngine};
pub use events::GraphEvent;
pub use guard::{PromotionGuard, PromotionTicket};
