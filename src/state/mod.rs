//! State module for tracking harvest progress
//!
//! # Components
//!
//! - `OriginAggregate`: addresses discovered so far, keyed by origin
//! - `RunPhase`: where a run is in its batch/checkpoint cycle

mod aggregate;
mod run_phase;

// Re-export main types
pub use aggregate::{join_emails, OriginAggregate};
pub use run_phase::RunPhase;
