//! State module for describing how a collection run ended
//!
//! # Components
//!
//! - `StopReason`: The termination signal that ended a completed run
//! - `RunOutcome`: Completed, stopped early on a fetch failure, or cancelled

mod outcome;

// Re-export main types
pub use outcome::{RunOutcome, StopReason};
