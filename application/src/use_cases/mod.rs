//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod discussion_session;
pub mod interjection;
pub mod session_snapshot;
pub mod stream_aggregator;
pub mod turn_scheduler;
