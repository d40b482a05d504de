//! Application layer for roundtable
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::DiscussionParams;
pub use ports::{
    llm_gateway::{FragmentStream, GatewayError, GenerationRequest, LlmGateway, StreamHandle},
    progress::{DiscussionProgress, NoProgress, StepContext, StepOutcome},
};
pub use use_cases::discussion_session::DiscussionSession;
pub use use_cases::interjection::Interjection;
pub use use_cases::session_snapshot::{InProgressTurn, SessionSnapshot, SnapshotPublisher};
pub use use_cases::stream_aggregator::{AggregateSnapshot, StreamAggregator};
pub use use_cases::turn_scheduler::{DiscussionOutcome, RunDiscussionError, TurnScheduler};
