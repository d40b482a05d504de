//! Domain layer for roundtable
//!
//! This crate contains the core discussion model: who speaks, in what order,
//! and what gets recorded. It has no dependencies on infrastructure or
//! presentation concerns and never performs I/O.
//!
//! # Core Concepts
//!
//! - **Roster**: personas (fixed instruction text) and the pool of backend
//!   bindings that can speak for them
//! - **Slot assignment**: a per-session, randomized persona → binding map
//! - **Transcript**: the append-only log every prompt is built from
//! - **Schedule**: the state machine deciding speak / summarize / moderate

pub mod assignment;
pub mod core;
pub mod prompt;
pub mod roster;
pub mod schedule;
pub mod session;
pub mod transcript;

// Re-export commonly used types
pub use assignment::slot::{SlotAssigner, SlotAssignment, SlotEntry};
pub use core::{error::DomainError, string::truncate_with_ellipsis, topic::Topic};
pub use prompt::{PromptBuilder, PromptTemplate, StandardPromptBuilder, TurnMetadata};
pub use roster::{
    binding::{BackendBinding, BindingId},
    persona::{Persona, PersonaId},
    provider::Provider,
    registry::AgentRegistry,
};
pub use schedule::{
    config::{DEFAULT_ROUNDS, ScheduleConfig},
    state::{Schedule, SchedulerState},
    step::{ScheduleStep, StepKind},
};
pub use session::{
    entities::{Message, Role},
    stream::StreamEvent,
};
pub use transcript::{
    log::ConversationTranscript,
    record::{RecordRole, TurnRecord},
};
