//! Schedule steps: what the scheduler should run next.

use serde::{Deserialize, Serialize};

/// Kind of generation step currently streaming.
///
/// Progress reporters use this to label live output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// A persona's speaking turn.
    Speaker,
    /// The one-shot interim summary.
    MidSummary,
    /// The closing synthesis.
    Moderator,
}

impl StepKind {
    /// Human-readable label for display purposes.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Speaker => "Turn",
            Self::MidSummary => "Interim Summary",
            Self::Moderator => "Moderator",
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The next action decided by a [`Schedule`](super::state::Schedule)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleStep {
    /// Turn `turn` is spoken by the persona at roster position `slot`.
    Speak { turn: usize, slot: usize },
    /// Insert the interim summary; `before_turn` runs right after it.
    MidSummary { before_turn: usize },
    /// Run the closing synthesis.
    Moderate,
    /// Nothing left to run.
    Finished,
}
