//! Discussion parameters for pacing and randomness.
//!
//! [`DiscussionParams`] groups the static parameters that control how the
//! [`TurnScheduler`](crate::use_cases::turn_scheduler::TurnScheduler) drives
//! a session. The discussion's shape (turn count, summary index) lives in
//! the domain's `ScheduleConfig`.

use roundtable_domain::BindingId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scheduler control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionParams {
    /// Pause after each speaker turn.
    pub turn_delay: Duration,
    /// Pause after the interim summary.
    pub summary_delay: Duration,
    /// Upper bound for one generation step; expiry counts as a failure.
    pub step_timeout: Option<Duration>,
    /// Binding used for the interim summary; random from the pool when unset.
    pub summary_binding: Option<BindingId>,
    /// Seed for the session rng; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for DiscussionParams {
    fn default() -> Self {
        Self {
            turn_delay: Duration::from_millis(1000),
            summary_delay: Duration::from_millis(1500),
            step_timeout: Some(Duration::from_secs(60)),
            summary_binding: None,
            seed: None,
        }
    }
}

impl DiscussionParams {
    // ==================== Builder Methods ====================

    pub fn with_turn_delay(mut self, delay: Duration) -> Self {
        self.turn_delay = delay;
        self
    }

    pub fn with_summary_delay(mut self, delay: Duration) -> Self {
        self.summary_delay = delay;
        self
    }

    pub fn with_step_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.step_timeout = timeout;
        self
    }

    pub fn with_summary_binding(mut self, binding: impl Into<BindingId>) -> Self {
        self.summary_binding = Some(binding.into());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// No pauses between steps
    pub fn without_delays(self) -> Self {
        self.with_turn_delay(Duration::ZERO)
            .with_summary_delay(Duration::ZERO)
    }
}
