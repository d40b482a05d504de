//! Schedule and pacing from TOML (`[schedule]` and `[discussion]`)

use roundtable_application::DiscussionParams;
use roundtable_domain::{DEFAULT_ROUNDS, DomainError, ScheduleConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw schedule configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileScheduleConfig {
    /// Full passes over the roster; ignored when `total_turns` is set
    pub rounds: usize,
    /// Explicit number of speaking turns
    pub total_turns: Option<usize>,
    /// Insert the interim summary before this turn index
    pub summary_after: Option<usize>,
    /// Never insert an interim summary
    pub disable_summary: bool,
}

impl Default for FileScheduleConfig {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            total_turns: None,
            summary_after: None,
            disable_summary: false,
        }
    }
}

impl FileScheduleConfig {
    /// Build the schedule for a roster of `roster_len` personas.
    ///
    /// Without an explicit `summary_after` the summary goes before the last
    /// pass over the roster, when there is one.
    pub fn to_schedule_config(&self, roster_len: usize) -> Result<ScheduleConfig, DomainError> {
        let base = match self.total_turns {
            Some(total) => ScheduleConfig::new(
                total,
                roster_len,
                total.checked_sub(roster_len).filter(|s| *s > 0),
            )?,
            None => ScheduleConfig::for_roster(roster_len, self.rounds)?,
        };
        let summary_after = if self.disable_summary {
            None
        } else {
            self.summary_after.or(base.summary_after())
        };
        ScheduleConfig::new(base.total_turns(), roster_len, summary_after)
    }
}

/// Raw pacing and selection parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiscussionConfig {
    pub turn_delay_ms: u64,
    pub summary_delay_ms: u64,
    /// Per-step limit; `None` waits forever
    pub step_timeout_seconds: Option<u64>,
    /// Backend id used for the interim summary
    pub summary_backend: Option<String>,
    /// Seed for reproducible assignment and moderator choice
    pub seed: Option<u64>,
}

impl Default for FileDiscussionConfig {
    fn default() -> Self {
        Self {
            turn_delay_ms: 1000,
            summary_delay_ms: 1500,
            step_timeout_seconds: Some(60),
            summary_backend: None,
            seed: None,
        }
    }
}

impl FileDiscussionConfig {
    pub fn to_params(&self) -> DiscussionParams {
        let mut params = DiscussionParams::default()
            .with_turn_delay(Duration::from_millis(self.turn_delay_ms))
            .with_summary_delay(Duration::from_millis(self.summary_delay_ms))
            .with_step_timeout(self.step_timeout_seconds.map(Duration::from_secs));
        if let Some(id) = &self.summary_backend {
            params = params.with_summary_binding(id.as_str());
        }
        if let Some(seed) = self.seed {
            params = params.with_seed(seed);
        }
        params
    }
}
