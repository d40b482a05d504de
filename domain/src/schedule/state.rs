//! Scheduler state machine
//!
//! [`Schedule`] is the pure decision core of a discussion: it knows which
//! step comes next and how each finished step moves the session forward.
//! It never talks to a backend; the application layer drives it.
//!
//! ```text
//! NotStarted ──begin──▶ AwaitingTurn(0)
//! AwaitingTurn(n), n == S, summary pending ──▶ AwaitingSummary ──▶ StreamingSummary
//!     StreamingSummary ──complete──▶ AwaitingTurn(S)     (S is not skipped)
//! AwaitingTurn(n), n < T ──▶ Streaming(n) ──complete──▶ AwaitingTurn(n + 1)
//! AwaitingTurn(T) ──▶ AwaitingModerator ──▶ StreamingModerator ──complete──▶ Done
//! ```
//!
//! A step "completes" whether it committed text, produced nothing, or
//! failed; the outcome only decides what is appended to the transcript.

use super::config::ScheduleConfig;
use super::step::ScheduleStep;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Where a session currently is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "turn", rename_all = "snake_case")]
pub enum SchedulerState {
    #[default]
    NotStarted,
    AwaitingTurn(usize),
    Streaming(usize),
    AwaitingSummary,
    StreamingSummary,
    AwaitingModerator,
    StreamingModerator,
    Done,
}

impl SchedulerState {
    /// A session is active from `begin` until it reaches `Done`
    pub fn is_active(&self) -> bool {
        !matches!(self, SchedulerState::NotStarted | SchedulerState::Done)
    }
}

impl std::fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerState::NotStarted => write!(f, "not started"),
            SchedulerState::AwaitingTurn(n) => write!(f, "awaiting turn {}", n),
            SchedulerState::Streaming(n) => write!(f, "streaming turn {}", n),
            SchedulerState::AwaitingSummary => write!(f, "awaiting summary"),
            SchedulerState::StreamingSummary => write!(f, "streaming summary"),
            SchedulerState::AwaitingModerator => write!(f, "awaiting moderator"),
            SchedulerState::StreamingModerator => write!(f, "streaming moderator"),
            SchedulerState::Done => write!(f, "done"),
        }
    }
}

/// Cursor over a [`ScheduleConfig`]
#[derive(Debug, Clone)]
pub struct Schedule {
    config: ScheduleConfig,
    state: SchedulerState,
    summary_inserted: bool,
}

impl Schedule {
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            config,
            state: SchedulerState::NotStarted,
            summary_inserted: false,
        }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn summary_inserted(&self) -> bool {
        self.summary_inserted
    }

    /// `NotStarted` → `AwaitingTurn(0)`
    pub fn begin(&mut self) -> Result<(), DomainError> {
        match self.state {
            SchedulerState::NotStarted => {
                self.state = SchedulerState::AwaitingTurn(0);
                Ok(())
            }
            other => Err(DomainError::InvalidTransition(other.to_string())),
        }
    }

    /// Resolve the next step and move into its streaming state.
    ///
    /// Only valid from an awaiting state or `Done`; calling it while a step
    /// is still streaming is a re-entrancy bug and returns an error.
    pub fn next_step(&mut self) -> Result<ScheduleStep, DomainError> {
        loop {
            match self.state {
                SchedulerState::AwaitingTurn(n)
                    if self.config.summary_after() == Some(n) && !self.summary_inserted =>
                {
                    self.state = SchedulerState::AwaitingSummary;
                }
                SchedulerState::AwaitingTurn(n) if n < self.config.total_turns() => {
                    self.state = SchedulerState::Streaming(n);
                    return Ok(ScheduleStep::Speak {
                        turn: n,
                        slot: self.config.slot_for(n),
                    });
                }
                SchedulerState::AwaitingTurn(_) => {
                    self.state = SchedulerState::AwaitingModerator;
                }
                SchedulerState::AwaitingSummary => {
                    self.state = SchedulerState::StreamingSummary;
                    let before_turn = self.config.summary_after().unwrap_or_default();
                    return Ok(ScheduleStep::MidSummary { before_turn });
                }
                SchedulerState::AwaitingModerator => {
                    self.state = SchedulerState::StreamingModerator;
                    return Ok(ScheduleStep::Moderate);
                }
                SchedulerState::Done => return Ok(ScheduleStep::Finished),
                other => return Err(DomainError::InvalidTransition(other.to_string())),
            }
        }
    }

    /// Finish the step that is currently streaming, whatever its outcome
    pub fn complete_step(&mut self) -> Result<(), DomainError> {
        self.state = match self.state {
            SchedulerState::Streaming(n) => SchedulerState::AwaitingTurn(n + 1),
            SchedulerState::StreamingSummary => {
                self.summary_inserted = true;
                SchedulerState::AwaitingTurn(self.config.summary_after().unwrap_or_default())
            }
            SchedulerState::StreamingModerator => SchedulerState::Done,
            other => return Err(DomainError::InvalidTransition(other.to_string())),
        };
        Ok(())
    }
}
