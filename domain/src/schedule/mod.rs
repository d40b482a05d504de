//! Turn schedule domain.
//!
//! - [`config::ScheduleConfig`] — total turns, cycle length, summary index
//! - [`state::Schedule`] — the state machine cursor, [`state::SchedulerState`]
//! - [`step::ScheduleStep`] — the next action to execute

pub mod config;
pub mod state;
pub mod step;
