//! Schedule configuration

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Number of full roster cycles in a default discussion
pub const DEFAULT_ROUNDS: usize = 3;

/// Fixed shape of a discussion (Value Object)
///
/// - `total_turns` — speaking turns before the moderator closes
/// - `cycle_length` — turn `n` belongs to roster position `n mod cycle_length`
/// - `summary_after` — the mid-summary is inserted before this turn index;
///   `None` disables it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    total_turns: usize,
    cycle_length: usize,
    summary_after: Option<usize>,
}

impl ScheduleConfig {
    pub fn new(
        total_turns: usize,
        cycle_length: usize,
        summary_after: Option<usize>,
    ) -> Result<Self, DomainError> {
        if total_turns == 0 {
            return Err(DomainError::InvalidSchedule(
                "total_turns must be at least 1".to_string(),
            ));
        }
        if cycle_length == 0 {
            return Err(DomainError::InvalidSchedule(
                "cycle_length must be at least 1".to_string(),
            ));
        }
        if let Some(s) = summary_after
            && (s == 0 || s >= total_turns)
        {
            return Err(DomainError::InvalidSchedule(format!(
                "summary_after must be between 1 and {} (got {})",
                total_turns - 1,
                s
            )));
        }
        Ok(Self {
            total_turns,
            cycle_length,
            summary_after,
        })
    }

    /// `rounds` full cycles over the roster, summary before the last round.
    ///
    /// A single round has no room for a summary, so it gets none.
    pub fn for_roster(roster_len: usize, rounds: usize) -> Result<Self, DomainError> {
        let total = roster_len.checked_mul(rounds).ok_or_else(|| {
            DomainError::InvalidSchedule(format!(
                "{} rounds over {} personas is too many turns",
                rounds, roster_len
            ))
        })?;
        let summary_after = (rounds > 1).then(|| total - roster_len);
        Self::new(total, roster_len, summary_after)
    }

    pub fn total_turns(&self) -> usize {
        self.total_turns
    }

    pub fn cycle_length(&self) -> usize {
        self.cycle_length
    }

    pub fn summary_after(&self) -> Option<usize> {
        self.summary_after
    }

    /// Roster position speaking at `turn`
    pub fn slot_for(&self, turn: usize) -> usize {
        turn % self.cycle_length
    }

    /// Every slot the schedule will ask for must exist in the roster
    pub fn check_roster(&self, roster_len: usize) -> Result<(), DomainError> {
        if self.cycle_length > roster_len {
            return Err(DomainError::MissingPersona(roster_len));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_roster_matches_three_rounds() {
        let config = ScheduleConfig::for_roster(3, DEFAULT_ROUNDS).unwrap();
        assert_eq!(config.total_turns(), 9);
        assert_eq!(config.cycle_length(), 3);
        assert_eq!(config.summary_after(), Some(6));
    }

    #[test]
    fn test_single_round_has_no_summary() {
        let config = ScheduleConfig::for_roster(4, 1).unwrap();
        assert_eq!(config.total_turns(), 4);
        assert_eq!(config.summary_after(), None);
    }

    #[test]
    fn test_summary_index_must_be_inside_schedule() {
        assert!(ScheduleConfig::new(9, 3, Some(0)).is_err());
        assert!(ScheduleConfig::new(9, 3, Some(9)).is_err());
        assert!(ScheduleConfig::new(9, 3, Some(8)).is_ok());
        assert!(ScheduleConfig::new(9, 3, None).is_ok());
    }

    #[test]
    fn test_zero_sizes_rejected() {
        assert!(ScheduleConfig::new(0, 3, None).is_err());
        assert!(ScheduleConfig::new(3, 0, None).is_err());
        assert!(ScheduleConfig::for_roster(0, 3).is_err());
    }

    #[test]
    fn test_round_overflow_rejected() {
        assert!(matches!(
            ScheduleConfig::for_roster(3, usize::MAX),
            Err(DomainError::InvalidSchedule(_))
        ));
    }

    #[test]
    fn test_slot_wraps_by_cycle() {
        let config = ScheduleConfig::new(9, 3, Some(6)).unwrap();
        let slots: Vec<usize> = (0..9).map(|n| config.slot_for(n)).collect();
        assert_eq!(slots, vec![0, 1, 2, 0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_check_roster() {
        let config = ScheduleConfig::new(6, 3, None).unwrap();
        assert!(config.check_roster(3).is_ok());
        assert!(config.check_roster(5).is_ok());
        assert_eq!(
            config.check_roster(2).unwrap_err(),
            DomainError::MissingPersona(2)
        );
    }
}
