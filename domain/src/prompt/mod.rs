//! Prompt domain
//!
//! The [`PromptBuilder`] contract turns a transcript snapshot plus turn
//! metadata into the instruction for one generation call. Builders must be
//! deterministic: the same inputs always give the same text.

mod template;

pub use template::{PromptTemplate, StandardPromptBuilder};

use crate::roster::persona::Persona;
use crate::transcript::record::TurnRecord;

/// What the next generation call is for
#[derive(Debug, Clone, Copy)]
pub enum TurnMetadata<'a> {
    /// A persona's turn (`turn` is zero-based)
    Speaker {
        persona: &'a Persona,
        turn: usize,
        total_turns: usize,
    },
    /// The interim summary inserted before `before_turn`
    MidSummary {
        before_turn: usize,
        total_turns: usize,
    },
    /// The closing synthesis
    Moderator { total_turns: usize },
}

/// Builds the prompts for a generation call from the transcript.
pub trait PromptBuilder: Send + Sync {
    /// System prompt for the call (a speaker's own instruction, or a fixed
    /// prompt for summary and moderator)
    fn system_prompt(&self, meta: &TurnMetadata<'_>) -> String;

    /// The user instruction derived from the committed transcript
    fn build_instruction(&self, transcript: &[TurnRecord], meta: &TurnMetadata<'_>) -> String;
}
