//! Progress notification port
//!
//! Defines the interface for reporting progress while a discussion runs.

use roundtable_domain::{
    AgentRegistry, BackendBinding, ConversationTranscript, Persona, SlotAssignment, StepKind,
};

/// Identifies the generation step that is running
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepContext {
    pub kind: StepKind,
    /// Zero-based turn index for speaker steps
    pub turn: Option<usize>,
    /// The persona speaking, for speaker steps
    pub persona: Option<Persona>,
    pub binding: BackendBinding,
}

impl StepContext {
    /// Label for the producer of this step's text
    pub fn speaker_label(&self) -> &str {
        match (&self.kind, &self.persona) {
            (StepKind::Speaker, Some(persona)) => persona.name(),
            (kind, _) => kind.label(),
        }
    }
}

/// How a step ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Text was committed to the transcript
    Committed,
    /// The stream completed with no text; nothing was committed
    Empty,
    /// The backend failed or timed out; nothing was committed
    Failed(String),
}

impl StepOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, StepOutcome::Committed)
    }
}

/// Callback for progress updates during a discussion
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (streaming console, spinners, etc.)
pub trait DiscussionProgress: Send + Sync {
    /// Called once the session's slot assignment is known
    fn on_assignment(&self, _registry: &AgentRegistry, _assignment: &SlotAssignment) {}

    /// Called when a generation step starts
    fn on_step_start(&self, step: &StepContext);

    /// Called for each text fragment of the running step
    fn on_chunk(&self, _step: &StepContext, _chunk: &str) {}

    /// Called when a step ends, whatever the outcome
    fn on_step_complete(&self, step: &StepContext, outcome: &StepOutcome);

    /// Called when the session reaches `Done`
    fn on_discussion_complete(&self, _transcript: &ConversationTranscript) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DiscussionProgress for NoProgress {
    fn on_step_start(&self, _step: &StepContext) {}
    fn on_step_complete(&self, _step: &StepContext, _outcome: &StepOutcome) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::Provider;

    #[test]
    fn test_speaker_label() {
        let binding = BackendBinding::new("gpt", Provider::OpenAi, "gpt-4o");
        let speaker = StepContext {
            kind: StepKind::Speaker,
            turn: Some(0),
            persona: Some(Persona::new("optimist", "Sunny", "...")),
            binding: binding.clone(),
        };
        assert_eq!(speaker.speaker_label(), "Sunny");

        let moderator = StepContext {
            kind: StepKind::Moderator,
            turn: None,
            persona: None,
            binding,
        };
        assert_eq!(moderator.speaker_label(), "Moderator");
    }
}
