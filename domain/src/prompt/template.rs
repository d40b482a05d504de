//! Prompt templates for the discussion flow

use super::{PromptBuilder, TurnMetadata};
use crate::core::string::truncate_with_ellipsis;
use crate::roster::registry::AgentRegistry;
use crate::transcript::record::{RecordRole, TurnRecord};
use std::sync::Arc;

/// Longest quote of the previous speaker in a turn cue, in characters
const LAST_SPEAKER_QUOTE_LEN: usize = 80;

/// Fixed prompt texts
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the interim summary
    pub fn summary_system() -> &'static str {
        r#"You are the moderator of a lively panel discussion, stepping in halfway through.
Briefly recap where each participant stands, name the sharpest point of disagreement,
and pose one pointed question that pushes the panel forward.
Keep it under five sentences and do not take sides."#
    }

    /// System prompt for the closing synthesis
    pub fn moderator_system() -> &'static str {
        r#"You are the moderator closing a panel discussion.
Summarize the main positions, highlight where participants agreed and where they clashed,
and finish with a short, balanced verdict on the topic.
Refer to participants by name. Be concise and use clear markdown headers."#
    }

    /// Cue for a speaker's turn
    pub fn speaker_cue(name: &str) -> String {
        format!(
            r#"It's your turn now. React as {} would!
- Respond to the previous speaker first
- Stay true to your personality
- Keep it short: 2-3 sentences"#,
            name
        )
    }

    /// Request appended to the interim summary log
    pub fn summary_request() -> &'static str {
        "Give an interim summary of the discussion so far."
    }

    /// Request appended to the closing synthesis log
    pub fn moderator_request() -> &'static str {
        "The discussion is over. Deliver your closing synthesis."
    }
}

/// Default [`PromptBuilder`] rendering the transcript as a readable log.
pub struct StandardPromptBuilder {
    registry: Arc<AgentRegistry>,
}

impl StandardPromptBuilder {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self { registry }
    }

    fn speaker_name(&self, record: &TurnRecord) -> &str {
        record
            .role
            .persona()
            .and_then(|id| self.registry.persona(id))
            .map(|p| p.name())
            .unwrap_or("???")
    }

    fn log_line(&self, record: &TurnRecord) -> String {
        match &record.role {
            RecordRole::Topic => format!("[Topic] {}", record.content),
            RecordRole::Speaker { .. } => {
                format!("{}: \"{}\"", self.speaker_name(record), record.content)
            }
            RecordRole::Summary { .. } => format!("[Interim summary] \"{}\"", record.content),
            RecordRole::Moderator { .. } => format!("Moderator: \"{}\"", record.content),
        }
    }

    /// Plain conversation log, one line per non-empty record
    fn conversation_log(&self, transcript: &[TurnRecord]) -> String {
        transcript
            .iter()
            .filter(|r| !r.content.trim().is_empty())
            .map(|r| self.log_line(r))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Conversation log with each line numbered by its position
    fn numbered_log(&self, transcript: &[TurnRecord]) -> String {
        transcript
            .iter()
            .filter(|r| !r.content.trim().is_empty())
            .enumerate()
            .map(|(i, r)| match r.role {
                RecordRole::Topic => self.log_line(r),
                _ => format!("[{}] {}", i, self.log_line(r)),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn speaker_instruction(&self, transcript: &[TurnRecord], name: &str) -> String {
        let mut prompt = format!(
            "=== Conversation so far ===\n{}\n=== End of conversation ===\n\n",
            self.conversation_log(transcript)
        );

        let last_speaker = transcript
            .iter()
            .rev()
            .find(|r| r.role.is_speaker() && !r.content.trim().is_empty());
        if let Some(last) = last_speaker {
            prompt.push_str(&format!(
                "{} just said: \"{}\"\n\n",
                self.speaker_name(last),
                truncate_with_ellipsis(&last.content, LAST_SPEAKER_QUOTE_LEN)
            ));
        }

        prompt.push_str(&PromptTemplate::speaker_cue(name));
        prompt
    }
}

impl PromptBuilder for StandardPromptBuilder {
    fn system_prompt(&self, meta: &TurnMetadata<'_>) -> String {
        match meta {
            TurnMetadata::Speaker { persona, .. } => persona.instruction().to_string(),
            TurnMetadata::MidSummary { .. } => PromptTemplate::summary_system().to_string(),
            TurnMetadata::Moderator { .. } => PromptTemplate::moderator_system().to_string(),
        }
    }

    fn build_instruction(&self, transcript: &[TurnRecord], meta: &TurnMetadata<'_>) -> String {
        match meta {
            TurnMetadata::Speaker { persona, .. } => {
                self.speaker_instruction(transcript, persona.name())
            }
            TurnMetadata::MidSummary { .. } => format!(
                "The conversation so far:\n\n{}\n\n{}",
                self.numbered_log(transcript),
                PromptTemplate::summary_request()
            ),
            TurnMetadata::Moderator { .. } => format!(
                "The full conversation:\n\n{}\n\n{}",
                self.conversation_log(transcript),
                PromptTemplate::moderator_request()
            ),
        }
    }
}
