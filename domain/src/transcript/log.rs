//! Conversation transcript: the append-only log of a session

use super::record::{RecordRole, TurnRecord};
use crate::core::error::DomainError;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Append-only ordered log of turn records (Aggregate)
///
/// The first record is always the topic. Records are never edited or
/// removed; a reset discards the whole transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTranscript {
    records: Vec<TurnRecord>,
}

impl ConversationTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, assigning it the next ordinal.
    ///
    /// Rejects a topic anywhere but first, anything else before the topic,
    /// and non-topic records whose content is blank.
    pub fn append(
        &mut self,
        role: RecordRole,
        content: impl Into<String>,
    ) -> Result<&TurnRecord, DomainError> {
        let content = content.into();

        match (&role, self.records.is_empty()) {
            (RecordRole::Topic, false) => return Err(DomainError::TopicAlreadySet),
            (RecordRole::Topic, true) => {}
            (_, true) => return Err(DomainError::TopicMissing),
            (other, false) => {
                if content.trim().is_empty() {
                    return Err(DomainError::EmptyRecord(other.as_str()));
                }
            }
        }

        let ordinal = self.records.len();
        self.records.push(TurnRecord {
            ordinal,
            role,
            content,
            committed_at: Utc::now(),
        });
        Ok(&self.records[ordinal])
    }

    /// Read-only copy of every record in order
    pub fn snapshot(&self) -> Vec<TurnRecord> {
        self.records.clone()
    }

    pub fn records(&self) -> &[TurnRecord] {
        &self.records
    }

    /// Most recent record produced by a speaker
    pub fn last_speaker_record(&self) -> Option<&TurnRecord> {
        self.records.iter().rev().find(|r| r.role.is_speaker())
    }

    /// Content of the topic record
    pub fn topic(&self) -> Option<&str> {
        self.records
            .first()
            .filter(|r| r.role == RecordRole::Topic)
            .map(|r| r.content.as_str())
    }

    pub fn speaker_count(&self) -> usize {
        self.records.iter().filter(|r| r.role.is_speaker()).count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::binding::BindingId;
    use crate::roster::persona::PersonaId;

    fn speaker(persona: &str) -> RecordRole {
        RecordRole::Speaker {
            persona: PersonaId::new(persona),
            binding: BindingId::new("gpt"),
        }
    }

    #[test]
    fn test_append_assigns_increasing_ordinals() {
        let mut transcript = ConversationTranscript::new();
        transcript.append(RecordRole::Topic, "Cats or dogs?").unwrap();
        transcript.append(speaker("optimist"), "Both!").unwrap();
        transcript.append(speaker("pessimist"), "Neither.").unwrap();

        let ordinals: Vec<usize> = transcript.records().iter().map(|r| r.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
        assert_eq!(transcript.topic(), Some("Cats or dogs?"));
        assert_eq!(transcript.speaker_count(), 2);
    }

    #[test]
    fn test_empty_content_rejected() {
        let mut transcript = ConversationTranscript::new();
        transcript.append(RecordRole::Topic, "Topic").unwrap();

        let err = transcript.append(speaker("optimist"), "  \n").unwrap_err();
        assert_eq!(err, DomainError::EmptyRecord("speaker"));
        let err = transcript
            .append(
                RecordRole::Moderator {
                    binding: BindingId::new("gpt"),
                },
                "",
            )
            .unwrap_err();
        assert_eq!(err, DomainError::EmptyRecord("moderator"));
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn test_topic_must_come_first_and_only_once() {
        let mut transcript = ConversationTranscript::new();
        assert_eq!(
            transcript.append(speaker("optimist"), "Hi").unwrap_err(),
            DomainError::TopicMissing
        );
        assert_eq!(transcript.topic(), None);

        transcript.append(RecordRole::Topic, "Topic").unwrap();
        assert_eq!(
            transcript.append(RecordRole::Topic, "Again").unwrap_err(),
            DomainError::TopicAlreadySet
        );
    }

    #[test]
    fn test_last_speaker_skips_summary() {
        let mut transcript = ConversationTranscript::new();
        transcript.append(RecordRole::Topic, "Topic").unwrap();
        assert!(transcript.last_speaker_record().is_none());

        transcript.append(speaker("optimist"), "First").unwrap();
        transcript
            .append(
                RecordRole::Summary {
                    binding: BindingId::new("gpt"),
                },
                "Summary so far",
            )
            .unwrap();

        let last = transcript.last_speaker_record().unwrap();
        assert_eq!(last.content, "First");
        assert_eq!(last.role.persona().unwrap().as_str(), "optimist");
    }

    #[test]
    fn test_snapshot_is_independent_copy() {
        let mut transcript = ConversationTranscript::new();
        transcript.append(RecordRole::Topic, "Topic").unwrap();
        let snapshot = transcript.snapshot();
        transcript.append(speaker("optimist"), "Later").unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(transcript.len(), 2);
    }
}
