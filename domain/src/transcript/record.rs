//! Turn records: the entries of a transcript

use crate::roster::binding::BindingId;
use crate::roster::persona::PersonaId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a record.
///
/// Speaker records always name both the persona and the binding that spoke
/// for it; summary and moderator records only name the binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RecordRole {
    Topic,
    Speaker {
        persona: PersonaId,
        binding: BindingId,
    },
    Summary {
        binding: BindingId,
    },
    Moderator {
        binding: BindingId,
    },
}

impl RecordRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordRole::Topic => "topic",
            RecordRole::Speaker { .. } => "speaker",
            RecordRole::Summary { .. } => "summary",
            RecordRole::Moderator { .. } => "moderator",
        }
    }

    pub fn is_speaker(&self) -> bool {
        matches!(self, RecordRole::Speaker { .. })
    }

    pub fn persona(&self) -> Option<&PersonaId> {
        match self {
            RecordRole::Speaker { persona, .. } => Some(persona),
            _ => None,
        }
    }

    pub fn binding(&self) -> Option<&BindingId> {
        match self {
            RecordRole::Topic => None,
            RecordRole::Speaker { binding, .. }
            | RecordRole::Summary { binding }
            | RecordRole::Moderator { binding } => Some(binding),
        }
    }
}

impl std::fmt::Display for RecordRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One committed entry of a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub ordinal: usize,
    #[serde(flatten)]
    pub role: RecordRole,
    pub content: String,
    pub committed_at: DateTime<Utc>,
}
