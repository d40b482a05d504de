//! Transcript domain.
//!
//! - [`record::TurnRecord`] — one committed entry, tagged by [`record::RecordRole`]
//! - [`log::ConversationTranscript`] — the append-only session log

pub mod log;
pub mod record;
