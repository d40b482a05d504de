//! Generation call vocabulary.
//!
//! - [`entities::Message`] — a history entry sent to a backend
//! - [`stream::StreamEvent`] — an event of a streaming response

pub mod entities;
pub mod stream;
