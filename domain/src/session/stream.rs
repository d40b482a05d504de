//! Streaming events for generation calls.
//!
//! [`StreamEvent`] is what a backend adapter pushes while a generation call
//! is in flight. The application layer turns a sequence of these into a
//! lazy fragment stream for aggregation.

/// An event in a streaming generation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text fragment from the model.
    Delta(String),
    /// The stream ended normally. Carries the full text when the backend
    /// reports it; adapters that only stream deltas send an empty string.
    Completed(String),
    /// The backend failed mid-stream.
    Error(String),
}

impl StreamEvent {
    /// Returns the text content if this is a Delta or Completed event.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Delta(s) | StreamEvent::Completed(s) => Some(s),
            StreamEvent::Error(_) => None,
        }
    }

    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed(_) | StreamEvent::Error(_))
    }
}
