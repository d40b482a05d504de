//! Session snapshots published to subscribers.
//!
//! A host subscribes once and sees every committed record, the live text of
//! the step in flight, and whether the session is still running.

use roundtable_domain::{BindingId, PersonaId, SchedulerState, StepKind, TurnRecord};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Text of the step currently streaming; not part of the transcript yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InProgressTurn {
    pub kind: StepKind,
    pub persona: Option<PersonaId>,
    pub binding: BindingId,
    pub text: String,
}

/// Observable state of one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Records committed so far, in order
    pub records: Vec<TurnRecord>,
    /// Live text of the running step
    pub in_progress: Option<InProgressTurn>,
    pub state: SchedulerState,
    pub is_active: bool,
}

/// Write side of a session's snapshot channel.
///
/// Once the run's cancellation token fires, every publish is dropped, so a
/// cancelled run can never overwrite the state a reset put in place.
#[derive(Clone)]
pub struct SnapshotPublisher {
    sender: Arc<watch::Sender<SessionSnapshot>>,
    cancel: CancellationToken,
}

impl SnapshotPublisher {
    pub fn new(sender: Arc<watch::Sender<SessionSnapshot>>, cancel: CancellationToken) -> Self {
        Self { sender, cancel }
    }

    /// A publisher nobody listens to
    pub fn detached() -> Self {
        let (sender, _) = watch::channel(SessionSnapshot::default());
        Self::new(Arc::new(sender), CancellationToken::new())
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.sender.subscribe()
    }

    /// Apply `modify` to the current snapshot and notify subscribers
    pub fn publish(&self, modify: impl FnOnce(&mut SessionSnapshot)) {
        self.sender.send_if_modified(|snapshot| {
            if self.cancel.is_cancelled() {
                return false;
            }
            modify(snapshot);
            true
        });
    }

    pub fn set_state(&self, state: SchedulerState) {
        self.publish(|s| {
            s.state = state;
            s.is_active = state.is_active();
        });
    }

    pub fn start_step(&self, turn: InProgressTurn) {
        self.publish(|s| s.in_progress = Some(turn));
    }

    pub fn update_text(&self, text: String) {
        self.publish(|s| {
            if let Some(turn) = s.in_progress.as_mut() {
                turn.text = text;
            }
        });
    }

    /// Clear the live step, appending `committed` if the step produced a record
    pub fn finish_step(&self, committed: Option<TurnRecord>) {
        self.publish(|s| {
            s.in_progress = None;
            s.records.extend(committed);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_subscribers() {
        let publisher = SnapshotPublisher::detached();
        let receiver = publisher.subscribe();

        publisher.set_state(SchedulerState::AwaitingTurn(0));
        publisher.start_step(InProgressTurn {
            kind: StepKind::Speaker,
            persona: Some(PersonaId::new("optimist")),
            binding: BindingId::new("gpt"),
            text: String::new(),
        });
        publisher.update_text("Hello".to_string());

        let snapshot = receiver.borrow().clone();
        assert!(snapshot.is_active);
        assert_eq!(snapshot.in_progress.unwrap().text, "Hello");
    }

    #[test]
    fn test_cancelled_publisher_is_silent() {
        let (sender, receiver) = watch::channel(SessionSnapshot::default());
        let cancel = CancellationToken::new();
        let publisher = SnapshotPublisher::new(Arc::new(sender), cancel.clone());

        cancel.cancel();
        publisher.set_state(SchedulerState::Done);

        assert_eq!(receiver.borrow().state, SchedulerState::NotStarted);
        assert!(!receiver.has_changed().unwrap());
    }
}
