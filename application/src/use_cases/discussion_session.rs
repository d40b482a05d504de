//! Discussion session
//!
//! Control surface for a host: start a discussion in the background,
//! observe it through snapshots, wait for the outcome, or reset.

use crate::config::DiscussionParams;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{DiscussionProgress, NoProgress};
use crate::use_cases::session_snapshot::{SessionSnapshot, SnapshotPublisher};
use crate::use_cases::turn_scheduler::{DiscussionOutcome, RunDiscussionError, TurnScheduler};
use roundtable_domain::{AgentRegistry, PromptBuilder, ScheduleConfig, SlotAssignment, Topic};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

struct RunningDiscussion {
    cancel: CancellationToken,
    handle: JoinHandle<Result<DiscussionOutcome, RunDiscussionError>>,
}

/// One discussion at a time, observable through a watch channel.
pub struct DiscussionSession<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    registry: Arc<AgentRegistry>,
    prompts: Arc<dyn PromptBuilder>,
    schedule: ScheduleConfig,
    params: DiscussionParams,
    progress: Arc<dyn DiscussionProgress>,
    updates: Arc<watch::Sender<SessionSnapshot>>,
    running: Option<RunningDiscussion>,
}

impl<G: LlmGateway + 'static> DiscussionSession<G> {
    pub fn new(
        gateway: Arc<G>,
        registry: Arc<AgentRegistry>,
        prompts: Arc<dyn PromptBuilder>,
        schedule: ScheduleConfig,
        params: DiscussionParams,
    ) -> Self {
        let (updates, _) = watch::channel(SessionSnapshot::default());
        Self {
            gateway,
            registry,
            prompts,
            schedule,
            params,
            progress: Arc::new(NoProgress),
            updates: Arc::new(updates),
            running: None,
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn DiscussionProgress>) -> Self {
        self.progress = progress;
        self
    }

    /// Receive every snapshot published from now on
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.updates.borrow().clone()
    }

    /// Validate `topic`, fix the slot assignment, and start the discussion.
    ///
    /// Only allowed from a fresh or reset session.
    pub fn begin(&mut self, topic: &str) -> Result<SlotAssignment, RunDiscussionError> {
        // A finished discussion stays visible until reset
        let started = {
            let current = self.updates.borrow();
            current.state.is_active() || !current.records.is_empty()
        };
        if self.running.is_some() || started {
            return Err(RunDiscussionError::AlreadyRunning);
        }

        let topic =
            Topic::try_new(topic).map_err(|e| RunDiscussionError::InvalidTopic(e.to_string()))?;
        let cancel = CancellationToken::new();
        let mut scheduler = TurnScheduler::new(
            Arc::clone(&self.gateway),
            Arc::clone(&self.registry),
            Arc::clone(&self.prompts),
            self.schedule,
            self.params.clone(),
        )?
        .with_progress(Arc::clone(&self.progress))
        .with_publisher(SnapshotPublisher::new(
            Arc::clone(&self.updates),
            cancel.clone(),
        ));

        let assignment = scheduler.assignment().clone();
        info!(topic = %topic, "Discussion started");
        scheduler.open(topic)?;
        let handle = tokio::spawn(scheduler.drive(cancel.clone()));
        self.running = Some(RunningDiscussion { cancel, handle });

        Ok(assignment)
    }

    /// Wait for the running discussion to finish
    pub async fn wait(&mut self) -> Result<DiscussionOutcome, RunDiscussionError> {
        let running = self.running.take().ok_or(RunDiscussionError::NotStarted)?;
        match running.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(RunDiscussionError::Cancelled),
            Err(e) => Err(RunDiscussionError::Join(e.to_string())),
        }
    }

    /// Start a discussion and wait for its outcome
    pub async fn run(&mut self, topic: &str) -> Result<DiscussionOutcome, RunDiscussionError> {
        self.begin(topic)?;
        self.wait().await
    }

    /// Cancel any running discussion and return to `NotStarted`.
    ///
    /// Nothing from the cancelled run is published after this returns.
    pub fn reset(&mut self) {
        if let Some(running) = self.running.take() {
            debug!("Cancelling running discussion");
            running.cancel.cancel();
            running.handle.abort();
        }
        self.updates.send_replace(SessionSnapshot::default());
    }
}

impl<G: LlmGateway + 'static> Drop for DiscussionSession<G> {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.cancel.cancel();
            running.handle.abort();
        }
    }
}
