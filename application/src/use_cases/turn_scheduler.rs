//! Turn scheduler use case
//!
//! Drives one discussion from topic to moderator: each scheduled step is a
//! streaming generation call whose text is committed to the transcript only
//! when the stream completes with non-empty text. Backend failures are
//! absorbed; the schedule always runs to `Done` unless the run is cancelled.

use crate::config::DiscussionParams;
use crate::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use crate::ports::progress::{DiscussionProgress, NoProgress, StepContext, StepOutcome};
use crate::use_cases::interjection::Interjection;
use crate::use_cases::session_snapshot::{InProgressTurn, SnapshotPublisher};
use crate::use_cases::stream_aggregator::StreamAggregator;
use futures::StreamExt;
use rand::SeedableRng;
use rand::rngs::StdRng;
use roundtable_domain::{
    AgentRegistry, ConversationTranscript, DomainError, PromptBuilder, RecordRole, Schedule,
    ScheduleConfig, ScheduleStep, SlotAssigner, SlotAssignment, StepKind, Topic, TurnMetadata,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that stop a discussion
#[derive(Error, Debug)]
pub enum RunDiscussionError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] DomainError),

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("A discussion is already running; reset the session first")]
    AlreadyRunning,

    #[error("No discussion has been started")]
    NotStarted,

    #[error("Discussion cancelled")]
    Cancelled,

    #[error("Discussion task failed: {0}")]
    Join(String),
}

/// Result of a discussion that reached `Done`
#[derive(Debug, Clone, Serialize)]
pub struct DiscussionOutcome {
    pub transcript: ConversationTranscript,
    pub assignment: SlotAssignment,
    /// Steps whose backend failed or timed out
    pub failed_steps: usize,
}

/// Use case for running one discussion
pub struct TurnScheduler<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    registry: Arc<AgentRegistry>,
    prompts: Arc<dyn PromptBuilder>,
    params: DiscussionParams,
    progress: Arc<dyn DiscussionProgress>,
    publisher: SnapshotPublisher,
    schedule: Schedule,
    assignment: SlotAssignment,
    transcript: ConversationTranscript,
    rng: StdRng,
    failed_steps: usize,
}

impl<G: LlmGateway + 'static> TurnScheduler<G> {
    /// Validate the configuration and fix the slot assignment.
    pub fn new(
        gateway: Arc<G>,
        registry: Arc<AgentRegistry>,
        prompts: Arc<dyn PromptBuilder>,
        config: ScheduleConfig,
        params: DiscussionParams,
    ) -> Result<Self, RunDiscussionError> {
        config.check_roster(registry.roster_len())?;
        if let Some(id) = &params.summary_binding
            && registry.binding(id).is_none()
        {
            return Err(DomainError::MissingBinding(id.to_string()).into());
        }

        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let assignment = SlotAssigner::assign(registry.personas(), registry.bindings(), &mut rng)?;

        Ok(Self {
            gateway,
            registry,
            prompts,
            params,
            progress: Arc::new(NoProgress),
            publisher: SnapshotPublisher::detached(),
            schedule: Schedule::new(config),
            assignment,
            transcript: ConversationTranscript::new(),
            rng,
            failed_steps: 0,
        })
    }

    pub fn with_progress(mut self, progress: Arc<dyn DiscussionProgress>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_publisher(mut self, publisher: SnapshotPublisher) -> Self {
        self.publisher = publisher;
        self
    }

    pub fn assignment(&self) -> &SlotAssignment {
        &self.assignment
    }

    /// Record the topic and move to `AwaitingTurn(0)`.
    ///
    /// Publishes the opening snapshot before returning, so subscribers see
    /// an active session without waiting for [`drive`](Self::drive).
    pub fn open(&mut self, topic: Topic) -> Result<(), RunDiscussionError> {
        let config = *self.schedule.config();
        info!(
            turns = config.total_turns(),
            cycle = config.cycle_length(),
            summary_after = ?config.summary_after(),
            "Starting discussion"
        );

        self.transcript.append(RecordRole::Topic, topic.into_content())?;
        self.schedule.begin()?;
        self.publisher.publish(|s| {
            s.records = self.transcript.snapshot();
        });
        self.publisher.set_state(self.schedule.state());
        self.progress.on_assignment(&self.registry, &self.assignment);
        Ok(())
    }

    /// Open the discussion on `topic` and run it to `Done`
    pub async fn run(
        mut self,
        topic: Topic,
        cancel: CancellationToken,
    ) -> Result<DiscussionOutcome, RunDiscussionError> {
        self.open(topic)?;
        self.drive(cancel).await
    }

    /// Run an opened discussion to `Done`.
    ///
    /// Returns `Cancelled` as soon as `cancel` fires; no further record is
    /// committed after that point.
    pub async fn drive(
        mut self,
        cancel: CancellationToken,
    ) -> Result<DiscussionOutcome, RunDiscussionError> {
        loop {
            if cancel.is_cancelled() {
                return Err(RunDiscussionError::Cancelled);
            }

            let step = self.schedule.next_step()?;
            self.publisher.set_state(self.schedule.state());

            let pause = match step {
                ScheduleStep::Finished => break,
                ScheduleStep::Speak { turn, slot } => {
                    self.speaker_turn(turn, slot, &cancel).await?;
                    self.params.turn_delay
                }
                ScheduleStep::MidSummary { before_turn } => {
                    self.interjection(Interjection::MidSummary { before_turn }, &cancel)
                        .await?;
                    self.params.summary_delay
                }
                ScheduleStep::Moderate => {
                    self.interjection(Interjection::Moderator, &cancel).await?;
                    Duration::ZERO
                }
            };

            self.schedule.complete_step()?;
            self.publisher.set_state(self.schedule.state());

            if !pause.is_zero() {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(RunDiscussionError::Cancelled),
                    _ = tokio::time::sleep(pause) => {}
                }
            }
        }

        info!(
            records = self.transcript.len(),
            failed = self.failed_steps,
            "Discussion complete"
        );
        self.progress.on_discussion_complete(&self.transcript);

        Ok(DiscussionOutcome {
            transcript: self.transcript,
            assignment: self.assignment,
            failed_steps: self.failed_steps,
        })
    }

    /// A persona's turn on its assigned binding
    async fn speaker_turn(
        &mut self,
        turn: usize,
        slot: usize,
        cancel: &CancellationToken,
    ) -> Result<(), RunDiscussionError> {
        let persona = self
            .registry
            .persona_at(slot)
            .ok_or(DomainError::MissingPersona(slot))?
            .clone();
        let binding_id = self
            .assignment
            .binding_for(persona.id())
            .ok_or_else(|| DomainError::MissingBinding(persona.id().to_string()))?;
        let binding = self
            .registry
            .binding(binding_id)
            .ok_or_else(|| DomainError::MissingBinding(binding_id.to_string()))?
            .clone();

        let meta = TurnMetadata::Speaker {
            persona: &persona,
            turn,
            total_turns: self.schedule.config().total_turns(),
        };
        let request = GenerationRequest::with_instruction(
            self.prompts.system_prompt(&meta),
            self.prompts
                .build_instruction(self.transcript.records(), &meta),
        );
        let role = RecordRole::Speaker {
            persona: persona.id().clone(),
            binding: binding.id().clone(),
        };
        let step = StepContext {
            kind: StepKind::Speaker,
            turn: Some(turn),
            persona: Some(persona),
            binding,
        };

        self.run_step(step, role, request, cancel).await
    }

    /// The interim summary or the moderator, on a binding chosen for the step
    async fn interjection(
        &mut self,
        interjection: Interjection,
        cancel: &CancellationToken,
    ) -> Result<(), RunDiscussionError> {
        let binding = interjection
            .select_binding(
                &self.registry,
                self.params.summary_binding.as_ref(),
                &mut self.rng,
            )?
            .clone();

        let meta = interjection.metadata(self.schedule.config().total_turns());
        let request = GenerationRequest::with_instruction(
            self.prompts.system_prompt(&meta),
            self.prompts
                .build_instruction(self.transcript.records(), &meta),
        );
        let role = interjection.record_role(binding.id().clone());
        let step = StepContext {
            kind: interjection.kind(),
            turn: None,
            persona: None,
            binding,
        };

        self.run_step(step, role, request, cancel).await
    }

    /// Stream one step and commit its text if it completed non-empty
    async fn run_step(
        &mut self,
        step: StepContext,
        role: RecordRole,
        request: GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<(), RunDiscussionError> {
        debug!(kind = %step.kind, binding = %step.binding.id(), "Step started");
        self.progress.on_step_start(&step);
        self.publisher.start_step(InProgressTurn {
            kind: step.kind,
            persona: step.persona.as_ref().map(|p| p.id().clone()),
            binding: step.binding.id().clone(),
            text: String::new(),
        });

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RunDiscussionError::Cancelled),
            result = self.stream_text(&step, request) => result,
        };

        let (outcome, committed) = match result {
            Ok(text) if text.trim().is_empty() => {
                debug!(kind = %step.kind, "Step produced no text; nothing committed");
                (StepOutcome::Empty, None)
            }
            Ok(text) => {
                let record = self.transcript.append(role, text)?.clone();
                (StepOutcome::Committed, Some(record))
            }
            Err(e) => {
                warn!(
                    kind = %step.kind,
                    speaker = step.speaker_label(),
                    binding = %step.binding,
                    "Step failed: {}",
                    e
                );
                self.failed_steps += 1;
                (StepOutcome::Failed(e.to_string()), None)
            }
        };

        self.publisher.finish_step(committed);
        self.progress.on_step_complete(&step, &outcome);
        Ok(())
    }

    /// Call the backend and fold its stream, publishing the growing text.
    ///
    /// Resolves to the final text, or to the error that ended the stream.
    async fn stream_text(
        &self,
        step: &StepContext,
        request: GenerationRequest,
    ) -> Result<String, GatewayError> {
        let generation = async {
            let handle = self.gateway.generate(&step.binding, request).await?;
            let mut snapshots = StreamAggregator::run(handle.into_fragments()).boxed();
            let mut seen = 0;

            while let Some(snapshot) = snapshots.next().await {
                let snapshot = snapshot?;
                if snapshot.is_final {
                    return Ok(snapshot.text);
                }
                self.progress.on_chunk(step, &snapshot.text[seen..]);
                seen = snapshot.text.len();
                self.publisher.update_text(snapshot.text);
            }

            Err::<String, GatewayError>(GatewayError::TransportClosed)
        };

        match self.params.step_timeout {
            Some(limit) => tokio::time::timeout(limit, generation)
                .await
                .map_err(|_| GatewayError::Timeout)?,
            None => generation.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::session_snapshot::SessionSnapshot;
    use async_trait::async_trait;
    use crate::ports::llm_gateway::StreamHandle;
    use roundtable_domain::{
        BackendBinding, Persona, PersonaId, Provider, SchedulerState, StandardPromptBuilder,
        StreamEvent, TurnRecord,
    };
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{mpsc, watch};

    /// What the mock backend does on one call
    enum Reply {
        Text(Vec<&'static str>),
        Fail,
        /// Streams a fragment, then reports an error
        PartialThenError,
        /// Streams a fragment, then closes without a terminal event
        PartialThenClose,
        Hang,
    }

    /// Scripted gateway: the reply for call `i` comes from `script(i)`
    struct ScriptedGateway {
        script: Box<dyn Fn(usize) -> Reply + Send + Sync>,
        calls: AtomicUsize,
        requests: Mutex<Vec<(String, GenerationRequest)>>,
        held: Mutex<Vec<mpsc::Sender<StreamEvent>>>,
    }

    impl ScriptedGateway {
        fn new(script: impl Fn(usize) -> Reply + Send + Sync + 'static) -> Self {
            Self {
                script: Box::new(script),
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
                held: Mutex::new(Vec::new()),
            }
        }

        fn echo() -> Self {
            Self::new(|_| Reply::Text(vec!["Well, ", "I think ", "so."]))
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn generate(
            &self,
            binding: &BackendBinding,
            request: GenerationRequest,
        ) -> Result<StreamHandle, GatewayError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests
                .lock()
                .unwrap()
                .push((binding.id().to_string(), request));

            match (self.script)(call) {
                Reply::Text(chunks) => {
                    let full: String = chunks.concat();
                    let mut events: Vec<_> = chunks
                        .into_iter()
                        .map(|c| StreamEvent::Delta(c.to_string()))
                        .collect();
                    events.push(StreamEvent::Completed(full));
                    Ok(StreamHandle::from_events(events))
                }
                Reply::Fail => Err(GatewayError::ConnectionError("refused".to_string())),
                Reply::PartialThenError => Ok(StreamHandle::from_events(vec![
                    StreamEvent::Delta("PARTIAL".to_string()),
                    StreamEvent::Error("boom".to_string()),
                ])),
                Reply::PartialThenClose => Ok(StreamHandle::from_events(vec![
                    StreamEvent::Delta("PARTIAL".to_string()),
                ])),
                Reply::Hang => {
                    let (tx, rx) = mpsc::channel(1);
                    self.held.lock().unwrap().push(tx);
                    Ok(StreamHandle::new(rx))
                }
            }
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl DiscussionProgress for RecordingProgress {
        fn on_step_start(&self, step: &StepContext) {
            self.events
                .lock()
                .unwrap()
                .push(format!("start {}", step.speaker_label()));
        }

        fn on_chunk(&self, _step: &StepContext, chunk: &str) {
            self.events.lock().unwrap().push(format!("chunk {}", chunk));
        }

        fn on_step_complete(&self, step: &StepContext, outcome: &StepOutcome) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done {} {:?}", step.speaker_label(), outcome));
        }
    }

    fn registry(pool: usize) -> Arc<AgentRegistry> {
        let personas = vec![
            Persona::new("optimist", "Sunny", "Always look on the bright side."),
            Persona::new("pessimist", "Gloomy", "Expect the worst."),
            Persona::new("meme", "Doge", "Answer in memes."),
        ];
        let bindings = vec![
            BackendBinding::new("gpt", Provider::OpenAi, "gpt-4o"),
            BackendBinding::new("claude", Provider::Anthropic, "claude-sonnet"),
            BackendBinding::new("gemini", Provider::Google, "gemini-pro"),
        ];
        Arc::new(AgentRegistry::new(personas, bindings.into_iter().take(pool).collect()).unwrap())
    }

    fn scheduler(
        gateway: Arc<ScriptedGateway>,
        registry: Arc<AgentRegistry>,
        config: ScheduleConfig,
    ) -> TurnScheduler<ScriptedGateway> {
        let prompts = Arc::new(StandardPromptBuilder::new(Arc::clone(&registry)));
        TurnScheduler::new(
            gateway,
            registry,
            prompts,
            config,
            DiscussionParams::default().without_delays().with_seed(7),
        )
        .unwrap()
    }

    fn standard_config() -> ScheduleConfig {
        ScheduleConfig::new(9, 3, Some(6)).unwrap()
    }

    fn topic() -> Topic {
        Topic::try_new("Is pineapple acceptable on pizza?").unwrap()
    }

    fn roles(records: &[TurnRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| match r.role.persona() {
                Some(p) => format!("speaker:{}", p),
                None => r.role.as_str().to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_full_discussion_order() {
        let gateway = Arc::new(ScriptedGateway::echo());
        let outcome = scheduler(Arc::clone(&gateway), registry(3), standard_config())
            .run(topic(), CancellationToken::new())
            .await
            .unwrap();

        let records = outcome.transcript.records();
        assert_eq!(records.len(), 12);
        assert_eq!(
            roles(records),
            vec![
                "topic",
                "speaker:optimist",
                "speaker:pessimist",
                "speaker:meme",
                "speaker:optimist",
                "speaker:pessimist",
                "speaker:meme",
                "summary",
                "speaker:optimist",
                "speaker:pessimist",
                "speaker:meme",
                "moderator",
            ]
        );
        assert_eq!(records[1].content, "Well, I think so.");
        assert!(records.windows(2).all(|w| w[0].ordinal < w[1].ordinal));
        assert_eq!(outcome.failed_steps, 0);
        assert_eq!(gateway.call_count(), 11);
    }

    #[tokio::test]
    async fn test_speakers_use_assigned_bindings() {
        let gateway = Arc::new(ScriptedGateway::echo());
        let outcome = scheduler(Arc::clone(&gateway), registry(2), standard_config())
            .run(topic(), CancellationToken::new())
            .await
            .unwrap();

        for record in outcome.transcript.records() {
            if let RecordRole::Speaker { persona, binding } = &record.role {
                assert_eq!(outcome.assignment.binding_for(persona), Some(binding));
            }
        }

        let counts = outcome.assignment.usage_counts();
        assert_eq!(counts.len(), 2);
        let mut usage: Vec<_> = counts.values().copied().collect();
        usage.sort();
        assert_eq!(usage, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_failed_turn_leaves_no_record() {
        // Call 4 is the fifth speaker turn (turn index 4)
        let gateway = Arc::new(ScriptedGateway::new(|call| {
            if call == 4 {
                Reply::Fail
            } else {
                Reply::Text(vec!["fine"])
            }
        }));
        let outcome = scheduler(gateway, registry(3), standard_config())
            .run(topic(), CancellationToken::new())
            .await
            .unwrap();

        let records = outcome.transcript.records();
        assert_eq!(records.len(), 11);
        assert_eq!(outcome.failed_steps, 1);
        assert_eq!(records.last().unwrap().role.as_str(), "moderator");
        assert_eq!(
            roles(&records[4..6]),
            vec!["speaker:optimist", "speaker:meme"]
        );
    }

    #[tokio::test]
    async fn test_stream_breaking_midway_commits_nothing() {
        // Call 1 is turn 1; call 10 is the moderator
        let gateway = Arc::new(ScriptedGateway::new(|call| match call {
            1 => Reply::PartialThenError,
            10 => Reply::PartialThenClose,
            _ => Reply::Text(vec!["fine"]),
        }));
        let progress = Arc::new(RecordingProgress::default());
        let (sender, receiver) = watch::channel(SessionSnapshot::default());
        let publisher = SnapshotPublisher::new(Arc::new(sender), CancellationToken::new());

        let outcome = scheduler(gateway, registry(3), standard_config())
            .with_progress(progress.clone())
            .with_publisher(publisher)
            .run(topic(), CancellationToken::new())
            .await
            .unwrap();

        let records = outcome.transcript.records();
        assert_eq!(outcome.failed_steps, 2);
        assert_eq!(records.len(), 10);
        assert!(records.iter().all(|r| !r.content.contains("PARTIAL")));
        assert!(
            records
                .iter()
                .all(|r| !matches!(r.role, RecordRole::Moderator { .. }))
        );

        let snapshot = receiver.borrow().clone();
        assert!(snapshot.in_progress.is_none());
        assert_eq!(snapshot.state, SchedulerState::Done);
        assert!(
            snapshot
                .records
                .iter()
                .all(|r| !r.content.contains("PARTIAL"))
        );

        let events = progress.events.lock().unwrap();
        assert!(events.contains(&"chunk PARTIAL".to_string()));
        assert!(events.contains(&format!(
            "done Gloomy {:?}",
            StepOutcome::Failed("Request failed: boom".to_string())
        )));
        assert!(events.contains(&format!(
            "done Moderator {:?}",
            StepOutcome::Failed("Transport closed".to_string())
        )));
    }

    #[tokio::test]
    async fn test_empty_completion_is_not_committed() {
        let gateway = Arc::new(ScriptedGateway::new(|call| {
            if call == 0 {
                Reply::Text(vec!["  ", "\n"])
            } else {
                Reply::Text(vec!["something"])
            }
        }));
        let outcome = scheduler(gateway, registry(3), standard_config())
            .run(topic(), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.transcript.len(), 11);
        assert_eq!(outcome.failed_steps, 0);
        assert!(
            outcome
                .transcript
                .records()
                .iter()
                .all(|r| !r.content.trim().is_empty())
        );
    }

    #[tokio::test]
    async fn test_every_step_failing_still_reaches_done() {
        let gateway = Arc::new(ScriptedGateway::new(|_| Reply::Fail));
        let (sender, receiver) = watch::channel(SessionSnapshot::default());
        let publisher = SnapshotPublisher::new(Arc::new(sender), CancellationToken::new());

        let outcome = scheduler(gateway, registry(3), standard_config())
            .with_publisher(publisher)
            .run(topic(), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(roles(outcome.transcript.records()), vec!["topic"]);
        assert_eq!(outcome.failed_steps, 11);
        assert_eq!(receiver.borrow().state, SchedulerState::Done);
    }

    #[tokio::test]
    async fn test_without_summary() {
        let gateway = Arc::new(ScriptedGateway::echo());
        let config = ScheduleConfig::new(6, 3, None).unwrap();
        let outcome = scheduler(gateway, registry(3), config)
            .run(topic(), CancellationToken::new())
            .await
            .unwrap();

        let roles = roles(outcome.transcript.records());
        assert_eq!(roles.len(), 8);
        assert!(!roles.iter().any(|r| r == "summary"));
        assert_eq!(roles.last().unwrap(), "moderator");
    }

    #[tokio::test]
    async fn test_summary_request_sees_first_turns() {
        let gateway = Arc::new(ScriptedGateway::echo());
        scheduler(Arc::clone(&gateway), registry(3), standard_config())
            .run(topic(), CancellationToken::new())
            .await
            .unwrap();

        let requests = gateway.requests.lock().unwrap();
        // Calls 0..6 are speakers, call 6 is the summary
        let (_, summary) = &requests[6];
        let instruction = &summary.messages[0].content;
        assert!(instruction.contains("Is pineapple acceptable on pizza?"));
        assert_eq!(instruction.matches("Well, I think so.").count(), 6);
    }

    #[tokio::test]
    async fn test_configured_summary_binding_is_used() {
        let gateway = Arc::new(ScriptedGateway::echo());
        let registry = registry(3);
        let prompts = Arc::new(StandardPromptBuilder::new(Arc::clone(&registry)));
        let params = DiscussionParams::default()
            .without_delays()
            .with_summary_binding("gemini");

        let outcome = TurnScheduler::new(
            Arc::clone(&gateway),
            registry,
            prompts,
            standard_config(),
            params,
        )
        .unwrap()
        .run(topic(), CancellationToken::new())
        .await
        .unwrap();

        let summary = &outcome.transcript.records()[7];
        assert_eq!(summary.role.binding().unwrap().as_str(), "gemini");
    }

    #[test]
    fn test_roster_shorter_than_cycle_is_configuration_error() {
        let gateway = Arc::new(ScriptedGateway::echo());
        let registry = registry(3);
        let prompts = Arc::new(StandardPromptBuilder::new(Arc::clone(&registry)));
        let config = ScheduleConfig::new(8, 4, None).unwrap();

        let result = TurnScheduler::new(
            gateway,
            registry,
            prompts,
            config,
            DiscussionParams::default(),
        );
        assert!(matches!(
            result,
            Err(RunDiscussionError::Configuration(DomainError::MissingPersona(3)))
        ));
    }

    #[tokio::test]
    async fn test_progress_sees_chunks_in_order() {
        let gateway = Arc::new(ScriptedGateway::echo());
        let progress = Arc::new(RecordingProgress::default());
        let config = ScheduleConfig::new(1, 1, None).unwrap();

        scheduler(gateway, registry(3), config)
            .with_progress(progress.clone())
            .run(topic(), CancellationToken::new())
            .await
            .unwrap();

        let events = progress.events.lock().unwrap();
        assert_eq!(
            &events[..5],
            &[
                "start Sunny",
                "chunk Well, ",
                "chunk I think ",
                "chunk so.",
                "done Sunny Committed",
            ]
        );
        assert_eq!(events[5], "start Moderator");
    }

    #[tokio::test]
    async fn test_snapshot_tracks_committed_records() {
        let gateway = Arc::new(ScriptedGateway::echo());
        let (sender, receiver) = watch::channel(SessionSnapshot::default());
        let publisher = SnapshotPublisher::new(Arc::new(sender), CancellationToken::new());

        let outcome = scheduler(gateway, registry(3), standard_config())
            .with_publisher(publisher)
            .run(topic(), CancellationToken::new())
            .await
            .unwrap();

        let snapshot = receiver.borrow().clone();
        assert_eq!(snapshot.records, outcome.transcript.snapshot());
        assert!(snapshot.in_progress.is_none());
        assert!(!snapshot.is_active);
        assert_eq!(snapshot.state, SchedulerState::Done);
    }

    #[tokio::test]
    async fn test_cancel_stops_streaming_step() {
        let gateway = Arc::new(ScriptedGateway::new(|call| {
            if call == 0 {
                Reply::Text(vec!["first"])
            } else {
                Reply::Hang
            }
        }));
        let cancel = CancellationToken::new();
        let task = tokio::spawn(
            scheduler(Arc::clone(&gateway), registry(3), standard_config())
                .run(topic(), cancel.clone()),
        );

        while gateway.call_count() < 2 {
            tokio::task::yield_now().await;
        }
        cancel.cancel();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(RunDiscussionError::Cancelled)));
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_timeout_counts_as_failure() {
        let gateway = Arc::new(ScriptedGateway::new(|call| {
            if call == 1 {
                Reply::Hang
            } else {
                Reply::Text(vec!["ok"])
            }
        }));
        let registry = registry(3);
        let prompts = Arc::new(StandardPromptBuilder::new(Arc::clone(&registry)));
        let params = DiscussionParams::default()
            .with_step_timeout(Some(Duration::from_secs(5)))
            .with_seed(1);

        let outcome = TurnScheduler::new(
            gateway,
            registry,
            prompts,
            ScheduleConfig::new(3, 3, None).unwrap(),
            params,
        )
        .unwrap()
        .run(topic(), CancellationToken::new())
        .await
        .unwrap();

        assert_eq!(outcome.failed_steps, 1);
        let speakers: Vec<PersonaId> = outcome
            .transcript
            .records()
            .iter()
            .filter_map(|r| r.role.persona().cloned())
            .collect();
        assert_eq!(
            speakers,
            vec![PersonaId::new("optimist"), PersonaId::new("meme")]
        );
    }
}
