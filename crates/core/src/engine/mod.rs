//! Orchestration engine.
//!
//! The `Orchestrator` owns the four stage agents of one planning run,
//! executes them strictly in order and folds their outputs into an
//! [`OrchestrationResult`].

use crate::providers::ApiServiceManager;
use crate::request::{into_context, RequestError};
use crate::stages::summary::summarize_outputs;
use crate::stages::{default_stages, StageAgent, StageContext, StageError};
use crate::state::events::EventSink;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::Sender;
use tokio::sync::{watch, OnceCell};
use tokio::task::JoinHandle;
use tp_protocol::config_models::GlobalConfig;
use tp_protocol::ipc::Event;
use tp_protocol::planning_models::{PlanRequest, PlanningContext};
use tp_protocol::stage_models::{ProgressReport, RunState, StageKind, StageProgress};
use tp_protocol::trip_models::{OrchestrationResult, PlanResponse};
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Stages must run as planner, booking, scheduler, ui; got {0:?}")]
    StageOrder(Vec<StageKind>),
}

/// Runs one planning request through the stage pipeline.
///
/// An orchestrator executes at most once. Calling [`Orchestrator::execute`]
/// again, or concurrently, yields the result of that single run.
pub struct Orchestrator {
    run_id: Uuid,
    context: Arc<PlanningContext>,
    stages: Vec<Box<dyn StageAgent>>,
    stage_timeout: Duration,
    state: watch::Sender<RunState>,
    result: OnceCell<OrchestrationResult>,
    events: EventSink,
}

impl Orchestrator {
    /// Create an orchestrator with the standard stages.
    ///
    /// # Arguments
    ///
    /// * `context` - The validated planning context
    /// * `providers` - Shared provider facade
    /// * `config` - Engine and stage settings
    pub fn new(
        context: Arc<PlanningContext>,
        providers: Arc<ApiServiceManager>,
        config: &GlobalConfig,
    ) -> Self {
        Self::assemble(
            context,
            default_stages(&providers, config),
            Duration::from_secs(config.engine.stage_timeout_secs),
        )
    }

    /// Create an orchestrator around custom stage agents.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::StageOrder` unless the stages are exactly
    /// planner, booking, scheduler, ui in that order.
    pub fn with_stages(
        context: Arc<PlanningContext>,
        stages: Vec<Box<dyn StageAgent>>,
        stage_timeout: Duration,
    ) -> Result<Self, EngineError> {
        let kinds: Vec<StageKind> = stages.iter().map(|s| s.kind()).collect();
        if kinds != StageKind::ORDER {
            return Err(EngineError::StageOrder(kinds));
        }
        Ok(Self::assemble(context, stages, stage_timeout))
    }

    fn assemble(
        context: Arc<PlanningContext>,
        stages: Vec<Box<dyn StageAgent>>,
        stage_timeout: Duration,
    ) -> Self {
        let run_id = Uuid::new_v4();
        let (state, _rx) = watch::channel(RunState::NotStarted);
        Self {
            run_id,
            context,
            stages,
            stage_timeout,
            state,
            result: OnceCell::new(),
            events: EventSink::new(run_id, None),
        }
    }

    /// Report lifecycle events on `events_tx`.
    pub fn with_events(mut self, events_tx: Sender<Event>) -> Self {
        self.events = EventSink::new(self.run_id, Some(events_tx));
        self
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn context(&self) -> &PlanningContext {
        &self.context
    }

    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }

    /// The stored result, once the run has finished.
    pub fn result(&self) -> Option<OrchestrationResult> {
        self.result.get().cloned()
    }

    /// Execute the pipeline, or return the result of the earlier execution.
    pub async fn execute(&self) -> OrchestrationResult {
        self.result.get_or_init(|| self.run()).await.clone()
    }

    /// Overall and per-stage progress. Callable at any time.
    ///
    /// Overall progress is the integer mean of the stage values, so it only
    /// reaches 100 once every stage has completed.
    pub fn progress(&self) -> ProgressReport {
        let stages: Vec<StageProgress> = self
            .stages
            .iter()
            .map(|stage| {
                let status = stage.status();
                StageProgress {
                    stage: stage.kind(),
                    state: status.state,
                    progress: status.progress,
                    error: status.error,
                }
            })
            .collect();

        let total: usize = stages.iter().map(|s| usize::from(s.progress)).sum();
        let overall = total / stages.len().max(1);

        ProgressReport {
            run_id: self.run_id,
            state: self.state(),
            overall: u8::try_from(overall).unwrap_or(100),
            stages,
        }
    }

    #[tracing::instrument(name = "orchestration", skip(self), fields(run_id = %self.run_id))]
    async fn run(&self) -> OrchestrationResult {
        self.state.send_replace(RunState::Running);
        tracing::info!(user_id = %self.context.user_id, "run started");
        self.events
            .run_started(
                &self.context.user_id,
                self.context.preferences.destination.as_deref(),
            )
            .await;

        let mut stage_context = StageContext::new(Arc::clone(&self.context));

        for stage in &self.stages {
            let kind = stage.kind();
            self.events.log(format!("Running {kind} stage")).await;

            let forwarder = self.forward_status(stage.as_ref());
            let execution = stage.execute(&stage_context);
            let outcome = match tokio::time::timeout(self.stage_timeout, execution).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    let err = StageError::TimedOut {
                        stage: kind,
                        after: self.stage_timeout,
                    };
                    stage.abort(&err);
                    Err(err)
                }
            };
            if let Some(forwarder) = forwarder {
                forwarder.abort();
                if let Err(err) = forwarder.await {
                    if !err.is_cancelled() {
                        tracing::debug!(
                            stage = %kind,
                            error = %err,
                            "status forwarder ended abnormally"
                        );
                    }
                }
            }
            self.events.stage_update(kind, &stage.status()).await;

            match outcome {
                Ok(output) => {
                    tracing::info!(stage = %kind, "stage completed");
                    stage_context.record(output);
                }
                Err(err) => {
                    let error = err.to_string();
                    tracing::error!(stage = %kind, %error, "stage failed, aborting run");
                    self.state.send_replace(RunState::Failed);
                    self.events.run_failed(Some(kind), &error).await;
                    return OrchestrationResult::Failure {
                        error,
                        stage: Some(kind),
                    };
                }
            }
        }

        let stages = stage_context.into_outputs();
        let summary = summarize_outputs(&stages);
        tracing::info!(
            destination = %summary.destination,
            duration = summary.duration,
            total_cost = summary.total_cost,
            "run succeeded"
        );
        self.state.send_replace(RunState::Succeeded);
        self.events.run_completed().await;

        OrchestrationResult::Success { stages, summary }
    }

    /// Relay a stage's status changes to the event sink while it runs.
    fn forward_status(&self, stage: &dyn StageAgent) -> Option<JoinHandle<()>> {
        if !self.events.is_attached() {
            return None;
        }
        let kind = stage.kind();
        let mut rx = stage.tracker().subscribe();
        let events = self.events.clone();
        Some(tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let status = rx.borrow_and_update().clone();
                events.stage_update(kind, &status).await;
            }
        }))
    }
}

/// Validate a request, run it to completion and shape the response.
///
/// Never fails: validation errors and stage failures both come back as
/// `{ success: false, error }`.
pub async fn plan_trip(
    request: PlanRequest,
    providers: Arc<ApiServiceManager>,
    config: &GlobalConfig,
    events_tx: Option<Sender<Event>>,
) -> PlanResponse {
    let context = match into_context(request) {
        Ok(context) => context,
        Err(err) => {
            tracing::warn!(error = %err, "rejected plan request");
            return err.into();
        }
    };

    let mut orchestrator = Orchestrator::new(Arc::new(context), providers, config);
    if let Some(tx) = events_tx {
        orchestrator = orchestrator.with_events(tx);
    }
    orchestrator.execute().await.into()
}

impl From<RequestError> for PlanResponse {
    fn from(err: RequestError) -> Self {
        PlanResponse::failure(err.to_string())
    }
}
