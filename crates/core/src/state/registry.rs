//! Registry of planning runs.
//!
//! The RunRegistry keeps one orchestrator per run, keyed by run id. Runs
//! execute in background tasks and share nothing but the provider facade.

use crate::engine::Orchestrator;
use crate::providers::ApiServiceManager;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tp_protocol::config_models::GlobalConfig;
use tp_protocol::ipc::Event;
use tp_protocol::planning_models::PlanningContext;
use tp_protocol::stage_models::ProgressReport;
use tp_protocol::trip_models::OrchestrationResult;
use uuid::Uuid;

struct RunEntry {
    orchestrator: Arc<Orchestrator>,
    task: JoinHandle<()>,
}

/// Manages all planning runs.
///
/// The RunRegistry provides a centralized interface for:
/// - Starting new runs in the background
/// - Polling their progress
/// - Collecting their results
/// - Removing finished or unwanted runs
pub struct RunRegistry {
    /// All known runs, indexed by run id.
    runs: Arc<Mutex<HashMap<Uuid, RunEntry>>>,

    providers: Arc<ApiServiceManager>,

    config: Arc<GlobalConfig>,

    /// Channel every run reports its lifecycle events on, if any.
    events_tx: Option<mpsc::Sender<Event>>,
}

impl RunRegistry {
    /// Create a new RunRegistry.
    ///
    /// # Arguments
    ///
    /// * `providers` - Provider facade shared by every run
    /// * `config` - Engine and stage settings applied to every run
    pub fn new(providers: Arc<ApiServiceManager>, config: GlobalConfig) -> Self {
        Self {
            runs: Arc::new(Mutex::new(HashMap::new())),
            providers,
            config: Arc::new(config),
            events_tx: None,
        }
    }

    pub fn with_events(mut self, events_tx: mpsc::Sender<Event>) -> Self {
        self.events_tx = Some(events_tx);
        self
    }

    /// Start a planning run in the background.
    ///
    /// # Returns
    ///
    /// The id of the new run, available for polling immediately.
    pub async fn start_run(&self, context: PlanningContext) -> Uuid {
        let mut orchestrator = Orchestrator::new(
            Arc::new(context),
            Arc::clone(&self.providers),
            &self.config,
        );
        if let Some(tx) = &self.events_tx {
            orchestrator = orchestrator.with_events(tx.clone());
        }
        let orchestrator = Arc::new(orchestrator);
        let run_id = orchestrator.run_id();

        let runner = Arc::clone(&orchestrator);
        let task = tokio::spawn(async move {
            runner.execute().await;
        });

        self.runs
            .lock()
            .await
            .insert(run_id, RunEntry { orchestrator, task });
        tracing::debug!(%run_id, "run registered");
        run_id
    }

    async fn orchestrator(&self, run_id: Uuid) -> Option<Arc<Orchestrator>> {
        self.runs
            .lock()
            .await
            .get(&run_id)
            .map(|entry| Arc::clone(&entry.orchestrator))
    }

    /// Current progress of a run, or `None` for an unknown id.
    pub async fn progress(&self, run_id: Uuid) -> Option<ProgressReport> {
        self.orchestrator(run_id).await.map(|o| o.progress())
    }

    /// Result of a run; `None` until it has finished.
    pub async fn result(&self, run_id: Uuid) -> Option<OrchestrationResult> {
        self.orchestrator(run_id).await.and_then(|o| o.result())
    }

    /// Wait for a run to finish and return its result.
    ///
    /// # Errors
    ///
    /// Returns an error if the run is not found.
    pub async fn wait(&self, run_id: Uuid) -> Result<OrchestrationResult> {
        let orchestrator = self
            .orchestrator(run_id)
            .await
            .ok_or_else(|| anyhow::anyhow!("Run {run_id} not found"))?;
        Ok(orchestrator.execute().await)
    }

    /// Progress of every run.
    pub async fn list_runs(&self) -> Vec<ProgressReport> {
        let runs = self.runs.lock().await;
        runs.values()
            .map(|entry| entry.orchestrator.progress())
            .collect()
    }

    /// Remove a run, cancelling it if it is still executing.
    ///
    /// # Errors
    ///
    /// Returns an error if the run is not found.
    pub async fn remove_run(&self, run_id: Uuid) -> Result<()> {
        let mut runs = self.runs.lock().await;
        match runs.remove(&run_id) {
            Some(entry) => {
                if !entry.task.is_finished() {
                    entry.task.abort();
                    tracing::info!(%run_id, "cancelled running plan");
                }
                Ok(())
            }
            None => Err(anyhow::anyhow!("Run {run_id} not found")),
        }
    }

    pub async fn run_count(&self) -> usize {
        self.runs.lock().await.len()
    }
}
