//! Scripted stages for driving the orchestrator through edge cases.
//!
//! A `ScriptedStage` wraps a real stage and can delay it, replace its work
//! with a failure, and record when it ran.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tp_core::providers::ApiServiceManager;
use tp_core::stages::{default_stages, StageAgent, StageContext, StageError};
use tp_core::state::StageTracker;
use tp_protocol::config_models::GlobalConfig;
use tp_protocol::stage_models::StageKind;
use tp_protocol::trip_models::StageOutput;

pub type CallLog = Arc<Mutex<Vec<StageKind>>>;

pub struct ScriptedStage {
    inner: Box<dyn StageAgent>,
    delay: Option<Duration>,
    failure: Option<String>,
    calls: CallLog,
}

impl ScriptedStage {
    pub fn wrap(inner: Box<dyn StageAgent>, calls: CallLog) -> Self {
        Self {
            inner,
            delay: None,
            failure: None,
            calls,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_failure(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }
}

#[async_trait]
impl StageAgent for ScriptedStage {
    fn kind(&self) -> StageKind {
        self.inner.kind()
    }

    fn tracker(&self) -> &StageTracker {
        self.inner.tracker()
    }

    async fn run(&self, context: &StageContext) -> Result<StageOutput, StageError> {
        self.calls.lock().unwrap().push(self.kind());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.failure {
            return Err(StageError::Provider(message.clone()));
        }
        self.inner.run(context).await
    }
}

/// The standard stages on mock providers, each wrapped and logging into `calls`.
///
/// `customize` may adjust the wrapper for any stage.
pub fn scripted_stages(
    calls: &CallLog,
    customize: impl Fn(StageKind, ScriptedStage) -> ScriptedStage,
) -> Vec<Box<dyn StageAgent>> {
    let providers = Arc::new(ApiServiceManager::mock());
    default_stages(&providers, &GlobalConfig::default())
        .into_iter()
        .map(|stage| {
            let kind = stage.kind();
            let scripted = customize(kind, ScriptedStage::wrap(stage, Arc::clone(calls)));
            Box::new(scripted) as Box<dyn StageAgent>
        })
        .collect()
}
