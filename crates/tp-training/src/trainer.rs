//! The external trainer engine, consumed via interface only.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::TrainingError;

/// Options handed to the trainer for one run.
#[derive(Debug, Clone)]
pub struct TrainerOptions {
    /// Trainer backend identifier.
    pub backend: String,
    /// BCP 47 locale of the dataset.
    pub locale: String,
    /// Backend-specific configuration.
    pub config: HashMap<String, Value>,
    /// Absolute URL of the Thingpedia API the trainer may consult.
    pub thingpedia_url: String,
    /// Emit verbose trainer output.
    pub debug: bool,
    /// Scratch directory for checkpoints and event files.
    pub workdir: PathBuf,
    /// Directory holding the prepared dataset.
    pub datadir: PathBuf,
    /// Directory the trained model is written to.
    pub outputdir: PathBuf,
}

/// A started training run.
///
/// Progress arrives on a channel that closes when the run ends; the final
/// outcome is reported separately through [`wait`](Self::wait).
#[derive(Debug)]
pub struct TrainingRun {
    progress: mpsc::Receiver<f64>,
    kill: CancellationToken,
    outcome: oneshot::Receiver<Result<(), TrainingError>>,
}

impl TrainingRun {
    #[must_use]
    pub fn new(
        progress: mpsc::Receiver<f64>,
        kill: CancellationToken,
        outcome: oneshot::Receiver<Result<(), TrainingError>>,
    ) -> Self {
        Self {
            progress,
            kill,
            outcome,
        }
    }

    /// The token that aborts this run when cancelled.
    #[must_use]
    pub fn kill_token(&self) -> CancellationToken {
        self.kill.clone()
    }

    /// The next progress value, or `None` once the run has ended.
    pub async fn next_progress(&mut self) -> Option<f64> {
        self.progress.recv().await
    }

    /// Wait for the run to end and return its outcome.
    ///
    /// # Errors
    ///
    /// The run's own error, or `TrainingError::Trainer` if the trainer
    /// went away without reporting one.
    pub async fn wait(self) -> Result<(), TrainingError> {
        match self.outcome.await {
            Ok(outcome) => outcome,
            Err(_) => Err(TrainingError::Trainer(String::from(
                "trainer exited without reporting an outcome",
            ))),
        }
    }
}

/// The external trainer engine.
#[async_trait]
pub trait Trainer: Send + Sync {
    /// Start one training run.
    ///
    /// # Errors
    ///
    /// Returns `TrainingError` if the run cannot be started.
    async fn start(&self, options: TrainerOptions) -> Result<TrainingRun, TrainingError>;
}
