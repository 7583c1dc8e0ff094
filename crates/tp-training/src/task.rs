//! One queued training job, as seen by the driver and by observers.

use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// A training job pulled off the queue.
///
/// The job scheduler owns the task and hands the driver a reference;
/// observers subscribe to progress through [`watch_progress`] and abort
/// the job through [`kill`].
///
/// [`watch_progress`]: Self::watch_progress
/// [`kill`]: Self::kill
#[derive(Debug)]
pub struct TrainingTask {
    job_id: i64,
    job_dir: String,
    language: String,
    model_tag: String,
    contextual: bool,
    config: HashMap<String, Value>,
    kill: CancellationToken,
    progress: watch::Sender<f64>,
}

impl TrainingTask {
    /// Create a task for one job.
    ///
    /// `job_dir` is the remote storage location of the job directory;
    /// `config` is the caller-supplied trainer configuration.
    #[must_use]
    pub fn new(
        job_id: i64,
        job_dir: impl Into<String>,
        language: impl Into<String>,
        model_tag: impl Into<String>,
        contextual: bool,
        config: HashMap<String, Value>,
    ) -> Self {
        Self {
            job_id,
            job_dir: job_dir.into(),
            language: language.into(),
            model_tag: model_tag.into(),
            contextual,
            config,
            kill: CancellationToken::new(),
            progress: watch::Sender::new(0.0),
        }
    }

    #[must_use]
    pub const fn job_id(&self) -> i64 {
        self.job_id
    }

    #[must_use]
    pub fn job_dir(&self) -> &str {
        &self.job_dir
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn model_tag(&self) -> &str {
        &self.model_tag
    }

    #[must_use]
    pub const fn contextual(&self) -> bool {
        self.contextual
    }

    #[must_use]
    pub const fn config(&self) -> &HashMap<String, Value> {
        &self.config
    }

    /// Request the job be aborted.
    pub fn kill(&self) {
        self.kill.cancel();
    }

    /// Whether the job has been asked to abort.
    #[must_use]
    pub fn killed(&self) -> bool {
        self.kill.is_cancelled()
    }

    /// The kill signal, for forwarding to the trainer run.
    #[must_use]
    pub fn kill_token(&self) -> CancellationToken {
        self.kill.clone()
    }

    /// Record the latest progress value, in `0.0..=1.0`.
    pub fn set_progress(&self, value: f64) {
        self.progress.send_replace(value);
    }

    /// Subscribe to progress updates.
    #[must_use]
    pub fn watch_progress(&self) -> watch::Receiver<f64> {
        self.progress.subscribe()
    }
}
