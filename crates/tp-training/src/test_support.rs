//! Fakes shared by the driver tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tp_storage::{RemoteStorage, StorageError, SyncFilter};

use crate::{Trainer, TrainerOptions, TrainingError, TrainingRun};

/// A trainer that emits a fixed progress sequence and succeeds.
///
/// With `run_until_killed` set, the run emits its progress and then blocks
/// until its kill token fires.
pub(crate) struct FakeTrainer {
    pub progress_values: Vec<f64>,
    pub run_until_killed: bool,
    pub started: Mutex<Vec<TrainerOptions>>,
}

impl FakeTrainer {
    pub(crate) fn completing(progress_values: Vec<f64>) -> Self {
        Self {
            progress_values,
            run_until_killed: false,
            started: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn blocking() -> Self {
        Self {
            progress_values: vec![0.1],
            run_until_killed: true,
            started: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Trainer for FakeTrainer {
    async fn start(&self, options: TrainerOptions) -> Result<TrainingRun, TrainingError> {
        self.started.lock().unwrap().push(options);

        let (progress_tx, progress_rx) = mpsc::channel(8);
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let kill = CancellationToken::new();

        let values = self.progress_values.clone();
        let run_until_killed = self.run_until_killed;
        let run_kill = kill.clone();
        tokio::spawn(async move {
            for value in values {
                if progress_tx.send(value).await.is_err() {
                    break;
                }
            }
            if run_until_killed {
                run_kill.cancelled().await;
            }
            drop(progress_tx);
            let _ = outcome_tx.send(Ok(()));
        });

        Ok(TrainingRun::new(progress_rx, kill, outcome_rx))
    }
}

/// Storage that stages under a temp root and records every remote call.
pub(crate) struct RecordingStorage {
    staging_root: PathBuf,
    pub events: Mutex<Vec<String>>,
}

impl RecordingStorage {
    pub(crate) fn new(staging_root: PathBuf) -> Self {
        Self {
            staging_root,
            events: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteStorage for RecordingStorage {
    async fn download(&self, remote: &str) -> Result<PathBuf, StorageError> {
        self.record(format!("download {remote}"));
        let staged = self.staging_root.join(remote.replace('/', "_"));
        tokio::fs::create_dir_all(&staged).await?;
        Ok(staged)
    }

    async fn upload(&self, local: &Path, remote: &str) -> Result<(), StorageError> {
        self.record(format!("upload {} -> {remote}", local.display()));
        Ok(())
    }

    async fn sync(
        &self,
        local: &Path,
        remote: &str,
        filter: &SyncFilter,
    ) -> Result<(), StorageError> {
        let needle = filter.include_substring.clone().unwrap_or_default();
        self.record(format!("sync {} -> {remote} [{needle}]", local.display()));
        Ok(())
    }

    async fn remove_temporary(&self, local: &Path) -> Result<(), StorageError> {
        self.record(format!("remove {}", local.display()));
        Ok(())
    }

    fn resolve(&self, base: &str, segment: &str) -> String {
        format!("{}/{segment}", base.trim_end_matches('/'))
    }
}
