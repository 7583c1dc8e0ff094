//! Drives one training job end to end.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tp_config::{CloudConfig, TrainingBackend};
use tp_storage::{RemoteStorage, SyncFilter};
use tracing::{info, warn};

use crate::{TrainerOptions, TrainingError, TrainingTask, trainer::Trainer};

/// Identifier of the trainer backend in the external engine.
const TRAINER_BACKEND: &str = "decanlp";

fn trainer_config(task: &TrainingTask) -> HashMap<String, Value> {
    let task_name = if task.contextual() {
        "contextual_almond"
    } else {
        "almond"
    };
    let mut config = HashMap::new();
    config.insert(String::from("task_name"), Value::String(task_name.into()));
    config.insert(
        String::from("locale"),
        Value::String(task.language().into()),
    );
    // dataset_* keys configure dataset generation, not the trainer
    for (key, value) in task.config() {
        if key.starts_with("dataset_") {
            continue;
        }
        config.insert(key.clone(), value.clone());
    }
    config
}

/// Run one training job to completion.
///
/// Stages the job directory locally, starts the trainer, relays progress
/// and kill signals, and, unless the job was killed, uploads the trained
/// model and removes the staging directory.
///
/// # Errors
///
/// Returns `TrainingError` if staging fails, the trainer fails, or the
/// result upload fails.
pub async fn run_training(
    task: &TrainingTask,
    trainer: &dyn Trainer,
    storage: Arc<dyn RemoteStorage>,
    config: &CloudConfig,
) -> Result<(), TrainingError> {
    // A pod scheduled on a freshly started node can come up before the
    // storage credential daemonset does. The delay only applies to the
    // Kubernetes backend; local runs have no such race.
    if config.training.backend == TrainingBackend::Kubernetes {
        tokio::time::sleep(Duration::from_secs(config.training.startup_delay_secs)).await;
    }

    let jobdir = storage.download(task.job_dir()).await?;
    let datadir = jobdir.join("dataset");
    let workdir = jobdir.join("workdir");
    let outputdir = jobdir.join("output");
    for dir in [&datadir, &workdir, &outputdir] {
        tokio::fs::create_dir_all(dir).await?;
    }
    // the trainer refuses to start without a test split
    tokio::fs::write(datadir.join("test.tsv"), "").await?;

    let options = TrainerOptions {
        backend: String::from(TRAINER_BACKEND),
        locale: String::from(task.language()),
        config: trainer_config(task),
        thingpedia_url: config.platform.thingpedia_url(),
        debug: true,
        workdir: workdir.clone(),
        datadir,
        outputdir: outputdir.clone(),
    };

    info!(job_id = task.job_id(), model_tag = task.model_tag(), "starting trainer");
    let mut run = trainer.start(options).await?;

    let run_kill = run.kill_token();
    let task_kill = task.kill_token();
    let forward = tokio::spawn(async move {
        task_kill.cancelled().await;
        run_kill.cancel();
    });

    while let Some(value) = run.next_progress().await {
        task.set_progress(value);
        if let Some(tensorboard_dir) = &config.training.tensorboard_dir {
            let remote = {
                let per_job = storage.resolve(tensorboard_dir, &task.job_id().to_string());
                storage.resolve(&per_job, &format!("{}:{}", task.model_tag(), task.language()))
            };
            let storage = Arc::clone(&storage);
            let workdir = workdir.clone();
            tokio::spawn(async move {
                let filter = SyncFilter::containing("tfevents");
                if let Err(error) = storage.sync(&workdir, &remote, &filter).await {
                    warn!(%error, remote, "tensorboard sync failed");
                }
            });
        }
    }

    let outcome = run.wait().await;
    forward.abort();
    outcome?;

    if task.killed() {
        info!(job_id = task.job_id(), "job killed, leaving staging directory in place");
        return Ok(());
    }

    storage
        .upload(&outputdir, &storage.resolve(task.job_dir(), "output"))
        .await?;
    storage.remove_temporary(&jobdir).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeTrainer, RecordingStorage};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn task_with_config(config: HashMap<String, Value>, contextual: bool) -> TrainingTask {
        TrainingTask::new(42, "jobs/42", "en", "default", contextual, config)
    }

    #[tokio::test]
    async fn completion_uploads_output_then_cleans_up() {
        let staging = TempDir::new().unwrap();
        let storage = Arc::new(RecordingStorage::new(staging.path().to_path_buf()));
        let trainer = FakeTrainer::completing(vec![0.5, 1.0]);
        let task = task_with_config(HashMap::new(), false);

        run_training(&task, &trainer, storage.clone(), &CloudConfig::default())
            .await
            .unwrap();

        let jobdir = staging.path().join("jobs_42");
        let events = storage.events();
        assert_eq!(
            events,
            vec![
                String::from("download jobs/42"),
                format!("upload {} -> jobs/42/output", jobdir.join("output").display()),
                format!("remove {}", jobdir.display()),
            ]
        );
        assert_eq!(*task.watch_progress().borrow(), 1.0);
    }

    #[tokio::test]
    async fn staging_directory_is_prepared_for_the_trainer() {
        let staging = TempDir::new().unwrap();
        let storage = Arc::new(RecordingStorage::new(staging.path().to_path_buf()));
        let trainer = FakeTrainer::completing(vec![]);
        let task = task_with_config(HashMap::new(), false);

        run_training(&task, &trainer, storage, &CloudConfig::default())
            .await
            .unwrap();

        let jobdir = staging.path().join("jobs_42");
        for subdir in ["dataset", "workdir", "output"] {
            assert!(jobdir.join(subdir).is_dir(), "missing {subdir}");
        }
        let test_split = std::fs::read_to_string(jobdir.join("dataset/test.tsv")).unwrap();
        assert_eq!(test_split, "");
    }

    #[tokio::test]
    async fn trainer_config_drops_dataset_keys() {
        let staging = TempDir::new().unwrap();
        let storage = Arc::new(RecordingStorage::new(staging.path().to_path_buf()));
        let trainer = FakeTrainer::completing(vec![]);
        let mut caller_config = HashMap::new();
        caller_config.insert(String::from("train_iterations"), Value::from(1000));
        caller_config.insert(String::from("dataset_eval_probability"), Value::from(0.5));
        let task = task_with_config(caller_config, true);

        run_training(&task, &trainer, storage, &CloudConfig::default())
            .await
            .unwrap();

        let started = trainer.started.lock().unwrap();
        assert_eq!(started.len(), 1);
        let options = &started[0];
        assert_eq!(options.backend, "decanlp");
        assert_eq!(options.locale, "en");
        assert_eq!(options.thingpedia_url, "http://127.0.0.1:8080/thingpedia");
        assert_eq!(options.config["task_name"], "contextual_almond");
        assert_eq!(options.config["locale"], "en");
        assert_eq!(options.config["train_iterations"], 1000);
        assert!(!options.config.contains_key("dataset_eval_probability"));
    }

    #[tokio::test]
    async fn killed_job_skips_upload_and_cleanup() {
        let staging = TempDir::new().unwrap();
        let storage = Arc::new(RecordingStorage::new(staging.path().to_path_buf()));
        let trainer = FakeTrainer::blocking();
        let task = task_with_config(HashMap::new(), false);
        task.kill();

        run_training(&task, &trainer, storage.clone(), &CloudConfig::default())
            .await
            .unwrap();

        let events = storage.events();
        assert_eq!(events, vec![String::from("download jobs/42")]);
    }

    #[tokio::test]
    async fn progress_triggers_tensorboard_sync_when_configured() {
        let staging = TempDir::new().unwrap();
        let storage = Arc::new(RecordingStorage::new(staging.path().to_path_buf()));
        let trainer = FakeTrainer::completing(vec![0.5]);
        let task = task_with_config(HashMap::new(), false);
        let mut config = CloudConfig::default();
        config.training.tensorboard_dir = Some(String::from("tensorboard"));

        run_training(&task, &trainer, storage.clone(), &config)
            .await
            .unwrap();
        // the sync runs on a detached task
        tokio::time::sleep(Duration::from_millis(50)).await;

        let jobdir = staging.path().join("jobs_42");
        let expected = format!(
            "sync {} -> tensorboard/42/default:en [tfevents]",
            jobdir.join("workdir").display()
        );
        assert!(
            storage.events().contains(&expected),
            "missing sync event, got {:?}",
            storage.events()
        );
    }
}
