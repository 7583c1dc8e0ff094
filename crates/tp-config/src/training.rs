//! Training configuration: deployment backend, telemetry sync, startup delay.

use serde::{Deserialize, Serialize};

/// Where training jobs are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingBackend {
    /// Jobs run on the local machine (also what CI uses).
    Local,
    /// Jobs run as Kubernetes pods.
    Kubernetes,
}

const fn default_startup_delay_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingConfig {
    /// Deployment backend for training jobs.
    #[serde(default = "TrainingConfig::default_backend")]
    pub backend: TrainingBackend,

    /// Remote directory that tensorboard event files are synced to during
    /// training. `None` disables the sync entirely.
    #[serde(default)]
    pub tensorboard_dir: Option<String>,

    /// Delay before staging a job on the Kubernetes backend, to tolerate the
    /// credential-propagation race when a pod lands on a freshly started node.
    #[serde(default = "default_startup_delay_secs")]
    pub startup_delay_secs: u64,
}

impl TrainingConfig {
    const fn default_backend() -> TrainingBackend {
        TrainingBackend::Local
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            backend: TrainingBackend::Local,
            tensorboard_dir: None,
            startup_delay_secs: default_startup_delay_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = TrainingConfig::default();
        assert_eq!(config.backend, TrainingBackend::Local);
        assert!(config.tensorboard_dir.is_none());
        assert_eq!(config.startup_delay_secs, 60);
    }
}
