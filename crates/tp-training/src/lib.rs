//! # tp-training
//!
//! Driver for one training job.
//!
//! The actual model training happens in an external trainer engine,
//! consumed through the [`Trainer`] trait. This crate owns everything
//! around it: staging the job directory from remote storage, preparing
//! the trainer configuration, relaying progress and kill signals, and
//! pushing results back when the job survives to completion.

mod driver;
mod task;
mod trainer;

pub use driver::run_training;
pub use task::TrainingTask;
pub use trainer::{Trainer, TrainerOptions, TrainingRun};

use thiserror::Error;
use tp_storage::StorageError;

/// Errors from driving one training job.
#[derive(Debug, Error)]
pub enum TrainingError {
    /// Staging, sync, or upload against remote storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Local filesystem preparation of the staging directory failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The external trainer failed or went away without an outcome.
    #[error("trainer failed: {0}")]
    Trainer(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
pub(crate) mod test_support;
