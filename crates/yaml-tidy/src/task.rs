//! tidy a single file
//!
//! [process_file] reads the whole file, runs the [Pipeline] and writes the result back to the same
//! path. It never fails past its own boundary: every problem ends up in the returned
//! [TaskOutcome] and in the log.
//!
//! The write is not atomic. A failed write can leave a partially written file behind.
use crate::pipeline::Pipeline;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    InPlace,
    /// Run the pipeline but leave the file alone
    DryRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Changed,
    Unchanged,
}

#[derive(derive_new::new, Debug)]
pub struct TaskOutcome {
    pub path: PathBuf,
    pub result: Result<Change, TaskError>,
}

impl TaskOutcome {
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum TaskError {
    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),
    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),
    #[error("transformation failed: {0}")]
    Transform(String),
}

#[tracing::instrument(level = "trace", skip(pipeline))]
pub fn process_file(path: &Path, pipeline: &Pipeline, mode: WriteMode) -> TaskOutcome {
    let result = tidy_file(path, pipeline, mode);

    match &result {
        Ok(change) => {
            tracing::info!(path=%path.display(), ?change, ?mode, "processed file")
        }
        Err(error) => {
            tracing::error!(path=%path.display(), %error, "error processing file")
        }
    }

    TaskOutcome::new(path.to_owned(), result)
}

fn tidy_file(path: &Path, pipeline: &Pipeline, mode: WriteMode) -> Result<Change, TaskError> {
    let before = std::fs::read_to_string(path).map_err(TaskError::Read)?;

    let tidied = panic::catch_unwind(AssertUnwindSafe(|| pipeline.run(&before)))
        .map_err(|payload| TaskError::Transform(panic_message(payload.as_ref())))?;

    if tidied == before {
        return Ok(Change::Unchanged);
    }

    if mode == WriteMode::InPlace {
        std::fs::write(path, tidied).map_err(TaskError::Write)?;
    }

    Ok(Change::Changed)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_owned();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "unknown panic".to_owned()
}
