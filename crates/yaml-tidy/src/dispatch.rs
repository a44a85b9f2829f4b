//! run file tasks on a worker pool
//!
//! Every path becomes one independent [process_file] call on a rayon pool of `jobs` threads
//! (`0` picks one per cpu). There is no ordering between files. [Dispatcher::run] returns once
//! every task has finished and folds all outcomes into a [Report].
use crate::pipeline::Pipeline;
use crate::task::{process_file, Change, TaskOutcome, WriteMode};
use rayon::prelude::*;
use std::path::PathBuf;

#[derive(derive_new::new, Debug, Clone, Copy, Default)]
pub struct Dispatcher {
    jobs: usize,
    mode: WriteMode,
}

impl Dispatcher {
    pub fn run(&self, paths: &[PathBuf], pipeline: &Pipeline) -> Result<Report, DispatchError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .thread_name(|index| format!("yaml-tidy-{index}"))
            .build()?;

        tracing::debug!(
            files = paths.len(),
            workers = pool.current_num_threads(),
            "dispatching"
        );

        let outcomes: Vec<TaskOutcome> = pool.install(|| {
            paths
                .par_iter()
                .map(|path| process_file(path, pipeline, self.mode))
                .collect()
        });

        Ok(outcomes.into_iter().collect())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    #[error("Unable to start worker pool")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Summary of one run
///
/// Paths are sorted so the report does not depend on scheduling.
#[derive(Debug, Default, PartialEq, serde::Serialize)]
pub struct Report {
    pub processed: usize,
    pub changed: Vec<PathBuf>,
    pub unchanged: usize,
    pub failures: Vec<Failure>,
}

#[derive(Debug, PartialEq, serde::Serialize)]
pub struct Failure {
    pub path: PathBuf,
    pub reason: String,
}

impl Report {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

impl FromIterator<TaskOutcome> for Report {
    fn from_iter<I: IntoIterator<Item = TaskOutcome>>(outcomes: I) -> Self {
        let mut report = Report::default();

        for outcome in outcomes {
            report.processed += 1;
            match outcome.result {
                Ok(Change::Changed) => report.changed.push(outcome.path),
                Ok(Change::Unchanged) => report.unchanged += 1,
                Err(error) => report.failures.push(Failure {
                    path: outcome.path,
                    reason: error.to_string(),
                }),
            }
        }

        report.changed.sort();
        report.failures.sort_by(|a, b| a.path.cmp(&b.path));
        report
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "processed {} files: {} changed, {} unchanged, {} failed",
            self.processed,
            self.changed.len(),
            self.unchanged,
            self.failures.len()
        )?;

        for path in &self.changed {
            writeln!(f, "changed {}", path.display())?;
        }
        for failure in &self.failures {
            writeln!(f, "failed  {}: {}", failure.path.display(), failure.reason)?;
        }

        Ok(())
    }
}
