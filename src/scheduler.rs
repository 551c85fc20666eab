//! Batched execution of independent per-trait extraction tasks.
//!
//! Work items are split into consecutive fixed-size batches; each batch is
//! submitted to a dedicated worker pool and drained behind a synchronous
//! barrier before the next batch starts. Tasks within a batch have no
//! ordering guarantee and no data dependency on each other.

use std::fmt::Display;

use log::{
    debug,
    error,
    info,
};
use rayon::ThreadPoolBuilder;

use crate::data_structs::typedef::TraitId;
use crate::error::GwasError;
use crate::extract::ExtractionMode;
use crate::utils::{
    n_threads,
    THREAD_POOL,
};

/// One unit of work: a trait and the strategy to run for it. Created once,
/// immutable, consumed by exactly one task.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub trait_id: TraitId,
    pub mode:     ExtractionMode,
}

/// Lifecycle of a single task, surfaced through the scheduler log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Completed,
    Failed,
}

impl Display for TaskState {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let str = match self {
            TaskState::Pending => "pending",
            TaskState::Running => "running",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
        };
        write!(f, "{}", str)
    }
}

/// Fixed-size-batch scheduler over an owned worker pool.
///
/// Fail-fast: any task failure inside a batch aborts the run once that
/// batch drains; remaining batches are never submitted and outputs already
/// written stay on disk.
pub struct BatchScheduler {
    batch_size: usize,
    /// `None` means tasks run on the shared [`THREAD_POOL`].
    pool:       Option<rayon::ThreadPool>,
}

impl BatchScheduler {
    /// `n_workers == 0` runs tasks on the shared crate pool (sized by
    /// `GWAS_NUM_THREADS`, or the available cores); any other value builds
    /// a dedicated pool of that size.
    pub fn try_new(
        batch_size: usize,
        n_workers: usize,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(batch_size > 0, "batch size must be positive");
        let pool = if n_workers == 0 {
            debug!("scheduler using shared pool ({} threads)", n_threads());
            None
        }
        else {
            Some(ThreadPoolBuilder::new().num_threads(n_workers).build()?)
        };
        Ok(BatchScheduler { batch_size, pool })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of batches `n_items` work items produce.
    pub fn n_batches(
        &self,
        n_items: usize,
    ) -> usize {
        n_items.div_ceil(self.batch_size)
    }

    /// Runs every work item, batch by batch.
    ///
    /// The scheduler never swallows a task error; it logs the failing trait
    /// and re-raises the first failure wrapped with its batch number.
    pub fn run<F>(
        &self,
        items: &[WorkItem],
        task: F,
    ) -> anyhow::Result<()>
    where
        F: Fn(&WorkItem) -> anyhow::Result<()> + Sync,
    {
        let pool = self.pool.as_ref().unwrap_or(&THREAD_POOL);
        let total = self.n_batches(items.len());
        info!(
            "scheduling {} work item(s) in {} batch(es) of up to {}",
            items.len(),
            total,
            self.batch_size
        );

        for (batch_idx, chunk) in items.chunks(self.batch_size).enumerate() {
            debug!(
                "batch {}/{}: {} task(s) {}",
                batch_idx + 1,
                total,
                chunk.len(),
                TaskState::Pending
            );
            let (sender, receiver) = crossbeam::channel::unbounded();

            pool.scope(|scope| {
                for item in chunk {
                    let sender = sender.clone();
                    let task = &task;
                    scope.spawn(move |_| {
                        debug!(
                            "trait {}: task {}",
                            item.trait_id,
                            TaskState::Running
                        );
                        let outcome = task(item);
                        sender.send((item.trait_id.clone(), outcome)).ok();
                    });
                }
            });
            drop(sender);

            // The pool scope is the per-batch barrier; every result is
            // already buffered once we get here.
            let mut first_failure: Option<GwasError> = None;
            for (trait_id, outcome) in receiver.iter() {
                match outcome {
                    Ok(()) => {
                        debug!(
                            "trait {}: task {}",
                            trait_id,
                            TaskState::Completed
                        )
                    },
                    Err(source) => {
                        error!(
                            "trait {}: task {} in batch {}: {:#}",
                            trait_id,
                            TaskState::Failed,
                            batch_idx + 1,
                            source
                        );
                        if first_failure.is_none() {
                            first_failure = Some(GwasError::BatchTask {
                                trait_id,
                                batch: batch_idx + 1,
                                source,
                            });
                        }
                    },
                }
            }

            if let Some(failure) = first_failure {
                return Err(failure.into());
            }
            info!("batch {}/{} completed", batch_idx + 1, total);
        }

        Ok(())
    }
}
