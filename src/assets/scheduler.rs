use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::foundation::error::{ScrollError, ScrollResult};

/// Unit of background work: fetch + decode one frame and post the result.
pub type LoadJob = Box<dyn FnOnce() + Send + 'static>;

/// Where frame loads run. Completions always travel back through a channel, so the
/// scheduler never touches cache state itself.
pub trait LoadScheduler: Send + Sync {
    fn spawn(&self, job: LoadJob);
}

/// Runs loads on rayon worker threads.
#[derive(Clone, Default)]
pub struct RayonScheduler {
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl RayonScheduler {
    /// Use rayon's global pool.
    pub fn global() -> Self {
        Self { pool: None }
    }

    /// Use a dedicated pool with `threads` workers.
    pub fn with_threads(threads: usize) -> ScrollResult<Self> {
        if threads == 0 {
            return Err(ScrollError::validation("loader threads must be >= 1"));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("candyscroll-load-{i}"))
            .build()
            .map_err(|e| ScrollError::validation(format!("failed to build loader pool: {e}")))?;
        Ok(Self {
            pool: Some(Arc::new(pool)),
        })
    }
}

impl std::fmt::Debug for RayonScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RayonScheduler")
            .field("dedicated_pool", &self.pool.is_some())
            .finish()
    }
}

impl LoadScheduler for RayonScheduler {
    fn spawn(&self, job: LoadJob) {
        match &self.pool {
            Some(pool) => pool.spawn(job),
            None => rayon::spawn(job),
        }
    }
}

/// Runs each load immediately on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineScheduler;

impl LoadScheduler for InlineScheduler {
    fn spawn(&self, job: LoadJob) {
        job();
    }
}

/// Queues loads until the owner explicitly runs them; models slow or stalled networks.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Arc<Mutex<VecDeque<LoadJob>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jobs waiting to run.
    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    /// Run the oldest queued job. Returns `false` when the queue was empty.
    pub fn run_next(&self) -> bool {
        let job = self.lock().pop_front();
        match job {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Run every queued job, including ones queued while draining. Returns the count.
    pub fn run_pending(&self) -> usize {
        let mut n = 0;
        while self.run_next() {
            n += 1;
        }
        n
    }

    /// Drop every queued job without running it.
    pub fn discard_pending(&self) -> usize {
        let mut q = self.lock();
        let n = q.len();
        q.clear();
        n
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<LoadJob>> {
        // A panicking job cannot leave the queue half-updated.
        self.queue
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

impl LoadScheduler for ManualScheduler {
    fn spawn(&self, job: LoadJob) {
        self.lock().push_back(job);
    }
}

/// Cooperative cancellation flag shared between a session and its in-flight loads.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/scheduler.rs"]
mod tests;
