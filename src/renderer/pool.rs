//! Fixed-size worker pool with a fan-out/join primitive
//!
//! Built once per process and reused every frame. Every fan-out returns
//! only after all of its jobs have finished.

use std::num::NonZeroUsize;
use std::ops::Range;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{Error, Result};

#[derive(Debug)]
pub struct WorkerPool {
    pool: ThreadPool,
    workers: usize,
}

impl WorkerPool {
    /// Create a pool with exactly `workers` threads
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(Error::InvalidSettings(
                "worker count must be at least 1".to_string(),
            ));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("raster-{i}"))
            .build()?;
        log::debug!("Worker pool started with {} threads", workers);
        Ok(Self { pool, workers })
    }

    /// Create a pool sized to the machine's available parallelism
    pub fn with_available_parallelism() -> Result<Self> {
        let workers = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Self::new(workers)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Partition `0..len` across this pool's workers
    pub fn partition(&self, len: usize) -> Vec<Range<usize>> {
        partition(len, self.workers)
    }

    /// Run `f(job_index, job)` for every job on the pool, then join.
    pub fn fan_out<T, F>(&self, jobs: Vec<T>, f: F)
    where
        T: Send,
        F: Fn(usize, T) + Sync,
    {
        match jobs.len() {
            0 => {}
            1 => {
                if let Some(job) = jobs.into_iter().next() {
                    f(0, job);
                }
            }
            _ => {
                let f = &f;
                self.pool.scope(move |s| {
                    for (i, job) in jobs.into_iter().enumerate() {
                        s.spawn(move |_| f(i, job));
                    }
                });
            }
        }
    }

    /// Parallel-for over `0..len`, one contiguous range per worker
    pub fn parallel_for<F>(&self, len: usize, f: F)
    where
        F: Fn(Range<usize>) + Sync,
    {
        self.fan_out(self.partition(len), |_, range| f(range));
    }
}

/// Split `0..len` into at most `parts` contiguous, disjoint ranges that
/// cover every index exactly once. The first `len % parts` ranges take one
/// extra element; empty ranges are omitted.
pub fn partition(len: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.max(1);
    let chunk = len / parts;
    let extra = len % parts;

    let mut ranges = Vec::with_capacity(parts.min(len));
    let mut start = 0;
    for i in 0..parts {
        let size = chunk + usize::from(i < extra);
        if size == 0 {
            continue;
        }
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}
