//! Worker pool for parallel layout evaluation.
//!
//! The grid layout computes row heights concurrently once column widths are
//! known. Those row tasks run on a rayon pool owned by the toolkit; this
//! module wraps rayon's pool with the toolkit's configuration and naming.
//!
//! # Example
//!
//! ```
//! use horizon_trellis_core::threadpool::{ThreadPool, ThreadPoolConfig};
//! use rayon::prelude::*;
//!
//! let pool = ThreadPool::new(ThreadPoolConfig::with_threads(2)).unwrap();
//! let heights: Vec<i32> = pool.execute(|| (0..4).into_par_iter().map(|row| row * 10).collect());
//! assert_eq!(heights, vec![0, 10, 20, 30]);
//! ```

use rayon::{ThreadPool as RayonThreadPool, ThreadPoolBuilder};

use crate::error::ThreadPoolError;
use crate::logging::targets;

/// Configuration for a [`ThreadPool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadPoolConfig {
    /// Number of worker threads. `None` means use the number of CPU cores.
    pub num_threads: Option<usize>,
    /// Name prefix for worker threads.
    pub thread_name: String,
    /// Stack size for worker threads in bytes.
    pub stack_size: Option<usize>,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            thread_name: "trellis-layout".to_string(),
            stack_size: None,
        }
    }
}

impl ThreadPoolConfig {
    /// Create a new configuration with custom thread count.
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
            ..Default::default()
        }
    }
}

/// A work-stealing pool used for the parallel row pass of grid layout.
pub struct ThreadPool {
    pool: RayonThreadPool,
}

impl ThreadPool {
    /// Create a new thread pool with the given configuration.
    pub fn new(config: ThreadPoolConfig) -> Result<Self, ThreadPoolError> {
        let name = config.thread_name;
        let mut builder = ThreadPoolBuilder::new().thread_name(move |index| format!("{name}-{index}"));

        if let Some(num_threads) = config.num_threads {
            builder = builder.num_threads(num_threads);
        }

        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let pool = builder
            .build()
            .map_err(|e| ThreadPoolError::CreationFailed(e.to_string()))?;

        tracing::debug!(
            target: targets::THREADPOOL,
            num_threads = pool.current_num_threads(),
            "created layout thread pool"
        );

        Ok(Self { pool })
    }

    /// Get the number of threads in the pool.
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Execute a closure on the thread pool and block until completion.
    ///
    /// Parallel iterators used inside `task` run on this pool's workers.
    pub fn execute<F, T>(&self, task: F) -> T
    where
        F: FnOnce() -> T + Send,
        T: Send,
    {
        self.pool.install(task)
    }
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("num_threads", &self.num_threads())
            .finish()
    }
}

static_assertions::assert_impl_all!(ThreadPool: Send, Sync);
