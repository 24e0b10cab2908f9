//! Memoization of discovered tasks for one project root.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::debug;

use crate::error::Result;
use crate::task::TaskDefinition;

#[derive(Debug, Clone)]
struct CacheEntry {
    generation: u64,
    tasks: Vec<TaskDefinition>,
}

/// Hit and miss counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Caches the discovered task list until the manifest changes.
///
/// At most one computation runs at a time; callers arriving while it runs
/// wait for it and share its result. [`TaskCache::invalidate`] never waits
/// on the computation. It bumps a generation counter, so an entry written by
/// a computation that started before the bump is already stale.
pub struct TaskCache {
    root: PathBuf,
    slot: Mutex<Option<CacheEntry>>,
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TaskCache {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            slot: Mutex::new(None),
            generation: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the cached tasks, computing them with `compute` on a miss.
    ///
    /// A failed computation is not stored and yields an empty list, so the
    /// next request retries from scratch.
    pub async fn get_or_compute<F, Fut>(&self, compute: F) -> Vec<TaskDefinition>
    where
        F: FnOnce(PathBuf) -> Fut,
        Fut: Future<Output = Result<Vec<TaskDefinition>>>,
    {
        let mut slot = self.slot.lock().await;
        let generation = self.generation.load(Ordering::SeqCst);

        if let Some(entry) = slot.as_ref() {
            if entry.generation == generation {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(root = %self.root.display(), "task cache hit");
                return entry.tasks.clone();
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(root = %self.root.display(), generation, "task cache miss");

        match compute(self.root.clone()).await {
            Ok(tasks) => {
                *slot = Some(CacheEntry {
                    generation,
                    tasks: tasks.clone(),
                });
                tasks
            }
            Err(e) => {
                debug!("not caching failed discovery: {}", e);
                *slot = None;
                Vec::new()
            }
        }
    }

    /// Marks the cached tasks as stale. Idempotent.
    pub fn invalidate(&self) {
        let previous = self.generation.fetch_add(1, Ordering::SeqCst);
        debug!(root = %self.root.display(), generation = previous + 1, "task cache invalidated");
    }

    /// Returns the cached tasks if they are still current, without computing.
    pub async fn peek(&self) -> Option<Vec<TaskDefinition>> {
        let slot = self.slot.lock().await;
        let generation = self.generation.load(Ordering::SeqCst);
        slot.as_ref()
            .filter(|entry| entry.generation == generation)
            .map(|entry| entry.tasks.clone())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
