use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinSet;
use tracing::debug;
use x509_parser::num_bigint::BigInt;

use super::types::RevokedEntry;

pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Parallel membership test of a serial number against a CRL's revoked entries.
///
/// Entries are split into chunks of `chunk_size`; a fixed pool of at most
/// `workers` blocking tasks takes every `workers`-th chunk. All workers share
/// one `found` flag which is only ever set to `true`. The flag is read only after
/// every worker has been joined.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    workers: usize,
    chunk_size: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS, DEFAULT_CHUNK_SIZE)
    }
}

impl Evaluator {
    /// Zero values are clamped to 1
    pub fn new(workers: usize, chunk_size: usize) -> Self {
        Self {
            workers: workers.max(1),
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns `true` if any entry's serial equals `target`
    pub async fn evaluate(&self, target: &BigInt, entries: Vec<RevokedEntry>) -> bool {
        if entries.is_empty() {
            return false;
        }

        let chunk_size = self.chunk_size;
        let chunk_count = entries.len().div_ceil(chunk_size);
        let workers = self.workers.min(chunk_count);
        debug!(
            "Evaluating {} revoked entries in {} chunks across {} workers",
            entries.len(),
            chunk_count,
            workers
        );

        let entries: Arc<[RevokedEntry]> = entries.into();
        let target = Arc::new(target.clone());
        let found = Arc::new(AtomicBool::new(false));

        let mut join_set = JoinSet::new();
        for worker in 0..workers {
            let entries = Arc::clone(&entries);
            let target = Arc::clone(&target);
            let found = Arc::clone(&found);

            join_set.spawn_blocking(move || {
                for chunk in entries.chunks(chunk_size).skip(worker).step_by(workers) {
                    if found.load(Ordering::Acquire) {
                        return;
                    }
                    if chunk.iter().any(|entry| entry.serial == *target) {
                        found.store(true, Ordering::Release);
                        return;
                    }
                }
            });
        }

        // Panics inside a worker are resumed here rather than read as "not found"
        join_set.join_all().await;

        found.load(Ordering::Acquire)
    }
}
