// parallel.rs - Worker pool sizing

use crate::error::{ClusterError, ClusterResult};

/// Number of workers for a parallelism hint; zero or negative means all cores
pub fn worker_count(threads: i32) -> usize {
    if threads <= 0 {
        rayon::current_num_threads().max(1)
    } else {
        threads as usize
    }
}

/// Build a dedicated pool so a run never touches the global rayon pool
pub fn thread_pool(threads: i32) -> ClusterResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(worker_count(threads))
        .build()
        .map_err(|e| ClusterError::InvalidConfiguration(format!("Failed to configure thread pool: {}", e)))
}
