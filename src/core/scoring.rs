// scoring.rs - Pairwise alignment score matrix construction

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::core::alignment::{AlignmentConfig, AlignmentMode};
use crate::core::matrix::{ScoreMatrix, SquareMatrix};
use crate::core::parallel::thread_pool;
use crate::diagnostics::Diagnostics;
use crate::engines::{AlignmentEngine, UnweightedEngine};
use crate::error::{ClusterError, ClusterResult};

/// Pick the alignment engine for a configuration.
///
/// The unweighted mode always uses the pure Rust engine. Other modes need the
/// native engine; when it is missing the unweighted engine is substituted if
/// `allow_fallback` is set, otherwise `CapabilityUnavailable` is returned.
pub fn resolve_engine(
    config: &AlignmentConfig,
    allow_fallback: bool,
    diag: &dyn Diagnostics,
) -> ClusterResult<Box<dyn AlignmentEngine>> {
    if config.mode == AlignmentMode::Unweighted {
        return Ok(Box::new(UnweightedEngine));
    }

    match crate::engines::native_engine(config) {
        Ok(engine) => Ok(engine),
        Err(ClusterError::CapabilityUnavailable(reason)) if allow_fallback => {
            diag.warn(&format!(
                "Native alignment unavailable ({}), reverting to unweighted global match scores",
                reason
            ));
            Ok(Box::new(UnweightedEngine))
        }
        Err(e) => Err(e),
    }
}

/// Builds symmetric score matrices, one independent alignment per cell
pub struct ScoreMatrixBuilder<'a> {
    engine: &'a dyn AlignmentEngine,
    threads: i32,
    show_progress: bool,
}

impl<'a> ScoreMatrixBuilder<'a> {
    pub fn new(engine: &'a dyn AlignmentEngine) -> Self {
        Self {
            engine,
            threads: 0,
            show_progress: false,
        }
    }

    /// Worker count; zero or negative uses every core
    pub fn threads(mut self, threads: i32) -> Self {
        self.threads = threads;
        self
    }

    pub fn progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Score every unordered pair (diagonal included) and mirror the results
    pub fn build<S>(&self, sequences: &[S], diag: &dyn Diagnostics) -> ClusterResult<ScoreMatrix>
    where
        S: AsRef<[u8]> + Sync,
    {
        let n = sequences.len();
        let total_cells = n * (n + 1) / 2;
        let start = Instant::now();
        diag.info(&format!(
            "Calculating {} pairwise scores between {} sequences with {}",
            total_cells,
            n,
            self.engine.description()
        ));

        let pb = if self.show_progress {
            ProgressBar::new(total_cells as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }

        let update_interval = std::cmp::max(1, total_cells / 100);
        let progress_counter = Arc::new(AtomicUsize::new(0));
        let engine = self.engine;

        let pool = thread_pool(self.threads)?;
        let cells: Vec<(usize, usize, f64)> = pool.install(|| {
            (0..n)
                .into_par_iter()
                .flat_map(|i| {
                    let progress = progress_counter.clone();
                    let pb = pb.clone();
                    (i..n).into_par_iter().map(move |j| -> ClusterResult<(usize, usize, f64)> {
                        let score = engine.score(sequences[i].as_ref(), sequences[j].as_ref())?;

                        let count = progress.fetch_add(1, Ordering::Relaxed) + 1;
                        if count % update_interval == 0 {
                            pb.set_position(count as u64);
                        }
                        Ok((i, j, score))
                    })
                })
                .collect::<ClusterResult<Vec<_>>>()
        })?;
        pb.finish_and_clear();

        // Assemble only after every worker has returned
        let mut matrix = SquareMatrix::zeros(n);
        for (i, j, score) in cells {
            matrix.set_symmetric(i, j, score);
        }

        diag.info(&format!(
            "Score matrix computed in {:.2}s",
            start.elapsed().as_secs_f64()
        ));
        Ok(ScoreMatrix::new(matrix))
    }
}
