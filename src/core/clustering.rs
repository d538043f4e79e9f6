// clustering.rs - Parameter policy around the density clustering library

use crate::core::matrix::DistanceMatrix;
use crate::diagnostics::Diagnostics;
use crate::engines::{DensityClusteringLibrary, DensityLabels};
use crate::error::{ClusterError, ClusterResult};

/// Smallest cluster the library may report
pub const MIN_CLUSTER_SIZE: usize = 2;

/// `max(2, min(requested, n / 3))`
pub fn effective_min_samples(requested: usize, n: usize) -> usize {
    requested.min(n / 3).max(2)
}

/// Assigns a label and reachability to every point of a distance matrix
pub struct DensityClusterer<'a> {
    library: &'a dyn DensityClusteringLibrary,
    threads: i32,
}

impl<'a> DensityClusterer<'a> {
    pub fn new(library: &'a dyn DensityClusteringLibrary, threads: i32) -> Self {
        Self { library, threads }
    }

    pub fn cluster(
        &self,
        distances: &DistanceMatrix,
        requested_min_samples: usize,
        diag: &dyn Diagnostics,
    ) -> ClusterResult<DensityLabels> {
        let n = distances.len();
        let min_samples = effective_min_samples(requested_min_samples, n);
        if min_samples != requested_min_samples {
            diag.warn(&format!(
                "min_samples {} adjusted to {} for {} sequences (allowed range 2..={})",
                requested_min_samples,
                min_samples,
                n,
                (n / 3).max(2)
            ));
        }

        if n == 0 {
            return Ok(DensityLabels {
                labels: Vec::new(),
                reachability: Vec::new(),
            });
        }
        if n < min_samples {
            diag.warn(&format!(
                "Only {} sequence(s), fewer than min_samples {}; every sequence is kept as noise",
                n, min_samples
            ));
            return Ok(DensityLabels {
                labels: vec![-1; n],
                reachability: vec![f64::INFINITY; n],
            });
        }

        diag.info(&format!(
            "Clustering {} sequences with {} (min_samples {}, min_cluster_size {})",
            n,
            self.library.name(),
            min_samples,
            MIN_CLUSTER_SIZE
        ));
        let raw = self
            .library
            .cluster(distances, min_samples, MIN_CLUSTER_SIZE, self.threads)?;

        if raw.labels.len() != n || raw.reachability.len() != n {
            return Err(ClusterError::tool(
                self.library.name(),
                format!(
                    "returned {} labels and {} reachabilities for {} points",
                    raw.labels.len(),
                    raw.reachability.len(),
                    n
                ),
            ));
        }

        let labels: Vec<i32> = raw.labels.into_iter().map(|l| if l < 0 { -1 } else { l }).collect();
        let clusters = labels.iter().filter(|&&l| l >= 0).max().map_or(0, |&m| m + 1);
        let noise = labels.iter().filter(|&&l| l < 0).count();
        diag.info(&format!("Found {} clusters and {} noise sequences", clusters, noise));

        Ok(DensityLabels {
            labels,
            reachability: raw.reachability,
        })
    }
}
