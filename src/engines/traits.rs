// traits.rs - Capability interfaces for the external engines

use std::fmt::Debug;
use std::path::Path;

use crate::core::matrix::DistanceMatrix;
use crate::error::ClusterResult;

/// Pairwise alignment scorer.
///
/// Implementations are configured once (mode, gap penalties, substitution
/// scheme) and then called once per unordered pair from many worker threads.
/// `score(a, a)` must be the best score `a` can reach.
pub trait AlignmentEngine: Send + Sync + Debug {
    fn score(&self, a: &[u8], b: &[u8]) -> ClusterResult<f64>;

    /// Short name for logs
    fn name(&self) -> &'static str;

    fn description(&self) -> String;
}

/// Labels and reachability distances for every point, `-1` marks noise
#[derive(Debug, Clone, PartialEq)]
pub struct DensityLabels {
    pub labels: Vec<i32>,
    pub reachability: Vec<f64>,
}

/// Density clustering over a precomputed distance matrix
pub trait DensityClusteringLibrary: Send + Sync + Debug {
    fn cluster(
        &self,
        distances: &DistanceMatrix,
        min_samples: usize,
        min_cluster_size: usize,
        threads: i32,
    ) -> ClusterResult<DensityLabels>;

    fn name(&self) -> &'static str;
}

/// Greedy clustering by a fixed identity cutoff, one centroid per group
pub trait GreedyCentroidEngine: Send + Sync + Debug {
    /// Cluster the FASTA file `sequences` and write the centroids, as
    /// uncompressed FASTA, to `centroids`.
    fn cluster_by_identity(
        &self,
        sequences: &Path,
        identity: f64,
        threads: i32,
        centroids: &Path,
    ) -> ClusterResult<()>;

    fn name(&self) -> &'static str;
}
