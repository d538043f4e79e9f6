// mod.rs - Clustering core: scores, distances, density labels, representatives

pub mod alignment;
pub mod clustering;
pub mod distance;
pub mod matrix;
pub mod parallel;
pub mod representatives;
pub mod scoring;

// Re-export main types for convenience
pub use alignment::{AlignmentConfig, AlignmentMode};
pub use clustering::{effective_min_samples, DensityClusterer, MIN_CLUSTER_SIZE};
pub use distance::{score_to_distance, DistanceMetric};
pub use matrix::{DistanceMatrix, ScoreMatrix, SquareMatrix};
pub use representatives::{assignments, select_representatives, ClusterAssignment, RepresentativeSet};
pub use scoring::{resolve_engine, ScoreMatrixBuilder};
