// lib.rs - barclust library root

//! # barclust - Alignment-distance clustering for PCR barcoding design
//!
//! Reduces a collection of full-length sequences to a small set of
//! representative flanking regions, and labels candidate primers by cluster,
//! so that downstream primer design only sees distinct sequence families.
//!
//! ## Features
//!
//! - **Parallel scoring**: symmetric pairwise score matrices built on a rayon pool
//! - **Pluggable engines**: parasail alignment, native OPTICS, vsearch centroids
//! - **Deterministic output**: identical results for any thread count
//! - **Atomic writes**: a failed step never leaves a half-written file
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use barclust::prelude::*;
//!
//! let diag = TracingDiagnostics::new("example");
//! let settings = ClusterSettings::default().validated(&diag);
//! let caps = Capabilities::native(&settings, true, &diag)?;
//!
//! let out = cluster_flanks(
//!     std::path::Path::new("genomes.fasta.gz"),
//!     Some("flanks"),
//!     &settings,
//!     &caps,
//!     &diag,
//! )?;
//! println!("kept {} left and {} right flanks", out.kept[0], out.kept[1]);
//! # Ok::<(), barclust::error::ClusterError>(())
//! ```

pub mod cli;
pub mod core;
pub mod data;
pub mod diagnostics;
pub mod engines;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod scratch;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::core::{
        score_to_distance, select_representatives, AlignmentConfig, AlignmentMode, DensityClusterer,
        DistanceMetric, ScoreMatrixBuilder,
    };
    pub use crate::data::{read_fasta, PrimerTable, SequenceRecord};
    pub use crate::diagnostics::{Diagnostics, MemoryDiagnostics, TracingDiagnostics};
    pub use crate::engines::{AlignmentEngine, DensityClusteringLibrary, GreedyCentroidEngine, NativeOptics};
    pub use crate::error::{ClusterError, ClusterResult};
    pub use crate::pipeline::{cluster_flanks, cluster_primers, Capabilities, ClusterSettings};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
