// mod.rs - Pipeline settings, capabilities and the shared clustering path

pub mod flanks;
pub mod primers;

pub use flanks::{cluster_flanks, flank_length, FlankOutputs, Side};
pub use primers::cluster_primers;

use std::path::PathBuf;

use crate::core::{
    assignments, score_to_distance, select_representatives, AlignmentConfig, DensityClusterer, DistanceMetric,
    RepresentativeSet, ScoreMatrixBuilder,
};
use crate::core::scoring::resolve_engine;
use crate::data::SequenceRecord;
use crate::diagnostics::Diagnostics;
use crate::engines::{
    AlignmentEngine, DensityClusteringLibrary, DensityLabels, GreedyCentroidEngine, NativeOptics, VsearchEngine,
};
use crate::error::{ClusterError, ClusterResult};
use crate::scratch::{ScratchProvider, TempScratch};

pub const DEFAULT_BORDER: usize = 400;
pub const DEFAULT_IDENTITY: f64 = 0.95;
pub const MIN_IDENTITY: f64 = 0.1;
pub const MAX_IDENTITY: f64 = 1.0;

/// Settings shared by both pipelines
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSettings {
    /// Flank length before the short-sequence adjustment
    pub border: usize,
    /// When set, flanks go through greedy identity clustering instead of OPTICS
    pub identity: Option<f64>,
    pub min_samples: usize,
    /// Worker count; zero or negative uses every core
    pub threads: i32,
    pub alignment: AlignmentConfig,
    pub metric: DistanceMetric,
    /// Use the unweighted engine when the native one is missing
    pub allow_fallback: bool,
    pub scratch: Option<PathBuf>,
    pub progress: bool,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            border: DEFAULT_BORDER,
            identity: None,
            min_samples: 2,
            threads: 0,
            alignment: AlignmentConfig::default(),
            metric: DistanceMetric::Satoh,
            allow_fallback: true,
            scratch: None,
            progress: false,
        }
    }
}

impl ClusterSettings {
    /// Correct out-of-range values, logging each correction
    pub fn validated(mut self, diag: &dyn Diagnostics) -> Self {
        if let Some(identity) = self.identity {
            let corrected = if !identity.is_finite() {
                diag.warn(&format!(
                    "Identity threshold must be a number, got {}; reverting to default={}",
                    identity, DEFAULT_IDENTITY
                ));
                DEFAULT_IDENTITY
            } else if identity < MIN_IDENTITY {
                diag.warn(&format!(
                    "Identity threshold must be between {} and {}, value {} is too low, setting to {}",
                    MIN_IDENTITY, MAX_IDENTITY, identity, MIN_IDENTITY
                ));
                MIN_IDENTITY
            } else if identity > MAX_IDENTITY {
                diag.warn(&format!(
                    "Identity threshold must be between {} and {}, value {} is too high, setting to {}",
                    MIN_IDENTITY, MAX_IDENTITY, identity, MAX_IDENTITY
                ));
                MAX_IDENTITY
            } else {
                identity
            };
            self.identity = Some(corrected);
        }

        if self.min_samples < 2 {
            diag.warn(&format!("min_samples {} is below 2, setting to 2", self.min_samples));
            self.min_samples = 2;
        }

        if self.border == 0 {
            diag.warn(&format!("Border length must be positive, reverting to default={}", DEFAULT_BORDER));
            self.border = DEFAULT_BORDER;
        }

        self
    }
}

/// The engines a pipeline run talks to
#[derive(Debug)]
pub struct Capabilities {
    pub alignment: Option<Box<dyn AlignmentEngine>>,
    pub density: Box<dyn DensityClusteringLibrary>,
    pub greedy: Box<dyn GreedyCentroidEngine>,
    pub scratch: Box<dyn ScratchProvider>,
}

impl Capabilities {
    /// Default adapters. The alignment engine is only resolved when
    /// `needs_alignment` is set, so the identity path runs without one.
    pub fn native(settings: &ClusterSettings, needs_alignment: bool, diag: &dyn Diagnostics) -> ClusterResult<Self> {
        let alignment = if needs_alignment {
            Some(resolve_engine(&settings.alignment, settings.allow_fallback, diag)?)
        } else {
            None
        };
        Ok(Self {
            alignment,
            density: Box::new(NativeOptics::default()),
            greedy: Box::new(VsearchEngine::default()),
            scratch: Box::new(TempScratch::new(settings.scratch.clone())),
        })
    }

    pub fn alignment(&self) -> ClusterResult<&dyn AlignmentEngine> {
        self.alignment
            .as_deref()
            .ok_or_else(|| ClusterError::CapabilityUnavailable("no alignment engine configured".to_string()))
    }
}

/// Scores, distances and density labels for a set of sequences
pub fn density_labels<S>(
    sequences: &[S],
    settings: &ClusterSettings,
    caps: &Capabilities,
    diag: &dyn Diagnostics,
) -> ClusterResult<DensityLabels>
where
    S: AsRef<[u8]> + Sync,
{
    if sequences.is_empty() {
        return Err(ClusterError::MissingInput("no sequences to cluster".to_string()));
    }

    let scores = ScoreMatrixBuilder::new(caps.alignment()?)
        .threads(settings.threads)
        .progress(settings.progress)
        .build(sequences, diag)?;
    let distances = score_to_distance(scores, settings.metric);

    DensityClusterer::new(caps.density.as_ref(), settings.threads).cluster(&distances, settings.min_samples, diag)
}

/// Cluster `records` and keep every noise sequence plus one per cluster
pub fn find_representatives(
    records: &[SequenceRecord],
    settings: &ClusterSettings,
    caps: &Capabilities,
    diag: &dyn Diagnostics,
) -> ClusterResult<RepresentativeSet> {
    let labels = density_labels(records, settings, caps, diag)?;
    let names: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
    Ok(select_representatives(&assignments(&labels, &names)))
}

/// `<stem>.<UTC timestamp with milliseconds>.<pid>`, used when no output
/// prefix is given
pub fn default_prefix(stem: &str) -> String {
    format!(
        "{}.{}.{}",
        stem,
        chrono::Utc::now().format("%Y%m%dT%H%M%S%.3f"),
        std::process::id()
    )
}
