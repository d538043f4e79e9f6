// mod.rs - Capability interfaces and their adapters

#[cfg(feature = "parasail")]
pub mod parasail;
pub mod optics;
pub mod traits;
pub mod unweighted;
pub mod vsearch;

// Re-export main types for convenience
pub use optics::NativeOptics;
#[cfg(feature = "parasail")]
pub use parasail::ParasailEngine;
pub use traits::{AlignmentEngine, DensityClusteringLibrary, DensityLabels, GreedyCentroidEngine};
pub use unweighted::UnweightedEngine;
pub use vsearch::VsearchEngine;

use crate::core::alignment::AlignmentConfig;
use crate::error::ClusterResult;

/// The compiled-in native alignment engine for `config`
#[cfg(feature = "parasail")]
pub fn native_engine(config: &AlignmentConfig) -> ClusterResult<Box<dyn AlignmentEngine>> {
    Ok(Box::new(ParasailEngine::new(config.clone())?))
}

/// Built without the `parasail` feature: no native engine exists
#[cfg(not(feature = "parasail"))]
pub fn native_engine(config: &AlignmentConfig) -> ClusterResult<Box<dyn AlignmentEngine>> {
    Err(crate::error::ClusterError::CapabilityUnavailable(format!(
        "built without the parasail feature, cannot run {} alignment",
        config.mode.description()
    )))
}
