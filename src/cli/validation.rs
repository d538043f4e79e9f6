// validation.rs - Turn merged arguments into pipeline settings

use std::path::PathBuf;
use std::str::FromStr;

use crate::cli::args::{CommonOptions, FlanksArgs, PrimersArgs};
use crate::core::{AlignmentConfig, AlignmentMode, DistanceMetric};
use crate::diagnostics::Diagnostics;
use crate::error::{ClusterError, ClusterResult};
use crate::pipeline::ClusterSettings;

/// Settings for the flank pipeline; out-of-range values are corrected and logged
pub fn flank_settings(args: &FlanksArgs, diag: &dyn Diagnostics) -> ClusterResult<ClusterSettings> {
    let mut settings = common_settings(&args.common())?;
    if let Some(border) = args.border {
        settings.border = border;
    }
    settings.identity = args.identity;
    settings.scratch = args.scratch.as_ref().map(PathBuf::from);
    Ok(settings.validated(diag))
}

/// Settings for the primer pipeline
pub fn primer_settings(args: &PrimersArgs, diag: &dyn Diagnostics) -> ClusterResult<ClusterSettings> {
    Ok(common_settings(&args.common())?.validated(diag))
}

fn common_settings(options: &CommonOptions) -> ClusterResult<ClusterSettings> {
    let mut settings = ClusterSettings::default();

    if let Some(mode) = &options.alignment_mode {
        let mode = AlignmentMode::from_str(mode).map_err(ClusterError::InvalidConfiguration)?;
        settings.alignment = AlignmentConfig::for_mode(mode);
    }
    if let Some(metric) = &options.metric {
        settings.metric = DistanceMetric::from_str(metric).map_err(ClusterError::InvalidConfiguration)?;
    }
    if let Some(min_samples) = options.min_samples {
        settings.min_samples = min_samples;
    }
    if let Some(threads) = options.threads {
        settings.threads = threads;
    }
    settings.allow_fallback = !options.no_fallback;
    settings.progress = options.progress;

    Ok(settings)
}
