// config.rs - Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ClusterError, ClusterResult};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    // Shared settings
    pub threads: Option<i32>,
    pub min_samples: Option<usize>,
    pub alignment_mode: Option<String>,
    pub metric: Option<String>,
    pub no_fallback: Option<bool>,
    pub progress: Option<bool>,

    // Flank clustering
    pub border: Option<usize>,
    pub identity: Option<f64>,
    pub scratch: Option<String>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ClusterResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ClusterError::io(path, e))?;
        Self::from_toml(&content).map_err(|e| {
            ClusterError::InvalidConfiguration(format!("Failed to parse config file '{}': {}", path.display(), e))
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> ClusterResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| ClusterError::InvalidConfiguration(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content).map_err(|e| ClusterError::io(path, e))
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# barclust.toml - Configuration file for barclust
# Command line arguments override these settings

# =============================================================================
# SHARED SETTINGS
# =============================================================================

# Number of threads (0 or less uses every core)
threads = 0

# OPTICS min_samples; raised to at least 2 and capped at a third of the
# number of sequences
min_samples = 2

# Alignment mode: semi-global, banded:<width>, unweighted
alignment_mode = "semi-global"

# Distance metric: satoh, indel-fraction
metric = "satoh"

# Fail when the native aligner is unavailable instead of using unweighted scores
no_fallback = false

# Show a progress bar while building score matrices
progress = false

# =============================================================================
# FLANK CLUSTERING
# =============================================================================

# Flank length taken from each end of a sequence
border = 400

# Cluster flanks with vsearch at this identity (0.1-1.0) instead of OPTICS
# identity = 0.97

# Directory for intermediate vsearch files
# scratch = "/tmp/barclust"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses() {
        let config = Config::from_toml(&Config::generate_sample()).unwrap();
        assert_eq!(config.border, Some(400));
        assert_eq!(config.alignment_mode.as_deref(), Some("semi-global"));
        assert_eq!(config.identity, None);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(Config::from_toml("bordr = 3").is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("barclust.toml");
        let config = Config {
            identity: Some(0.9),
            threads: Some(4),
            ..Config::new()
        };
        config.to_file(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_bad_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "threads = \"many\"").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ClusterError::InvalidConfiguration(_))
        ));
    }
}
