// merge.rs - Merge configuration file with CLI arguments

use crate::cli::args::{FlanksArgs, PrimersArgs};
use crate::cli::Config;
use crate::error::ClusterResult;

impl FlanksArgs {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: &Config) -> Self {
        self.border = self.border.or(config.border);
        self.identity = self.identity.or(config.identity);
        if self.scratch.is_none() {
            self.scratch = config.scratch.clone();
        }

        self.min_samples = self.min_samples.or(config.min_samples);
        self.threads = self.threads.or(config.threads);
        if self.alignment_mode.is_none() {
            self.alignment_mode = config.alignment_mode.clone();
        }
        if self.metric.is_none() {
            self.metric = config.metric.clone();
        }

        // Switches can only be turned on by the file
        self.no_fallback |= config.no_fallback.unwrap_or(false);
        self.progress |= config.progress.unwrap_or(false);
        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> ClusterResult<Self> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(&config))
    }
}

impl PrimersArgs {
    /// Merge with configuration from file; flank-only keys are ignored
    pub fn merge_with_config(mut self, config: &Config) -> Self {
        self.min_samples = self.min_samples.or(config.min_samples);
        self.threads = self.threads.or(config.threads);
        if self.alignment_mode.is_none() {
            self.alignment_mode = config.alignment_mode.clone();
        }
        if self.metric.is_none() {
            self.metric = config.metric.clone();
        }
        self.no_fallback |= config.no_fallback.unwrap_or(false);
        self.progress |= config.progress.unwrap_or(false);
        self
    }

    pub fn with_config_file(self, config_path: &str) -> ClusterResult<Self> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(&config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_values_win() {
        let config = Config {
            border: Some(250),
            identity: Some(0.9),
            threads: Some(8),
            no_fallback: Some(true),
            ..Config::new()
        };
        let args = FlanksArgs {
            border: Some(300),
            ..Default::default()
        }
        .merge_with_config(&config);

        assert_eq!(args.border, Some(300));
        assert_eq!(args.identity, Some(0.9));
        assert_eq!(args.threads, Some(8));
        assert!(args.no_fallback);
    }

    #[test]
    fn test_primers_take_shared_keys() {
        let config = Config {
            metric: Some("indel-fraction".to_string()),
            border: Some(10),
            ..Config::new()
        };
        let args = PrimersArgs::default().merge_with_config(&config);
        assert_eq!(args.metric.as_deref(), Some("indel-fraction"));
        assert!(!args.no_fallback);
    }
}
