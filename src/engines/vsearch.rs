// vsearch.rs - External-process adapter for vsearch --cluster_fast

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::traits::GreedyCentroidEngine;
use crate::error::{ClusterError, ClusterResult};

/// Runs the `vsearch` binary synchronously
#[derive(Debug, Clone)]
pub struct VsearchEngine {
    binary: PathBuf,
}

impl Default for VsearchEngine {
    fn default() -> Self {
        Self::new("vsearch")
    }
}

impl VsearchEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn command(&self, sequences: &Path, identity: f64, threads: i32, centroids: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--cluster_fast")
            .arg(sequences)
            .arg("--id")
            .arg(identity.to_string())
            .arg("--centroids")
            .arg(centroids)
            .arg("--threads")
            .arg(threads.max(0).to_string())
            .arg("--quiet");
        cmd
    }
}

impl GreedyCentroidEngine for VsearchEngine {
    fn cluster_by_identity(
        &self,
        sequences: &Path,
        identity: f64,
        threads: i32,
        centroids: &Path,
    ) -> ClusterResult<()> {
        let output = self
            .command(sequences, identity, threads, centroids)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ClusterError::CapabilityUnavailable(format!(
                    "'{}' not found in PATH",
                    self.binary.display()
                )),
                _ => ClusterError::tool("vsearch", format!("could not start: {}", e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
            return Err(ClusterError::tool(
                "vsearch",
                format!(
                    "{} on {}: {}",
                    output.status,
                    sequences.display(),
                    tail.into_iter().rev().collect::<Vec<_>>().join(" | ")
                ),
            ));
        }

        if !centroids.exists() {
            return Err(ClusterError::tool(
                "vsearch",
                format!("no centroids written to {}", centroids.display()),
            ));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "vsearch"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let engine = VsearchEngine::default();
        let cmd = engine.command(Path::new("in.fasta"), 0.97, -1, Path::new("out.fasta"));
        let args: Vec<String> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec!["--cluster_fast", "in.fasta", "--id", "0.97", "--centroids", "out.fasta", "--threads", "0", "--quiet"]
        );
    }

    #[test]
    fn test_missing_binary_is_capability_error() {
        let engine = VsearchEngine::new("/nonexistent/bin/vsearch-missing");
        let err = engine
            .cluster_by_identity(Path::new("in.fasta"), 0.95, 1, Path::new("out.fasta"))
            .unwrap_err();
        assert!(matches!(err, ClusterError::CapabilityUnavailable(_)));
    }
}
