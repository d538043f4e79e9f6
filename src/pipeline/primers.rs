// primers.rs - Label every row of a primer table with its density cluster

use std::path::{Path, PathBuf};

use super::{default_prefix, density_labels, Capabilities, ClusterSettings};
use crate::data::PrimerTable;
use crate::diagnostics::Diagnostics;
use crate::error::{ClusterError, ClusterResult};

/// Cluster the `primer` column of `csv` and write `{output}.csv` with an
/// added `cluster` column. Row order and all other columns are preserved.
pub fn cluster_primers(
    csv: Option<&Path>,
    output: Option<&str>,
    settings: &ClusterSettings,
    caps: &Capabilities,
    diag: &dyn Diagnostics,
) -> ClusterResult<PathBuf> {
    let csv = csv.ok_or_else(|| ClusterError::MissingInput("no primer table provided".to_string()))?;
    let prefix = match output {
        Some(p) => p.to_string(),
        None => {
            let p = default_prefix("clusters");
            diag.warn(&format!("No output prefix given, using {}", p));
            p
        }
    };

    let table = PrimerTable::read(csv)?;
    if table.is_empty() {
        return Err(ClusterError::MissingInput(format!("{} holds no primers", csv.display())));
    }
    diag.info(&format!("Read {} primers from {}", table.len(), csv.display()));

    let labels = density_labels(&table.primers(), settings, caps, diag)?;
    let clusters = labels.labels.iter().filter(|&&l| l >= 0).max().map_or(0, |&l| l + 1);
    let noise = labels.labels.iter().filter(|&&l| l < 0).count();

    let path = PathBuf::from(format!("{}.csv", prefix));
    table.write_annotated(&path, &table.annotate(&labels.labels)?)?;
    diag.info(&format!(
        "Found {} clusters and {} unclustered primers, table saved to {}",
        clusters,
        noise,
        path.display()
    ));

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::diagnostics::MemoryDiagnostics;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_primer_table_gets_cluster_column() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("primers.csv");
        std::fs::write(
            &input,
            "name,primer\np1,AAAAAAAA\np2,AAAAAAAA\np3,CCCCCCCC\np4,CCCCCCCC\np5,GGGGGGGG\np6,TTTTTTTT\n",
        )
        .unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let caps = capabilities(dir.path(), calls.clone(), None);
        let diag = MemoryDiagnostics::new();
        let prefix = dir.path().join("clusters").display().to_string();

        let path = cluster_primers(Some(input.as_path()), Some(&prefix), &settings(), &caps, &diag).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "name,primer,cluster\np1,AAAAAAAA,0\np2,AAAAAAAA,0\np3,CCCCCCCC,1\np4,CCCCCCCC,1\np5,GGGGGGGG,-1\np6,TTTTTTTT,-1\n"
        );
    }

    #[test]
    fn test_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let caps = capabilities(dir.path(), Arc::new(AtomicUsize::new(0)), None);
        let diag = MemoryDiagnostics::new();

        let err = cluster_primers(None, Some("x"), &settings(), &caps, &diag).unwrap_err();
        assert!(matches!(err, ClusterError::MissingInput(_)));
    }

    #[test]
    fn test_header_only_table() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("primers.csv");
        std::fs::write(&input, "primer\n").unwrap();
        let caps = capabilities(dir.path(), Arc::new(AtomicUsize::new(0)), None);
        let diag = MemoryDiagnostics::new();

        let err = cluster_primers(Some(input.as_path()), Some("x"), &settings(), &caps, &diag).unwrap_err();
        assert!(matches!(err, ClusterError::MissingInput(_)));
        assert!(!Path::new("x.csv").exists());
    }
}
