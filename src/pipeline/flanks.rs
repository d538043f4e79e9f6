// flanks.rs - Cluster the left and right flanks of full-length sequences

use std::path::{Path, PathBuf};

use super::{default_prefix, find_representatives, Capabilities, ClusterSettings};
use crate::data::{read_fasta, SequenceRecord};
use crate::diagnostics::Diagnostics;
use crate::error::{ClusterError, ClusterResult};
use crate::output::OutputBatch;

/// Which end of a sequence a flank comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn suffix(&self) -> &'static str {
        match self {
            Side::Left => "l",
            Side::Right => "r",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    fn extract(&self, record: &SequenceRecord, border: usize) -> SequenceRecord {
        let b = flank_length(record.len(), border);
        match self {
            Side::Left => record.prefix(b),
            Side::Right => record.suffix(b),
        }
    }
}

/// Files produced by one flank run, indexed left then right
#[derive(Debug, Clone, PartialEq)]
pub struct FlankOutputs {
    pub flanks: [PathBuf; 2],
    pub reduced: [PathBuf; 2],
    pub kept: [usize; 2],
}

/// Flank length for a sequence of length `len`.
///
/// Short sequences, where two full borders would leave less than a tenth of
/// the sequence between them, get 45% of their length on each side instead.
pub fn flank_length(len: usize, border: usize) -> usize {
    let len_f = len as f64;
    if len_f - 2.0 * (border as f64) < 0.1 * len_f {
        (0.45 * len_f).floor() as usize
    } else {
        border
    }
}

/// Extract both flanks of every sequence in `fasta`, write them, and reduce
/// each side to representatives (density path) or centroids (identity path).
///
/// The two reduced files are committed together once both sides succeed.
pub fn cluster_flanks(
    fasta: &Path,
    output: Option<&str>,
    settings: &ClusterSettings,
    caps: &Capabilities,
    diag: &dyn Diagnostics,
) -> ClusterResult<FlankOutputs> {
    let prefix = match output {
        Some(p) => p.to_string(),
        None => {
            let p = default_prefix("flanking");
            diag.warn(&format!("No output prefix given, using {}", p));
            p
        }
    };

    let records = read_fasta(fasta)?;
    if records.is_empty() {
        return Err(ClusterError::MissingInput(format!("{} holds no sequences", fasta.display())));
    }
    diag.info(&format!(
        "Read {} sequences from {}, border length {}",
        records.len(),
        fasta.display(),
        settings.border
    ));

    let sides = Side::BOTH.map(|side| {
        let flanks: Vec<SequenceRecord> = records.iter().map(|r| side.extract(r, settings.border)).collect();
        (side, flanks)
    });

    let flank_paths = Side::BOTH.map(|side| PathBuf::from(format!("{}_{}.fasta.gz", prefix, side.suffix())));
    let mut flank_batch = OutputBatch::new();
    for ((_, flanks), path) in sides.iter().zip(&flank_paths) {
        flank_batch.add_fasta(path, flanks)?;
    }
    flank_batch.commit()?;
    diag.info(&format!(
        "Flanking regions from all samples saved to {} and {}",
        flank_paths[0].display(),
        flank_paths[1].display()
    ));

    let (reduced, kept) = match settings.identity {
        Some(identity) => centroids(&prefix, &flank_paths, identity, settings, caps, diag)?,
        None => representatives(&prefix, &sides, settings, caps, diag)?,
    };

    diag.info(&format!(
        "Finished. Reduced sequence sets saved to {} ({} sequences) and {} ({} sequences)",
        reduced[0].display(),
        kept[0],
        reduced[1].display(),
        kept[1]
    ));

    Ok(FlankOutputs {
        flanks: flank_paths,
        reduced,
        kept,
    })
}

fn representatives(
    prefix: &str,
    sides: &[(Side, Vec<SequenceRecord>); 2],
    settings: &ClusterSettings,
    caps: &Capabilities,
    diag: &dyn Diagnostics,
) -> ClusterResult<([PathBuf; 2], [usize; 2])> {
    let reduced = Side::BOTH.map(|side| PathBuf::from(format!("{}_clustered_{}.fasta.gz", prefix, side.suffix())));

    let mut chosen = Vec::with_capacity(2);
    for (side, flanks) in sides.iter() {
        diag.info(&format!(
            "Clustering {} {} flanks with {}",
            flanks.len(),
            side.name(),
            caps.density.name()
        ));
        chosen.push(find_representatives(flanks, settings, caps, diag)?);
    }

    let mut batch = OutputBatch::new();
    let mut kept = [0; 2];
    for (i, ((side, flanks), reps)) in sides.iter().zip(&chosen).enumerate() {
        kept[i] = batch.add_fasta(&reduced[i], reps.indices().iter().map(|&idx| &flanks[idx]))?;
        diag.info(&format!("Kept {} of {} {} flanks", kept[i], flanks.len(), side.name()));
    }
    batch.commit()?;

    Ok((reduced, kept))
}

fn centroids(
    prefix: &str,
    flank_paths: &[PathBuf; 2],
    identity: f64,
    settings: &ClusterSettings,
    caps: &Capabilities,
    diag: &dyn Diagnostics,
) -> ClusterResult<([PathBuf; 2], [usize; 2])> {
    let reduced = Side::BOTH.map(|side| PathBuf::from(format!("{}_centroid_{}.fasta.gz", prefix, side.suffix())));
    let scratch = caps.scratch.acquire("centroids")?;

    let mut batch = OutputBatch::new();
    let mut kept = [0; 2];
    for (i, side) in Side::BOTH.iter().enumerate() {
        diag.info(&format!(
            "Clustering and excluding redundant {} sequences with {} at identity {}",
            side.name(),
            caps.greedy.name(),
            identity
        ));
        let tmp = scratch.file(&format!("centroids_{}.fasta", side.suffix()));
        caps.greedy
            .cluster_by_identity(&flank_paths[i], identity, settings.threads, &tmp)?;
        let centroids = read_fasta(&tmp)?;
        kept[i] = batch.add_fasta(&reduced[i], &centroids)?;
    }
    batch.commit()?;

    Ok((reduced, kept))
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::diagnostics::MemoryDiagnostics;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn six_sequences(dir: &Path) -> PathBuf {
        let path = dir.join("input.fasta");
        let mut content = String::new();
        for (id, base) in [("a1", 'A'), ("a2", 'A'), ("c1", 'C'), ("c2", 'C'), ("g", 'G'), ("t", 'T')] {
            content.push_str(&format!(">{}\n{}\n", id, base.to_string().repeat(40)));
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_flank_length_boundary() {
        assert_eq!(flank_length(1000, 400), 400);
        assert_eq!(flank_length(500, 400), 225);
        assert_eq!(flank_length(0, 400), 0);
        // 1000 - 2 * 450 = 100, exactly a tenth: keep the border
        assert_eq!(flank_length(1000, 450), 450);
        assert_eq!(flank_length(1000, 451), 450);
    }

    #[test]
    fn test_side_extract() {
        let r = SequenceRecord::new("s", "AACCGGTTAACCGGTTAACC");
        assert_eq!(Side::Left.extract(&r, 4).residues, b"AACC".to_vec());
        assert_eq!(Side::Right.extract(&r, 4).residues, b"AACC".to_vec());
        // 20 residues, border 10: short sequence rule gives 9
        assert_eq!(Side::Right.extract(&r, 10).residues, b"CGGTTAACC".to_vec());
    }

    #[test]
    fn test_density_path_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = six_sequences(dir.path());
        let calls = Arc::new(AtomicUsize::new(0));
        let caps = capabilities(&dir.path().join("scratch"), calls.clone(), None);
        let diag = MemoryDiagnostics::new();
        let prefix = dir.path().join("run").display().to_string();
        let settings = ClusterSettings {
            border: 10,
            ..settings()
        };

        let out = cluster_flanks(&input, Some(&prefix), &settings, &caps, &diag).unwrap();

        assert_eq!(out.kept, [4, 4]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(out.reduced[0], PathBuf::from(format!("{}_clustered_l.fasta.gz", prefix)));

        let left = read_fasta(&out.flanks[0]).unwrap();
        assert_eq!(left.len(), 6);
        assert_eq!(left[0].residues, b"AAAAAAAAAA".to_vec());

        let reps: Vec<String> = read_fasta(&out.reduced[1]).unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(reps, vec!["g", "t", "a2", "c2"]);
    }

    #[test]
    fn test_identity_path_skips_density_clustering() {
        let dir = tempfile::tempdir().unwrap();
        let input = six_sequences(dir.path());
        let calls = Arc::new(AtomicUsize::new(0));
        let scratch = dir.path().join("scratch");
        let caps = capabilities(&scratch, calls.clone(), None);
        let diag = MemoryDiagnostics::new();
        let prefix = dir.path().join("run").display().to_string();
        let settings = ClusterSettings {
            identity: Some(0.97),
            border: 10,
            ..settings()
        };

        let out = cluster_flanks(&input, Some(&prefix), &settings, &caps, &diag).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(out.kept, [4, 4]);
        assert!(out.reduced[0].ends_with("run_centroid_l.fasta.gz"));
        assert!(read_fasta(&out.reduced[0]).is_ok());
        assert!(!scratch.join("centroids").exists());
    }

    #[test]
    fn test_tool_failure_leaves_no_reduced_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = six_sequences(dir.path());
        let scratch = dir.path().join("scratch");
        let caps = capabilities(&scratch, Arc::new(AtomicUsize::new(0)), Some(0));
        let diag = MemoryDiagnostics::new();
        let prefix = dir.path().join("run").display().to_string();
        let settings = ClusterSettings {
            identity: Some(0.97),
            ..settings()
        };

        let err = cluster_flanks(&input, Some(&prefix), &settings, &caps, &diag).unwrap_err();

        assert!(matches!(err, ClusterError::ExternalToolFailure { .. }));
        assert!(!Path::new(&format!("{}_centroid_l.fasta.gz", prefix)).exists());
        assert!(!scratch.join("centroids").exists());
    }

    #[test]
    fn test_right_side_failure_keeps_left_centroids_off_disk() {
        let dir = tempfile::tempdir().unwrap();
        let input = six_sequences(dir.path());
        let scratch = dir.path().join("scratch");
        let caps = capabilities(&scratch, Arc::new(AtomicUsize::new(0)), Some(1));
        let diag = MemoryDiagnostics::new();
        let prefix = dir.path().join("run").display().to_string();
        let settings = ClusterSettings {
            identity: Some(0.97),
            ..settings()
        };

        let err = cluster_flanks(&input, Some(&prefix), &settings, &caps, &diag).unwrap_err();

        assert!(matches!(err, ClusterError::ExternalToolFailure { .. }));
        assert!(!Path::new(&format!("{}_centroid_l.fasta.gz", prefix)).exists());
        assert!(!Path::new(&format!("{}_centroid_r.fasta.gz", prefix)).exists());
        assert!(Path::new(&format!("{}_l.fasta.gz", prefix)).exists());
        assert!(!scratch.join("centroids").exists());
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.contains("centroid") || name.starts_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "left behind: {:?}", leftovers);
    }

    #[test]
    fn test_empty_fasta_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.fasta");
        std::fs::write(&input, "").unwrap();
        let caps = capabilities(dir.path(), Arc::new(AtomicUsize::new(0)), None);
        let diag = MemoryDiagnostics::new();

        let err = cluster_flanks(&input, Some("unused"), &settings(), &caps, &diag).unwrap_err();
        assert!(matches!(err, ClusterError::MissingInput(_)));
    }
}
