// mod.rs - Atomic output writers

use std::fs::create_dir_all;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::NamedTempFile;

use crate::data::{is_gzip, SequenceRecord};
use crate::error::{ClusterError, ClusterResult};

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &Path) -> ClusterResult<PathBuf> {
    let parent = match file_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    create_dir_all(&parent).map_err(|e| ClusterError::io(&parent, e))?;
    Ok(parent)
}

/// Fill a temporary file next to `path` with `write`. Names ending in `.gz`
/// are gzip-compressed. Dropping the result removes the temporary file.
fn stage<F>(path: &Path, write: F) -> ClusterResult<NamedTempFile>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    let parent = ensure_parent_dir(path)?;
    let mut temp = NamedTempFile::new_in(&parent).map_err(|e| ClusterError::io(&parent, e))?;

    let result = if is_gzip(path) {
        let mut encoder = GzEncoder::new(BufWriter::new(temp.as_file_mut()), Compression::default());
        write(&mut encoder)
            .and_then(|_| encoder.finish())
            .and_then(|mut inner| inner.flush())
    } else {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer).and_then(|_| writer.flush())
    };
    result.map_err(|e| ClusterError::io(path, e))?;
    Ok(temp)
}

/// Write `path` through a temporary file in the same directory and rename it
/// into place once `write` succeeds. On any error the destination is left
/// untouched and the temporary file is removed.
pub fn write_atomically<F>(path: &Path, write: F) -> ClusterResult<()>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    let temp = stage(path, write)?;
    temp.persist(path).map_err(|e| ClusterError::io(path, e.error))?;
    Ok(())
}

/// Outputs of one step, renamed into place together by `commit`.
///
/// Nothing reaches its destination until every file has been staged. If a
/// rename fails part way, the files already renamed by this batch are removed.
#[derive(Debug, Default)]
pub struct OutputBatch {
    staged: Vec<(NamedTempFile, PathBuf)>,
}

impl OutputBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage FASTA records for `path`, returning how many were written
    pub fn add_fasta<'a, I>(&mut self, path: &Path, records: I) -> ClusterResult<usize>
    where
        I: IntoIterator<Item = &'a SequenceRecord>,
    {
        let mut count = 0;
        let temp = stage(path, |out| write_records(out, records, &mut count))?;
        self.staged.push((temp, path.to_path_buf()));
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub fn commit(self) -> ClusterResult<Vec<PathBuf>> {
        let mut committed: Vec<PathBuf> = Vec::with_capacity(self.staged.len());
        for (temp, path) in self.staged {
            if let Err(e) = temp.persist(&path) {
                for done in &committed {
                    let _ = std::fs::remove_file(done);
                }
                return Err(ClusterError::io(&path, e.error));
            }
            committed.push(path);
        }
        Ok(committed)
    }
}

fn write_records<'a, I>(out: &mut dyn Write, records: I, count: &mut usize) -> std::io::Result<()>
where
    I: IntoIterator<Item = &'a SequenceRecord>,
{
    for record in records {
        out.write_all(b">")?;
        out.write_all(record.id.as_bytes())?;
        out.write_all(b"\n")?;
        out.write_all(&record.residues)?;
        out.write_all(b"\n")?;
        *count += 1;
    }
    Ok(())
}

/// Write records as `>id\nresidues\n`, in the order given
pub fn write_fasta<'a, I>(path: &Path, records: I) -> ClusterResult<usize>
where
    I: IntoIterator<Item = &'a SequenceRecord>,
{
    let mut count = 0;
    write_atomically(path, |out| write_records(out, records, &mut count))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::read_fasta;

    #[test]
    fn test_write_fasta_round_trip_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![SequenceRecord::new("b", "TTTT"), SequenceRecord::new("a", "ACGT")];

        let plain = dir.path().join("nested/out.fasta");
        assert_eq!(write_fasta(&plain, &records).unwrap(), 2);
        assert_eq!(std::fs::read_to_string(&plain).unwrap(), ">b\nTTTT\n>a\nACGT\n");

        let gz = dir.path().join("out.fasta.gz");
        write_fasta(&gz, records.iter().rev()).unwrap();
        let back = read_fasta(&gz).unwrap();
        assert_eq!(back[0].id, "a");
        assert_eq!(back[1].id, "b");
    }

    #[test]
    fn test_failed_write_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.fasta");
        let err = write_atomically(&path, |out| {
            out.write_all(b">partial\n")?;
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
        });

        assert!(err.is_err());
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_batch_writes_nothing_until_commit() {
        let dir = tempfile::tempdir().unwrap();
        let left = dir.path().join("run_l.fasta.gz");
        let right = dir.path().join("run_r.fasta.gz");
        let records = vec![SequenceRecord::new("a", "ACGT")];

        let mut batch = OutputBatch::new();
        assert_eq!(batch.add_fasta(&left, &records).unwrap(), 1);
        assert_eq!(batch.add_fasta(&right, &records).unwrap(), 1);
        assert_eq!(batch.len(), 2);
        assert!(!left.exists());
        assert!(!right.exists());

        let written = batch.commit().unwrap();
        assert_eq!(written, vec![left.clone(), right.clone()]);
        assert_eq!(read_fasta(&right).unwrap(), records);
    }

    #[test]
    fn test_dropped_batch_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut batch = OutputBatch::new();
            batch
                .add_fasta(&dir.path().join("run_l.fasta"), &[SequenceRecord::new("a", "ACGT")])
                .unwrap();
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_write_keeps_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "old").unwrap();
        let _ = write_atomically(&path, |_| Err(std::io::Error::new(std::io::ErrorKind::Other, "boom")));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old");
    }
}
