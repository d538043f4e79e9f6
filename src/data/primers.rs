// primers.rs - Primer table with a mandatory `primer` column

use std::io;
use std::path::Path;

use super::open_input;
use crate::error::{ClusterError, ClusterResult};
use crate::output::write_atomically;

pub const PRIMER_COLUMN: &str = "primer";
pub const CLUSTER_COLUMN: &str = "cluster";

/// One table row; `fields` holds every column in header order as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimerRow {
    pub primer: String,
    pub fields: Vec<String>,
}

/// A row together with its cluster label
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedPrimerRow<'a> {
    pub row: &'a PrimerRow,
    pub cluster: i32,
}

/// Comma-delimited primer table, row order preserved
#[derive(Debug, Clone)]
pub struct PrimerTable {
    pub headers: Vec<String>,
    pub rows: Vec<PrimerRow>,
}

impl PrimerTable {
    /// Read a CSV table (gzip inferred from extension)
    pub fn read(path: &Path) -> ClusterResult<Self> {
        let csv_err = |source| ClusterError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(open_input(path)?);

        let headers: Vec<String> = reader.headers().map_err(csv_err)?.iter().map(str::to_string).collect();
        let primer_idx = headers
            .iter()
            .position(|h| h == PRIMER_COLUMN)
            .ok_or_else(|| {
                ClusterError::MissingInput(format!("{} has no '{}' column", path.display(), PRIMER_COLUMN))
            })?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            let fields: Vec<String> = record.iter().map(str::to_string).collect();
            rows.push(PrimerRow {
                primer: fields[primer_idx].clone(),
                fields,
            });
        }

        Ok(Self { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Primer sequences in row order
    pub fn primers(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.primer.as_str()).collect()
    }

    /// Pair every row with its label; `labels` must have one entry per row
    pub fn annotate(&self, labels: &[i32]) -> ClusterResult<Vec<AnnotatedPrimerRow<'_>>> {
        if labels.len() != self.rows.len() {
            return Err(ClusterError::InvalidConfiguration(format!(
                "{} labels for {} primer rows",
                labels.len(),
                self.rows.len()
            )));
        }
        Ok(self
            .rows
            .iter()
            .zip(labels)
            .map(|(row, &cluster)| AnnotatedPrimerRow { row, cluster })
            .collect())
    }

    /// Write all columns plus `cluster`; an existing `cluster` column is replaced
    pub fn write_annotated(&self, path: &Path, annotated: &[AnnotatedPrimerRow<'_>]) -> ClusterResult<()> {
        let existing = self.headers.iter().position(|h| h == CLUSTER_COLUMN);

        write_atomically(path, |out| {
            let mut writer = csv::Writer::from_writer(out);
            let mut header = self.headers.clone();
            if existing.is_none() {
                header.push(CLUSTER_COLUMN.to_string());
            }
            writer.write_record(&header).map_err(into_io)?;

            for entry in annotated {
                let mut fields = entry.row.fields.clone();
                let label = entry.cluster.to_string();
                match existing {
                    Some(idx) => fields[idx] = label,
                    None => fields.push(label),
                }
                writer.write_record(&fields).map_err(into_io)?;
            }
            writer.flush()
        })
    }
}

fn into_io(e: csv::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_table(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join("primers.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_keeps_columns_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_table(dir.path(), "name,primer,tm\np1,ACGTAC,58.1\np2,ACGTAA,57.9\np3,TTTGGG,60.0\n");

        let table = PrimerTable::read(&path).unwrap();
        assert_eq!(table.headers, vec!["name", "primer", "tm"]);
        assert_eq!(table.primers(), vec!["ACGTAC", "ACGTAA", "TTTGGG"]);
        assert_eq!(table.rows[2].fields, vec!["p3", "TTTGGG", "60.0"]);
    }

    #[test]
    fn test_missing_primer_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_table(dir.path(), "name,seq\np1,ACGT\n");
        let err = PrimerTable::read(&path).unwrap_err();
        assert!(matches!(err, ClusterError::MissingInput(_)));
    }

    #[test]
    fn test_write_annotated_appends_cluster() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_table(dir.path(), "name,primer\np1,ACGT\np2,ACGA\n");
        let table = PrimerTable::read(&path).unwrap();

        let out = dir.path().join("out.csv");
        let annotated = table.annotate(&[0, -1]).unwrap();
        table.write_annotated(&out, &annotated).unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        assert_eq!(written, "name,primer,cluster\np1,ACGT,0\np2,ACGA,-1\n");
    }

    #[test]
    fn test_existing_cluster_column_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_table(dir.path(), "primer,cluster\nACGT,9\n");
        let table = PrimerTable::read(&path).unwrap();

        let out = dir.path().join("out.csv");
        table.write_annotated(&out, &table.annotate(&[3]).unwrap()).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "primer,cluster\nACGT,3\n");
    }

    #[test]
    fn test_annotate_rejects_length_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_table(dir.path(), "primer\nACGT\nTTTT\n");
        let table = PrimerTable::read(&path).unwrap();
        assert!(table.annotate(&[0]).is_err());
    }
}
