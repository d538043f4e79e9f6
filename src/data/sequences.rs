// sequences.rs - FASTA records for clustering

use std::path::Path;

use bio::io::fasta;

use super::open_input;
use crate::error::{ClusterError, ClusterResult};

/// One named sequence; never modified after it is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub id: String,
    pub residues: Vec<u8>,
}

impl SequenceRecord {
    pub fn new(id: impl Into<String>, residues: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            residues: residues.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// First `n` residues, same id
    pub fn prefix(&self, n: usize) -> SequenceRecord {
        let n = n.min(self.len());
        SequenceRecord::new(self.id.clone(), &self.residues[..n])
    }

    /// Last `n` residues, same id
    pub fn suffix(&self, n: usize) -> SequenceRecord {
        let n = n.min(self.len());
        SequenceRecord::new(self.id.clone(), &self.residues[self.len() - n..])
    }
}

impl AsRef<[u8]> for SequenceRecord {
    fn as_ref(&self) -> &[u8] {
        &self.residues
    }
}

/// Upper-case residues; `.` becomes `N`
fn clean_residues(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .map(|&b| match b {
            b'.' => b'N',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// Read every record of a plain or gzipped FASTA file
pub fn read_fasta(path: &Path) -> ClusterResult<Vec<SequenceRecord>> {
    let reader = fasta::Reader::new(open_input(path)?);
    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ClusterError::Fasta {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        records.push(SequenceRecord::new(record.id(), clean_residues(record.seq())));
    }
    Ok(records)
}
