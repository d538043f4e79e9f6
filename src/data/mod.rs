// mod.rs - Input records and readers

pub mod primers;
pub mod sequences;

// Re-export main types for convenience
pub use primers::{AnnotatedPrimerRow, PrimerRow, PrimerTable};
pub use sequences::{read_fasta, SequenceRecord};

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::{ClusterError, ClusterResult};

/// True when the file name ends in `.gz`
pub fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

/// Open a plain or gzip-compressed input, chosen by extension
pub fn open_input(path: &Path) -> ClusterResult<Box<dyn Read>> {
    if !path.is_file() {
        return Err(ClusterError::MissingInput(format!("{} does not exist", path.display())));
    }
    let file = File::open(path).map_err(|e| ClusterError::io(path, e))?;
    if is_gzip(path) {
        Ok(Box::new(MultiGzDecoder::new(BufReader::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
