// parasail.rs - Parasail binding for semi-global and banded global scores

use std::cell::RefCell;
use std::collections::HashMap;

use parasail_rs::{Aligner, Matrix};

use super::traits::AlignmentEngine;
use crate::core::alignment::{AlignmentConfig, AlignmentMode};
use crate::error::{ClusterError, ClusterResult};

thread_local! {
    // One aligner per worker thread and engine configuration
    static ALIGNERS: RefCell<HashMap<String, Aligner>> = RefCell::new(HashMap::new());
}

/// Scores pairs with parasail's vectorised kernels
#[derive(Debug, Clone)]
pub struct ParasailEngine {
    config: AlignmentConfig,
    cache_key: String,
}

impl ParasailEngine {
    /// Check that the substitution scheme can be built before any work starts
    pub fn new(config: AlignmentConfig) -> ClusterResult<Self> {
        if config.mode == AlignmentMode::Unweighted {
            return Err(ClusterError::InvalidConfiguration(
                "parasail engine does not implement the unweighted mode".to_string(),
            ));
        }
        let cache_key = format!("{:?}", config);
        let engine = Self { config, cache_key };
        engine.matrix()?;
        Ok(engine)
    }

    fn matrix(&self) -> ClusterResult<Matrix> {
        match self.config.mode {
            AlignmentMode::Banded { .. } => Matrix::create(
                self.config.alphabet.as_bytes(),
                self.config.match_score,
                self.config.mismatch_penalty,
            )
            .map_err(|e| {
                ClusterError::CapabilityUnavailable(format!(
                    "parasail could not create a {} match/mismatch matrix: {:?}",
                    self.config.alphabet, e
                ))
            }),
            _ => Matrix::from(self.config.substitution_matrix.as_str()).map_err(|e| {
                ClusterError::CapabilityUnavailable(format!(
                    "parasail has no substitution matrix '{}': {:?}",
                    self.config.substitution_matrix, e
                ))
            }),
        }
    }

    fn aligner(&self) -> ClusterResult<Aligner> {
        let matrix = self.matrix()?;
        Ok(match self.config.mode {
            AlignmentMode::Banded { band } => Aligner::new()
                .matrix(matrix)
                .gap_open(self.config.gap_open)
                .gap_extend(self.config.gap_extend)
                .global()
                .bandwith(band as i32)
                .build(),
            _ => Aligner::new()
                .matrix(matrix)
                .gap_open(self.config.gap_open)
                .gap_extend(self.config.gap_extend)
                .semi_global()
                .striped()
                .build(),
        })
    }
}

impl AlignmentEngine for ParasailEngine {
    fn score(&self, a: &[u8], b: &[u8]) -> ClusterResult<f64> {
        ALIGNERS.with(|cache| {
            let mut cache = cache.borrow_mut();
            if !cache.contains_key(&self.cache_key) {
                cache.insert(self.cache_key.clone(), self.aligner()?);
            }
            let aligner = &cache[&self.cache_key];

            let result = aligner
                .align(Some(a), b)
                .map_err(|e| ClusterError::tool("parasail", format!("alignment failed: {:?}", e)))?;
            Ok(result.get_score() as f64)
        })
    }

    fn name(&self) -> &'static str {
        "parasail"
    }

    fn description(&self) -> String {
        format!(
            "parasail {} (gap open {}, extend {})",
            self.config.mode.description(),
            self.config.gap_open,
            self.config.gap_extend
        )
    }
}
