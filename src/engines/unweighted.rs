// unweighted.rs - Pure Rust match-count scorer used when no native engine exists

use super::traits::AlignmentEngine;
use crate::error::ClusterResult;

/// Global alignment with match = 1 and no mismatch or gap penalties.
/// The optimal score is the length of the longest common subsequence, so
/// `score(a, a) == a.len()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnweightedEngine;

impl UnweightedEngine {
    pub fn match_score(a: &[u8], b: &[u8]) -> usize {
        if a.is_empty() || b.is_empty() {
            return 0;
        }
        let mut prev = vec![0usize; b.len() + 1];
        let mut curr = vec![0usize; b.len() + 1];
        for &x in a {
            for (j, &y) in b.iter().enumerate() {
                curr[j + 1] = if x == y {
                    prev[j] + 1
                } else {
                    prev[j + 1].max(curr[j])
                };
            }
            std::mem::swap(&mut prev, &mut curr);
        }
        prev[b.len()]
    }
}

impl AlignmentEngine for UnweightedEngine {
    fn score(&self, a: &[u8], b: &[u8]) -> ClusterResult<f64> {
        if a == b {
            return Ok(a.len() as f64);
        }
        Ok(Self::match_score(a, b) as f64)
    }

    fn name(&self) -> &'static str {
        "unweighted"
    }

    fn description(&self) -> String {
        "unweighted global match count (fallback)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_score_is_length() {
        let engine = UnweightedEngine;
        assert_eq!(engine.score(b"ACGTT", b"ACGTT").unwrap(), 5.0);
        assert_eq!(engine.score(b"", b"").unwrap(), 0.0);
    }

    #[test]
    fn test_match_score() {
        assert_eq!(UnweightedEngine::match_score(b"ACGT", b"AGT"), 3);
        assert_eq!(UnweightedEngine::match_score(b"AAAA", b"TTTT"), 0);
        assert_eq!(UnweightedEngine::match_score(b"GATTACA", b"TACA"), 4);
        assert_eq!(UnweightedEngine::match_score(b"ACGT", b""), 0);
    }

    #[test]
    fn test_score_is_symmetric() {
        let engine = UnweightedEngine;
        let a = b"ACCGTTAGC";
        let b = b"TTACGGAC";
        assert_eq!(engine.score(a, b).unwrap(), engine.score(b, a).unwrap());
    }
}
