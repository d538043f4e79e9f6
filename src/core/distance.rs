// distance.rs - Score matrix to distance matrix transformation

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::matrix::{DistanceMatrix, ScoreMatrix, SquareMatrix};

/// Distance derived from alignment scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistanceMetric {
    /// `(s_ii + s_jj) / s_ij - 2`, zero for identical sequences
    IndelFraction,
    /// `1 - s_ij / min(s_ii, s_jj)`, as used by MAFFT
    Satoh,
}

impl FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "indel" | "indel-fraction" | "fraction" => Ok(DistanceMetric::IndelFraction),
            "satoh" | "mafft" => Ok(DistanceMetric::Satoh),
            _ => Err(format!("Invalid distance metric: {}. Use: satoh, indel-fraction", s)),
        }
    }
}

impl DistanceMetric {
    pub fn description(&self) -> &str {
        match self {
            DistanceMetric::IndelFraction => "fraction of indels",
            DistanceMetric::Satoh => "Satoh (MAFFT) normalised score",
        }
    }

    #[inline]
    fn distance(&self, s_ii: f64, s_jj: f64, s_ij: f64) -> f64 {
        let d = match self {
            DistanceMetric::IndelFraction => (s_ii + s_jj) / s_ij - 2.0,
            DistanceMetric::Satoh => 1.0 - s_ij / s_ii.min(s_jj),
        };
        // A pair can outscore a self-alignment under substitution matrices
        d.max(0.0)
    }
}

/// Convert alignment scores into distances.
///
/// Scores are first shifted by `min - 1` so every cell is at least 1. Only the
/// upper triangle is computed and mirrored; the diagonal stays zero.
pub fn score_to_distance(mut scores: ScoreMatrix, metric: DistanceMetric) -> DistanceMatrix {
    scores.subtract_offset();
    let n = scores.len();
    let mut distances = SquareMatrix::zeros(n);
    for i in 0..n {
        for j in i + 1..n {
            let d = metric.distance(scores.get(i, i), scores.get(j, j), scores.get(i, j));
            distances.set_symmetric(i, j, d);
        }
    }
    DistanceMatrix::new(distances)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(rows: Vec<Vec<f64>>) -> ScoreMatrix {
        ScoreMatrix::new(SquareMatrix::from_rows(&rows).unwrap())
    }

    /// Sequences 0 and 1 identical, 2 shorter and distinct
    fn sample() -> ScoreMatrix {
        scores(vec![
            vec![40.0, 40.0, 12.0],
            vec![40.0, 40.0, 12.0],
            vec![12.0, 12.0, 20.0],
        ])
    }

    #[test]
    fn test_identical_sequences_have_zero_indel_distance() {
        let d = score_to_distance(sample(), DistanceMetric::IndelFraction);
        assert_eq!(d.get(0, 1), 0.0);
        assert!(d.get(0, 2) > 0.0);
    }

    #[test]
    fn test_satoh_is_bounded() {
        let d = score_to_distance(sample(), DistanceMetric::Satoh);
        for i in 0..3 {
            for j in 0..3 {
                assert!((0.0..=1.0).contains(&d.get(i, j)));
            }
        }
        // offset = 11: s_02 = 1, min(s_00, s_22) = 9
        assert!((d.get(0, 2) - (1.0 - 1.0 / 9.0)).abs() < 1e-12);
    }

    #[test]
    fn test_indel_fraction_value() {
        let d = score_to_distance(sample(), DistanceMetric::IndelFraction);
        // offset = 11: (29 + 9) / 1 - 2
        assert_eq!(d.get(0, 2), 36.0);
    }

    #[test]
    fn test_symmetric_with_zero_diagonal() {
        for metric in [DistanceMetric::IndelFraction, DistanceMetric::Satoh] {
            let d = score_to_distance(sample(), metric);
            assert!(d.is_symmetric());
            assert!((0..3).all(|i| d.get(i, i) == 0.0));
        }
    }

    #[test]
    fn test_negative_scores_are_shifted() {
        let m = scores(vec![vec![5.0, -7.0], vec![-7.0, 6.0]]);
        let d = score_to_distance(m, DistanceMetric::Satoh);
        // offset = -8: s_01 = 1, min = 13
        assert!((d.get(0, 1) - (1.0 - 1.0 / 13.0)).abs() < 1e-12);
    }

    #[test]
    fn test_pair_outscoring_self_is_clamped() {
        let m = scores(vec![vec![10.0, 12.0], vec![12.0, 10.0]]);
        let d = score_to_distance(m, DistanceMetric::IndelFraction);
        assert_eq!(d.get(0, 1), 0.0);
    }

    #[test]
    fn test_parse_metric() {
        assert_eq!("satoh".parse::<DistanceMetric>().unwrap(), DistanceMetric::Satoh);
        assert_eq!("Indel-Fraction".parse::<DistanceMetric>().unwrap(), DistanceMetric::IndelFraction);
        assert!("euclidean".parse::<DistanceMetric>().is_err());
    }
}
