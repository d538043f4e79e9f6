// matrix.rs - Dense symmetric matrices for alignment scores and distances

use std::ops::Deref;

/// Row-major N×N matrix of `f64`
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SquareMatrix {
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Build from nested rows; every row must have `rows.len()` entries
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let n = rows.len();
        if rows.iter().any(|r| r.len() != n) {
            return None;
        }
        Some(Self {
            n,
            data: rows.iter().flatten().copied().collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Write `value` at (i, j) and (j, i)
    #[inline]
    pub(crate) fn set_symmetric(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n + j] = value;
        self.data[j * self.n + i] = value;
    }

    /// Smallest entry, `None` for an empty matrix
    pub fn min(&self) -> Option<f64> {
        self.data.iter().copied().reduce(f64::min)
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| (i + 1..self.n).all(|j| self.get(i, j).to_bits() == self.get(j, i).to_bits()))
    }
}

/// Pairwise alignment scores; the diagonal holds self-alignment scores
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix(SquareMatrix);

impl ScoreMatrix {
    pub fn new(matrix: SquareMatrix) -> Self {
        Self(matrix)
    }

    /// Subtract `min - 1` from every cell so all scores are at least 1.
    /// Returns the offset that was removed.
    pub fn subtract_offset(&mut self) -> f64 {
        let offset = match self.0.min() {
            Some(min) => min - 1.0,
            None => return 0.0,
        };
        for v in self.0.data.iter_mut() {
            *v -= offset;
        }
        offset
    }

    pub fn into_inner(self) -> SquareMatrix {
        self.0
    }
}

impl Deref for ScoreMatrix {
    type Target = SquareMatrix;

    fn deref(&self) -> &SquareMatrix {
        &self.0
    }
}

/// Pairwise distances; non-negative and symmetric
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix(SquareMatrix);

impl DistanceMatrix {
    pub fn new(matrix: SquareMatrix) -> Self {
        Self(matrix)
    }
}

impl Deref for DistanceMatrix {
    type Target = SquareMatrix;

    fn deref(&self) -> &SquareMatrix {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        assert!(SquareMatrix::from_rows(&[vec![0.0, 1.0], vec![1.0]]).is_none());
        let m = SquareMatrix::from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.get(0, 1), 1.0);
        assert!(m.is_symmetric());
    }

    #[test]
    fn test_subtract_offset_makes_scores_positive() {
        let rows = vec![vec![10.0, -3.0], vec![-3.0, 8.0]];
        let mut scores = ScoreMatrix::new(SquareMatrix::from_rows(&rows).unwrap());
        let offset = scores.subtract_offset();

        assert_eq!(offset, -4.0);
        assert_eq!(scores.get(0, 1), 1.0);
        assert_eq!(scores.get(0, 0), 14.0);
        assert_eq!(scores.min(), Some(1.0));
    }

    #[test]
    fn test_empty_matrix() {
        let mut scores = ScoreMatrix::new(SquareMatrix::zeros(0));
        assert!(scores.is_empty());
        assert_eq!(scores.subtract_offset(), 0.0);
    }
}
