use crate::{Error, Result};

/// Dense N x N similarity scores, row-major
///
/// Row/column `i` belongs to catalog position `i`. Values are taken as
/// produced upstream; the diagonal carries no meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dim: usize,
    data: Vec<f32>,
}

impl SimilarityMatrix {
    pub fn new(dim: usize, data: Vec<f32>) -> Result<Self> {
        let expected = dim.checked_mul(dim).ok_or_else(|| {
            Error::DataCorrupt(format!("matrix dimension {} overflows", dim))
        })?;
        if data.len() != expected {
            return Err(Error::DataCorrupt(format!(
                "matrix of dimension {} needs {} values, got {}",
                dim,
                expected,
                data.len()
            )));
        }
        if let Some(idx) = data.iter().position(|v| !v.is_finite()) {
            return Err(Error::DataCorrupt(format!(
                "non-finite similarity at ({}, {})",
                idx / dim,
                idx % dim
            )));
        }
        Ok(Self { dim, data })
    }

    /// Build from nested rows; every row must have `rows.len()` entries
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let dim = rows.len();
        let mut data = Vec::with_capacity(dim * dim);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dim {
                return Err(Error::DataCorrupt(format!(
                    "row {} has {} values, expected {}",
                    i,
                    row.len(),
                    dim
                )));
            }
            data.extend(row);
        }
        Self::new(dim, data)
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn row(&self, position: usize) -> Result<&[f32]> {
        if position >= self.dim {
            return Err(Error::OutOfRange {
                position,
                len: self.dim,
            });
        }
        let start = position * self.dim;
        Ok(&self.data[start..start + self.dim])
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        if i < self.dim && j < self.dim {
            Some(self.data[i * self.dim + j])
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// First off-diagonal pair `(i, j)` with `|sim[i][j] - sim[j][i]| > tolerance`
    pub fn asymmetry(&self, tolerance: f32) -> Option<(usize, usize)> {
        for i in 0..self.dim {
            for j in (i + 1)..self.dim {
                let a = self.data[i * self.dim + j];
                let b = self.data[j * self.dim + i];
                if (a - b).abs() > tolerance {
                    return Some((i, j));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows() {
        let m = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.5, 0.2],
            vec![0.5, 1.0, 0.3],
            vec![0.2, 0.3, 1.0],
        ])
        .unwrap();
        assert_eq!(m.dim(), 3);
        assert_eq!(m.row(1).unwrap(), &[0.5, 1.0, 0.3]);
        assert_eq!(m.get(2, 0), Some(0.2));
        assert_eq!(m.get(3, 0), None);
        assert_eq!(m.row(3), Err(Error::OutOfRange { position: 3, len: 3 }));
        assert_eq!(m.asymmetry(1e-6), None);
    }

    #[test]
    fn test_shape_and_value_validation() {
        assert!(matches!(
            SimilarityMatrix::new(2, vec![1.0, 0.0, 0.0]),
            Err(Error::DataCorrupt(_))
        ));
        assert!(matches!(
            SimilarityMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0]]),
            Err(Error::DataCorrupt(_))
        ));
        assert!(matches!(
            SimilarityMatrix::new(2, vec![1.0, f32::NAN, 0.0, 1.0]),
            Err(Error::DataCorrupt(_))
        ));
    }

    #[test]
    fn test_asymmetry_reports_first_pair() {
        let m = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.5, 0.2],
            vec![0.5, 1.0, 0.3],
            vec![0.2, 0.9, 1.0],
        ])
        .unwrap();
        assert_eq!(m.asymmetry(1e-6), Some((1, 2)));
    }
}
