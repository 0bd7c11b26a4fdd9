use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// Per-row min-max normalisation of a (features x examples) matrix:
/// `(x - min) / (max - min)`, with zero-range rows divided by 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl MinMaxScaler {
    pub fn fit(data: &Matrix) -> Result<MinMaxScaler> {
        if data.is_empty() {
            return Err(NnError::EmptyPartition("min-max fit"));
        }
        let min = data.data.iter()
            .map(|row| row.iter().copied().fold(f64::INFINITY, f64::min))
            .collect();
        let max = data.data.iter()
            .map(|row| row.iter().copied().fold(f64::NEG_INFINITY, f64::max))
            .collect();
        Ok(MinMaxScaler { min, max })
    }

    pub fn transform(&self, data: &Matrix) -> Result<Matrix> {
        self.check(data)?;
        Ok(self.rowwise(data, |x, min, range| (x - min) / range))
    }

    pub fn inverse_transform(&self, data: &Matrix) -> Result<Matrix> {
        self.check(data)?;
        Ok(self.rowwise(data, |x, min, range| x * range + min))
    }

    /// Fits and transforms a single series.
    pub fn scale_values(values: &[f64]) -> Result<Vec<f64>> {
        let row = Matrix::row(values);
        Ok(MinMaxScaler::fit(&row)?.transform(&row)?.flatten())
    }

    fn range(&self, i: usize) -> f64 {
        let range = self.max[i] - self.min[i];
        if range == 0.0 { 1.0 } else { range }
    }

    fn rowwise<F: Fn(f64, f64, f64) -> f64>(&self, data: &Matrix, f: F) -> Matrix {
        let mut res = data.clone();
        for (i, row) in res.data.iter_mut().enumerate() {
            let range = self.range(i);
            for x in row.iter_mut() {
                *x = f(*x, self.min[i], range);
            }
        }
        res
    }

    fn check(&self, data: &Matrix) -> Result<()> {
        if data.rows != self.min.len() {
            return Err(NnError::shape("MinMaxScaler", format!("{} rows", self.min.len()), data.dims()));
        }
        Ok(())
    }
}
