use rand::Rng;
use serde::{Serialize, Deserialize};
use std::ops::{Add, Sub};

use crate::error::{NnError, Result};

/// Dense row-major matrix. Batched tensors put features on rows and
/// examples on columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Samples every entry uniformly from [-0.5, 0.5).
    pub fn uniform<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = rng.gen::<f64>() - 0.5;
            }
        }

        res
    }

    /// Builds a matrix from row vectors. Ragged input is a shape error.
    pub fn from_rows(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = data.first().map_or(0, |row| row.len());
        if let Some(bad) = data.iter().find(|row| row.len() != cols) {
            return Err(NnError::shape("Matrix::from_rows", format!("{cols} columns per row"), bad.len()));
        }
        Ok(Matrix { rows: data.len(), cols, data })
    }

    /// Single column (n x 1).
    pub fn column(values: &[f64]) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.iter().map(|&v| vec![v]).collect(),
        }
    }

    /// Single row (1 x n).
    pub fn row(values: &[f64]) -> Matrix {
        Matrix { rows: 1, cols: values.len(), data: vec![values.to_vec()] }
    }

    /// Treats each input vector as one example column.
    pub fn from_examples(examples: &[Vec<f64>]) -> Result<Matrix> {
        Ok(Matrix::from_rows(examples.to_vec())?.transpose())
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn dims(&self) -> String {
        format!("{}x{}", self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Checks that `data` really holds `rows` rows of `cols` values.
    /// Deserialized matrices can disagree with their declared shape.
    pub fn check_storage(&self, context: &'static str) -> Result<()> {
        if self.data.len() != self.rows {
            return Err(NnError::shape(context, self.dims(), format!("{} stored rows", self.data.len())));
        }
        if let Some(row) = self.data.iter().find(|row| row.len() != self.cols) {
            return Err(NnError::shape(context, self.dims(), format!("a stored row of {} values", row.len())));
        }
        Ok(())
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Element-wise combination of two same-shape matrices.
    pub fn zip_map<F>(&self, other: &Matrix, functor: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != other.shape() {
            return Err(NnError::shape("Matrix::zip_map", self.dims(), other.dims()));
        }
        let data = self.data.iter().zip(other.data.iter())
            .map(|(row_a, row_b)| {
                row_a.iter().zip(row_b.iter()).map(|(&x, &y)| functor(x, y)).collect()
            })
            .collect();
        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }

    /// Element-wise (Hadamard) product.
    pub fn hadamard(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_map(other, |x, y| x * y)
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Matrix product `self · rhs`.
    pub fn dot(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(NnError::shape(
                "Matrix::dot",
                format!("{} rows on the right operand", self.cols),
                rhs.dims(),
            ));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for k in 0..self.cols {
                let a = self.data[i][k];
                if a == 0.0 {
                    continue;
                }
                for j in 0..res.cols {
                    res.data[i][j] += a * rhs.data[k][j];
                }
            }
        }

        Ok(res)
    }

    /// Adds an (rows x 1) column to every column of `self`.
    pub fn add_column(&self, column: &Matrix) -> Result<Matrix> {
        if column.cols != 1 || column.rows != self.rows {
            return Err(NnError::shape("Matrix::add_column", format!("{}x1", self.rows), column.dims()));
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .zip(column.data.iter())
                .map(|(row, b)| row.iter().map(|x| x + b[0]).collect())
                .collect(),
        })
    }

    /// Sums across columns, giving a (rows x 1) column.
    pub fn sum_rows(&self) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: 1,
            data: self.data.iter().map(|row| vec![row.iter().sum()]).collect(),
        }
    }

    /// Copies the given columns, in the given order.
    pub fn select_columns(&self, indices: &[usize]) -> Result<Matrix> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.cols) {
            return Err(NnError::shape("Matrix::select_columns", format!("column < {}", self.cols), bad));
        }
        Ok(Matrix {
            rows: self.rows,
            cols: indices.len(),
            data: self.data
                .iter()
                .map(|row| indices.iter().map(|&j| row[j]).collect())
                .collect(),
        })
    }

    /// All entries in row-major order.
    pub fn flatten(&self) -> Vec<f64> {
        self.data.iter().flatten().copied().collect()
    }

    pub fn all_finite(&self) -> bool {
        self.data.iter().flatten().all(|x| x.is_finite())
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes: {} + {}", self.dims(), rhs.dims())
        }

        let mut res = self;

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] += rhs.data[i][j];
            }
        }

        res
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes: {} - {}", self.dims(), rhs.dims())
        }

        let mut res = self;

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] -= rhs.data[i][j];
            }
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_matches_hand_computation() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = Matrix::column(&[5.0, 6.0]);
        assert_eq!(a.dot(&b).unwrap().flatten(), vec![17.0, 39.0]);
    }

    #[test]
    fn dot_rejects_mismatched_inner_dimension() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        assert!(matches!(a.dot(&b), Err(NnError::Shape { .. })));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(Matrix::from_rows(vec![vec![1.0], vec![1.0, 2.0]]).is_err());
    }

    #[test]
    fn add_column_broadcasts_over_examples() {
        let a = Matrix::zeros(2, 3);
        let res = a.add_column(&Matrix::column(&[1.0, -1.0])).unwrap();
        assert_eq!(res.data, vec![vec![1.0; 3], vec![-1.0; 3]]);
        assert_eq!(res.sum_rows().flatten(), vec![3.0, -3.0]);
    }

    #[test]
    fn select_columns_keeps_requested_order() {
        let a = Matrix::row(&[10.0, 20.0, 30.0]);
        assert_eq!(a.select_columns(&[2, 0]).unwrap().flatten(), vec![30.0, 10.0]);
        assert!(a.select_columns(&[3]).is_err());
    }

    #[test]
    fn storage_must_match_declared_shape() {
        let mut m = Matrix::zeros(4, 1);
        assert!(m.check_storage("test").is_ok());
        m.data = vec![vec![0.1]];
        assert!(matches!(m.check_storage("test"), Err(NnError::Shape { .. })));
        m.data = vec![vec![0.0], vec![0.0], vec![0.0, 1.0], vec![0.0]];
        assert!(m.check_storage("test").is_err());
    }
}
