use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// Predictions are clamped into [EPS, 1 - EPS] before any log or division.
pub const EPS: f64 = 1e-12;

/// Binary cross-entropy over a batch of sigmoid outputs.
///
/// `forward` caches the clamped predictions; `backward` consumes them.
#[derive(Debug, Clone, Default)]
pub struct BinaryCrossEntropy {
    cache: Option<Matrix>,
}

impl BinaryCrossEntropy {
    pub fn new() -> BinaryCrossEntropy {
        BinaryCrossEntropy { cache: None }
    }

    /// Scalar cost: -(1/m)·Σ[y·log(p) + (1-y)·log(1-p)], m = example columns.
    pub fn forward(&mut self, predictions: &Matrix, labels: &Matrix) -> Result<f64> {
        check_batch(predictions, labels)?;
        let clamped = predictions.map(clamp);
        let m = clamped.cols as f64;

        let total: f64 = clamped.data.iter().flatten()
            .zip(labels.data.iter().flatten())
            .map(|(p, y)| y * p.ln() + (1.0 - y) * (1.0 - p).ln())
            .sum();

        self.cache = Some(clamped);
        Ok(-total / m)
    }

    /// Gradient of the cost with respect to each prediction:
    /// -(1/m)·(y - p) / (p·(1 - p)), using the cached clamped predictions.
    pub fn backward(&mut self, labels: &Matrix) -> Result<Matrix> {
        let predictions = self.cache.take().ok_or(NnError::OutOfOrder("binary cross-entropy"))?;
        check_batch(&predictions, labels)?;
        let m = predictions.cols as f64;
        predictions.zip_map(labels, |p, y| -(y - p) / (p * (1.0 - p)) / m)
    }
}

fn clamp(p: f64) -> f64 {
    if p.is_nan() {
        return 0.5;
    }
    p.clamp(EPS, 1.0 - EPS)
}

fn check_batch(predictions: &Matrix, labels: &Matrix) -> Result<()> {
    if predictions.is_empty() {
        return Err(NnError::EmptyPartition("loss batch"));
    }
    if predictions.shape() != labels.shape() {
        return Err(NnError::shape("BinaryCrossEntropy", predictions.dims(), labels.dims()));
    }
    Ok(())
}
