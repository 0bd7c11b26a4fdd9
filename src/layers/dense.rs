use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// Gradients produced by one backward step.
#[derive(Debug, Clone)]
pub struct Gradients {
    /// dL/dA for the previous layer, shape (input_size, examples).
    pub input: Matrix,
    pub weights: Matrix,
    pub biases: Matrix,
}

/// Affine stage `Z = W·A + b`, batched over example columns.
///
/// `weights` is (units x input_size), `biases` is (units x 1). The layer
/// updates itself by gradient descent inside `backward`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub weights: Matrix,
    pub biases: Matrix,
    pub learning_rate: f64,
    pub regularization: f64,
    #[serde(skip)]
    cache: Option<Matrix>,
}

impl Layer {
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        units: usize,
        learning_rate: f64,
        regularization: f64,
        rng: &mut R,
    ) -> Result<Layer> {
        if input_size == 0 || units == 0 {
            return Err(NnError::InvalidConfig(format!(
                "layer dimensions must be positive, got {units}x{input_size}"
            )));
        }
        Ok(Layer {
            weights: Matrix::uniform(units, input_size, rng),
            biases: Matrix::uniform(units, 1, rng),
            learning_rate,
            regularization,
            cache: None,
        })
    }

    /// Builds a layer around existing parameters.
    pub fn from_parameters(
        weights: Matrix,
        biases: Matrix,
        learning_rate: f64,
        regularization: f64,
    ) -> Result<Layer> {
        let layer = Layer { weights, biases, learning_rate, regularization, cache: None };
        layer.check_parameters()?;
        Ok(layer)
    }

    pub fn input_size(&self) -> usize {
        self.weights.cols
    }

    pub fn units(&self) -> usize {
        self.weights.rows
    }

    /// Checks the weight/bias invariants; used after deserialisation too.
    pub fn check_parameters(&self) -> Result<()> {
        if self.weights.is_empty() {
            return Err(NnError::shape("Layer weights", "non-empty matrix", self.weights.dims()));
        }
        if self.biases.shape() != (self.units(), 1) {
            return Err(NnError::shape("Layer biases", format!("{}x1", self.units()), self.biases.dims()));
        }
        self.weights.check_storage("Layer weights")?;
        self.biases.check_storage("Layer biases")?;
        Ok(())
    }

    /// Computes `W·input + b` without touching the cache.
    pub fn apply(&self, input: &Matrix) -> Result<Matrix> {
        if input.rows != self.input_size() {
            return Err(NnError::shape(
                "Layer::forward",
                format!("{} input rows", self.input_size()),
                input.dims(),
            ));
        }
        self.weights.dot(input)?.add_column(&self.biases)
    }

    pub fn forward(&mut self, input: Matrix) -> Result<Matrix> {
        let output = self.apply(&input)?;
        self.cache = Some(input);
        Ok(output)
    }

    /// Back-propagates `output_gradient` (dL/dZ) and applies one descent step.
    ///
    /// The L2 term `regularization · parameter` is added to both the weight
    /// and the bias gradient. The input gradient uses the weights as they
    /// were before the update.
    pub fn backward(&mut self, output_gradient: &Matrix) -> Result<Gradients> {
        let input = self.cache.take().ok_or(NnError::OutOfOrder("layer"))?;

        if output_gradient.shape() != (self.units(), input.cols) {
            return Err(NnError::shape(
                "Layer::backward",
                format!("{}x{}", self.units(), input.cols),
                output_gradient.dims(),
            ));
        }

        let weights_grad = output_gradient.dot(&input.transpose())?
            + self.weights.scale(self.regularization);
        let biases_grad = output_gradient.sum_rows() + self.biases.scale(self.regularization);
        let input_grad = self.weights.transpose().dot(output_gradient)?;

        self.weights = self.weights.clone() - weights_grad.scale(self.learning_rate);
        self.biases = self.biases.clone() - biases_grad.scale(self.learning_rate);

        Ok(Gradients {
            input: input_grad,
            weights: weights_grad,
            biases: biases_grad,
        })
    }
}
