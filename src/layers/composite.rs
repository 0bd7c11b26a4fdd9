use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::{Activation, ActivationFunction};
use crate::error::Result;
use crate::layers::dense::{Gradients, Layer};
use crate::math::matrix::Matrix;

/// A `Layer` followed by an element-wise `Activation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeLayer {
    pub linear: Layer,
    pub activation: Activation,
}

impl CompositeLayer {
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        units: usize,
        learning_rate: f64,
        regularization: f64,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Result<CompositeLayer> {
        Ok(CompositeLayer {
            linear: Layer::new(input_size, units, learning_rate, regularization, rng)?,
            activation: Activation::new(activation),
        })
    }

    pub fn from_parts(linear: Layer, activation: ActivationFunction) -> CompositeLayer {
        CompositeLayer { linear, activation: Activation::new(activation) }
    }

    pub fn input_size(&self) -> usize {
        self.linear.input_size()
    }

    pub fn units(&self) -> usize {
        self.linear.units()
    }

    pub fn activation_function(&self) -> ActivationFunction {
        self.activation.function
    }

    /// Inference path; neither stage records a cache.
    pub fn apply(&self, input: &Matrix) -> Result<Matrix> {
        let z = self.linear.apply(input)?;
        Ok(self.activation.apply(&z))
    }

    pub fn forward(&mut self, input: Matrix) -> Result<Matrix> {
        let z = self.linear.forward(input)?;
        Ok(self.activation.forward(z))
    }

    /// Runs the activation backward, then the affine stage on its result.
    /// The returned weight and bias gradients are the ones the inner layer
    /// already applied.
    pub fn backward(&mut self, output_gradient: &Matrix) -> Result<Gradients> {
        let pre_activation_grad = self.activation.backward(output_gradient)?;
        self.linear.backward(&pre_activation_grad)
    }
}
