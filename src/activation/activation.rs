use serde::{Serialize, Deserialize};
use std::fmt;

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    ReLU,
    Sigmoid,
    Gaussian,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Sigmoid => {
                // Both branches are 1 / (1 + e^-x); the second avoids e^-x overflow.
                if x >= 0.0 {
                    1.0 / (1.0 + (-x).exp())
                } else {
                    let e = x.exp();
                    e / (1.0 + e)
                }
            }
            ActivationFunction::Gaussian => (-x * x).exp(),
        }
    }

    /// Local derivative evaluated at the pre-activation input `x`.
    ///
    /// Sigmoid uses e^-x / (1 + e^-x)^2 rather than σ(x)·(1 - σ(x)). The
    /// expression is even in `x`, so it is evaluated at -|x| to keep the
    /// exponent from overflowing for large negative inputs.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Sigmoid => {
                let e = (-x.abs()).exp();
                e / ((1.0 + e) * (1.0 + e))
            }
            ActivationFunction::Gaussian => -2.0 * x * (-x * x).exp(),
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<ActivationFunction> {
        match name.trim().to_ascii_lowercase().as_str() {
            "relu" => Some(ActivationFunction::ReLU),
            "sigmoid" => Some(ActivationFunction::Sigmoid),
            "gaussian" => Some(ActivationFunction::Gaussian),
            _ => None,
        }
    }

    /// Resolves a name, substituting ReLU for anything unrecognised.
    /// The substitution is reported in the returned choice and logged.
    pub fn resolve(name: &str) -> ActivationChoice {
        match ActivationFunction::from_name(name) {
            Some(function) => ActivationChoice { function, unknown_name: None },
            None => {
                log::warn!("activation function '{name}' is not defined; using ReLU instead");
                ActivationChoice {
                    function: ActivationFunction::ReLU,
                    unknown_name: Some(name.to_string()),
                }
            }
        }
    }
}

impl fmt::Display for ActivationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivationFunction::ReLU => "ReLU",
            ActivationFunction::Sigmoid => "Sigmoid",
            ActivationFunction::Gaussian => "Gaussian",
        };
        f.write_str(name)
    }
}

/// Outcome of resolving an activation name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationChoice {
    pub function: ActivationFunction,
    /// The rejected name when ReLU was substituted.
    pub unknown_name: Option<String>,
}

impl ActivationChoice {
    pub fn is_fallback(&self) -> bool {
        self.unknown_name.is_some()
    }
}

/// Element-wise activation stage. Holds the pre-activation input from the
/// most recent `forward` until the matching `backward` consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activation {
    pub function: ActivationFunction,
    #[serde(skip)]
    cache: Option<Matrix>,
}

impl Activation {
    pub fn new(function: ActivationFunction) -> Activation {
        Activation { function, cache: None }
    }

    /// Pure evaluation, leaves the cache untouched.
    pub fn apply(&self, input: &Matrix) -> Matrix {
        input.map(|x| self.function.function(x))
    }

    pub fn forward(&mut self, input: Matrix) -> Matrix {
        let output = self.apply(&input);
        self.cache = Some(input);
        output
    }

    /// Multiplies `output_gradient` by the local derivative at the cached input.
    pub fn backward(&mut self, output_gradient: &Matrix) -> Result<Matrix> {
        let input = self.cache.take().ok_or(NnError::OutOfOrder("activation"))?;
        let local = input.map(|x| self.function.derivative(x));
        output_gradient.hadamard(&local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_exact_at_zero() {
        let s = ActivationFunction::Sigmoid;
        assert_eq!(s.function(0.0), 0.5);
        assert_eq!(s.derivative(0.0), 0.25);
    }

    #[test]
    fn sigmoid_stays_finite_at_extremes() {
        let s = ActivationFunction::Sigmoid;
        for x in [-1000.0, -50.0, 50.0, 1000.0] {
            assert!(s.function(x).is_finite());
            assert!(s.derivative(x).is_finite());
        }
    }

    #[test]
    fn relu_derivative_at_zero_is_zero() {
        assert_eq!(ActivationFunction::ReLU.derivative(0.0), 0.0);
        assert_eq!(ActivationFunction::ReLU.derivative(1e-9), 1.0);
    }

    #[test]
    fn unknown_name_falls_back_to_relu() {
        let choice = ActivationFunction::resolve("Tanh");
        assert_eq!(choice.function, ActivationFunction::ReLU);
        assert_eq!(choice.unknown_name.as_deref(), Some("Tanh"));
        assert!(!ActivationFunction::resolve("gaussian").is_fallback());
    }

    #[test]
    fn backward_without_forward_is_rejected() {
        let mut act = Activation::new(ActivationFunction::Gaussian);
        assert!(matches!(
            act.backward(&Matrix::zeros(1, 1)),
            Err(NnError::OutOfOrder(_))
        ));
    }
}
