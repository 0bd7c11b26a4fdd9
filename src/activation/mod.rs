pub mod activation;

pub use activation::{Activation, ActivationChoice, ActivationFunction};
