pub mod bce;
pub mod mae;

pub use bce::BinaryCrossEntropy;
pub use mae::mean_absolute_error;
