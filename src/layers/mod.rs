pub mod dense;
pub mod composite;

pub use dense::{Gradients, Layer};
pub use composite::CompositeLayer;
