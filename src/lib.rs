pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod loss;
pub mod network;
pub mod data;
pub mod encoding;
pub mod train;
pub mod bot;

// Convenience re-exports
pub use error::{NnError, Result};
pub use math::matrix::Matrix;
pub use activation::activation::{Activation, ActivationChoice, ActivationFunction};
pub use layers::{composite::CompositeLayer, dense::Layer};
pub use loss::bce::BinaryCrossEntropy;
pub use network::{network::Network, spec::NetworkSpec};
pub use data::{dataset::Dataset, scaler::MinMaxScaler};
pub use encoding::fen::encode_fen;
pub use train::{train_config::TrainConfig, trainer::train_network};
