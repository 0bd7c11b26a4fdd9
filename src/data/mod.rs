pub mod dataset;
pub mod generator;
pub mod scaler;

pub use dataset::Dataset;
pub use generator::{generate_dataset, scale_dataset, simulate_games, GeneratorConfig, LABEL_COLUMN};
pub use scaler::MinMaxScaler;
