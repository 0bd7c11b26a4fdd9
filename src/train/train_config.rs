use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};

/// Configuration for a training run.
///
/// # Fields
/// - `epochs`       : number of passes over the training partition
/// - `batch_size`   : number of mini-batches per epoch; `0` takes one
///                     step over the whole partition per epoch
/// - `test_fraction`: share of the dataset held out for evaluation
/// - `split_seed`   : seed of the train/test partition
/// - `shuffle_seed` : seed of the per-epoch shuffles in mini-batch mode
/// - `model_dir`    : directory the trained model is written to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub test_fraction: f64,
    pub split_seed: u64,
    pub shuffle_seed: u64,
    pub model_dir: PathBuf,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 10,
            batch_size: 0,
            test_fraction: 0.2,
            split_seed: 42,
            shuffle_seed: 7,
            model_dir: PathBuf::from("models"),
        }
    }
}

impl TrainConfig {
    pub fn new(epochs: usize, batch_size: usize) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            ..TrainConfig::default()
        }
    }

    pub fn is_mini_batch(&self) -> bool {
        self.batch_size > 0
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(NnError::InvalidConfig("epochs must be at least 1".into()));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(NnError::InvalidConfig(format!(
                "test fraction must lie in (0, 1), got {}",
                self.test_fraction
            )));
        }
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<TrainConfig> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
