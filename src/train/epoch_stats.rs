use std::path::PathBuf;

use serde::{Serialize, Deserialize};

/// Per-epoch training statistics.
///
/// In mini-batch mode `cost` and `mae` are averages over the epoch's
/// batches; otherwise they come from the single full-partition step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    pub cost: f64,
    pub mae: f64,
    /// Number of gradient steps taken this epoch.
    pub steps: usize,
    pub elapsed_ms: u64,
}

/// Outcome of a complete training run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub epochs: Vec<EpochStats>,
    pub test_mae: f64,
    pub model_path: PathBuf,
}
