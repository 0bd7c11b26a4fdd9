use serde::{Deserialize, Serialize};

/// Optional annotations attached to a saved Network.
/// All fields are Option<> so artifacts without metadata deserialize cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ModelMetadata {
    /// Dataset the model was trained on.
    pub dataset: Option<String>,
    /// Feature column names in input order.
    pub feature_columns: Option<Vec<String>>,
    pub epochs: Option<usize>,
    /// Mini-batch count, 0 for a single full-partition step per epoch.
    pub batch_size: Option<usize>,
    pub test_mae: Option<f64>,
}
