use thiserror::Error;

/// Every failure the engine reports to its callers.
#[derive(Debug, Error)]
pub enum NnError {
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    Shape {
        context: &'static str,
        expected: String,
        actual: String,
    },

    #[error("{0}: backward called without a matching forward pass")]
    OutOfOrder(&'static str),

    #[error("partition '{0}' contains no examples")]
    EmptyPartition(&'static str),

    #[error("batch count {batches} exceeds the {examples} available training examples")]
    BatchTooLarge { batches: usize, examples: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("invalid FEN '{fen}': {reason}")]
    Fen { fen: String, reason: String },

    #[error("corrupt model artifact: {0}")]
    CorruptModel(String),

    #[error("game collaborator error: {0}")]
    Game(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, NnError>;

impl NnError {
    pub(crate) fn shape(context: &'static str, expected: impl ToString, actual: impl ToString) -> Self {
        NnError::Shape {
            context,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}
