pub mod fen;

pub use fen::{encode_fen, feature_columns, FEATURE_COLUMNS, FEATURE_COUNT};
