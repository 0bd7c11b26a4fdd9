pub mod position;
pub mod ranker;

pub use position::{GameState, PositionEvaluator, Side};
pub use ranker::{best_move, rank_moves, MoveScore};
