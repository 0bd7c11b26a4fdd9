use crate::error::Result;

/// The board engine as seen by the move ranker. Moves are opaque strings
/// (for example UCI "e2e4"); legality is the implementor's concern.
pub trait GameState {
    fn legal_moves(&self) -> Vec<String>;

    fn make_move(&mut self, mv: &str) -> Result<()>;

    /// Reverts the most recent `make_move`.
    fn undo_move(&mut self) -> Result<()>;

    /// Current position in Forsyth-Edwards notation.
    fn fen(&self) -> String;
}

/// External position scorer, positive when white is better.
pub trait PositionEvaluator {
    fn evaluate(&mut self, fen: &str) -> Result<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    White,
    Black,
}

impl Side {
    /// +1 for white, -1 for black.
    pub fn sign(self) -> f64 {
        match self {
            Side::White => 1.0,
            Side::Black => -1.0,
        }
    }
}
