// Scripted game collaborators shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;

use rookery_nn::bot::{GameState, PositionEvaluator};
use rookery_nn::{NnError, Result};

pub const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
pub const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
pub const AFTER_A3: &str = "rnbqkbnr/pppppppp/8/8/8/P7/1PPPPPPP/RNBQKBNR b KQkq - 0 1";

/// Two legal moves from the start position; no moves after either.
pub struct ScriptedGame {
    pub root: String,
    pub moves: HashMap<String, String>,
    pub history: Vec<String>,
}

impl ScriptedGame {
    pub fn opening() -> ScriptedGame {
        let mut moves = HashMap::new();
        moves.insert("e2e4".to_string(), AFTER_E4.to_string());
        moves.insert("a2a3".to_string(), AFTER_A3.to_string());
        ScriptedGame { root: START.to_string(), moves, history: Vec::new() }
    }
}

impl GameState for ScriptedGame {
    fn legal_moves(&self) -> Vec<String> {
        if !self.history.is_empty() {
            return Vec::new();
        }
        let mut moves: Vec<String> = self.moves.keys().cloned().collect();
        moves.sort();
        moves
    }

    fn make_move(&mut self, mv: &str) -> Result<()> {
        if !self.moves.contains_key(mv) {
            return Err(NnError::Game(format!("illegal move {mv}")));
        }
        self.history.push(mv.to_string());
        Ok(())
    }

    fn undo_move(&mut self) -> Result<()> {
        self.history.pop().map(|_| ()).ok_or_else(|| NnError::Game("nothing to undo".into()))
    }

    fn fen(&self) -> String {
        match self.history.last() {
            Some(mv) => self.moves[mv].clone(),
            None => self.root.clone(),
        }
    }
}

/// Fixed scores per FEN, 0 for anything unknown.
pub struct TableEvaluator(pub HashMap<String, f64>);

impl TableEvaluator {
    pub fn opening() -> TableEvaluator {
        TableEvaluator(HashMap::from([
            (AFTER_E4.to_string(), -300.0),
            (AFTER_A3.to_string(), 300.0),
        ]))
    }
}

impl PositionEvaluator for TableEvaluator {
    fn evaluate(&mut self, fen: &str) -> Result<f64> {
        Ok(self.0.get(fen).copied().unwrap_or(0.0))
    }
}
