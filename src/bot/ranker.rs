use crate::bot::position::{GameState, PositionEvaluator, Side};
use crate::data::scaler::MinMaxScaler;
use crate::encoding::fen::encode_fen;
use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// One candidate move and how it was scored.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveScore {
    pub mv: String,
    /// Network output for the resulting position, signed for the mover.
    pub prediction: f64,
    /// Raw evaluator score, signed for the mover.
    pub engine_score: Option<f64>,
    /// Evaluator score min-max scaled across the candidates, 0 without an evaluator.
    pub scaled_engine_score: f64,
    pub combined: f64,
}

/// Scores every legal move for `side`, best first.
///
/// Each move is played, the resulting position encoded (and scored by
/// `evaluator` if given), then undone. Candidate features are min-max
/// scaled together before prediction, the way `scale_dataset` normalises
/// generated training data.
pub fn rank_moves<G: GameState + ?Sized>(
    network: &Network,
    game: &mut G,
    side: Side,
    mut evaluator: Option<&mut dyn PositionEvaluator>,
) -> Result<Vec<MoveScore>> {
    let moves = game.legal_moves();
    if moves.is_empty() {
        return Ok(Vec::new());
    }

    let mut encoded = Vec::with_capacity(moves.len());
    let mut engine_scores = Vec::with_capacity(moves.len());
    for mv in &moves {
        game.make_move(mv)?;
        let fen = game.fen();
        let features = encode_fen(&fen);
        let score = evaluator.as_mut().map(|engine| engine.evaluate(&fen));
        game.undo_move()?;

        encoded.push(features?);
        if let Some(score) = score.transpose()? {
            engine_scores.push(score * side.sign());
        }
    }

    let features = Matrix::from_examples(&encoded)?;
    let scaled = MinMaxScaler::fit(&features)?.transform(&features)?;
    let predictions = network.predict(&scaled)?;

    let scaled_engine = if engine_scores.len() == moves.len() {
        MinMaxScaler::scale_values(&engine_scores)?
    } else {
        vec![0.0; moves.len()]
    };

    let mut ranked: Vec<MoveScore> = moves.into_iter()
        .enumerate()
        .map(|(i, mv)| {
            let prediction = predictions[i] * side.sign();
            MoveScore {
                mv,
                prediction,
                engine_score: engine_scores.get(i).copied(),
                scaled_engine_score: scaled_engine[i],
                combined: prediction + scaled_engine[i],
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.combined.total_cmp(&a.combined));

    for candidate in &ranked {
        log::debug!(
            "{}: prediction {:.4}, engine {:?}, combined {:.4}",
            candidate.mv,
            candidate.prediction,
            candidate.engine_score,
            candidate.combined
        );
    }
    Ok(ranked)
}

/// Highest-ranked move, or `None` when there are no legal moves.
pub fn best_move<G: GameState + ?Sized>(
    network: &Network,
    game: &mut G,
    side: Side,
    evaluator: Option<&mut dyn PositionEvaluator>,
) -> Result<Option<String>> {
    Ok(rank_moves(network, game, side, evaluator)?
        .into_iter()
        .next()
        .map(|candidate| candidate.mv))
}
