use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::bot::position::{GameState, PositionEvaluator};
use crate::data::dataset::Dataset;
use crate::data::scaler::MinMaxScaler;
use crate::encoding::fen::{encode_fen, feature_columns};
use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// Header of the label column in generated CSV files.
pub const LABEL_COLUMN: &str = "Who is winning";

/// Self-play data generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of games played from the starting position.
    pub simulations: usize,
    /// A game stops after this many plies even if moves remain.
    pub max_plies: usize,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig { simulations: 1, max_plies: 400, seed: 0 }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.simulations == 0 {
            return Err(NnError::InvalidConfig("at least one simulation is required".into()));
        }
        if self.max_plies == 0 {
            return Err(NnError::InvalidConfig("max plies must be at least 1".into()));
        }
        Ok(())
    }
}

/// Plays random games on `game` and records every position reached.
///
/// Each ply picks a uniformly random legal move, encodes the resulting
/// position and labels it with `evaluator` (white-positive). A game ends
/// when no legal move remains or after `max_plies`; its moves are then
/// undone so the next simulation starts from the same position. Features
/// and labels are returned unscaled.
pub fn simulate_games<G: GameState + ?Sized>(
    game: &mut G,
    evaluator: &mut dyn PositionEvaluator,
    config: &GeneratorConfig,
) -> Result<Dataset> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut examples = Vec::new();
    let mut labels = Vec::new();

    for simulation in 1..=config.simulations {
        let mut played = 0;
        let outcome = play_out(game, evaluator, &mut rng, config.max_plies, &mut played, &mut examples, &mut labels);
        for _ in 0..played {
            game.undo_move()?;
        }
        outcome?;
        log::info!("simulation [{}/{}] {} plies", simulation, config.simulations, played);
    }

    if examples.is_empty() {
        return Err(NnError::Dataset("simulations produced no positions".into()));
    }
    let features = Matrix::from_examples(&examples)?;
    Dataset::new("simulations", feature_columns(), features, labels)
}

/// Min-max scales every feature row and the labels independently.
pub fn scale_dataset(dataset: &Dataset) -> Result<Dataset> {
    let features = MinMaxScaler::fit(&dataset.features)?.transform(&dataset.features)?;
    let labels = MinMaxScaler::scale_values(&dataset.labels)?;
    Dataset::new(dataset.name.clone(), dataset.columns.clone(), features, labels)
}

/// `simulate_games` followed by `scale_dataset`: the table `Dataset::from_csv`
/// and the trainer expect.
pub fn generate_dataset<G: GameState + ?Sized>(
    game: &mut G,
    evaluator: &mut dyn PositionEvaluator,
    config: &GeneratorConfig,
) -> Result<Dataset> {
    let raw = simulate_games(game, evaluator, config)?;
    scale_dataset(&raw)
}

fn play_out<G: GameState + ?Sized, R: Rng>(
    game: &mut G,
    evaluator: &mut dyn PositionEvaluator,
    rng: &mut R,
    max_plies: usize,
    played: &mut usize,
    examples: &mut Vec<Vec<f64>>,
    labels: &mut Vec<f64>,
) -> Result<()> {
    while *played < max_plies {
        let moves = game.legal_moves();
        let Some(mv) = moves.choose(rng) else {
            break;
        };
        game.make_move(mv)?;
        *played += 1;

        let fen = game.fen();
        examples.push(encode_fen(&fen)?);
        labels.push(evaluator.evaluate(&fen)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_requires_games_and_plies() {
        assert!(GeneratorConfig::default().validate().is_ok());
        assert!(GeneratorConfig { simulations: 0, ..GeneratorConfig::default() }.validate().is_err());
        assert!(GeneratorConfig { max_plies: 0, ..GeneratorConfig::default() }.validate().is_err());
    }

    #[test]
    fn scaling_maps_features_and_labels_into_unit_range() {
        let features = Matrix::from_rows(vec![vec![-2.0, 0.0, 2.0], vec![5.0, 5.0, 5.0]]).unwrap();
        let ds = Dataset::new("t", vec!["a".into(), "b".into()], features, vec![-300.0, 0.0, 300.0]).unwrap();
        let scaled = scale_dataset(&ds).unwrap();
        assert_eq!(scaled.features.data[0], vec![0.0, 0.5, 1.0]);
        assert_eq!(scaled.features.data[1], vec![0.0, 0.0, 0.0]);
        assert_eq!(scaled.labels, vec![0.0, 0.5, 1.0]);
    }
}
