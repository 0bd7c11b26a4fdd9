// Move ranking against a scripted game and evaluator.

mod common;

use common::{ScriptedGame, TableEvaluator, START};
use rookery_nn::bot::{best_move, rank_moves, GameState, Side};
use rookery_nn::encoding::FEATURE_COUNT;
use rookery_nn::{ActivationFunction, CompositeLayer, Layer, Matrix, Network};

const E4_FEATURE: usize = 36;

// Output-only network that rewards a pawn on e4.
fn e4_lover() -> Network {
    let mut weights = vec![0.0; FEATURE_COUNT];
    weights[E4_FEATURE] = 5.0;
    let linear = Layer::from_parameters(Matrix::row(&weights), Matrix::column(&[0.0]), 0.1, 0.0).unwrap();
    Network::from_layers(Vec::new(), CompositeLayer::from_parts(linear, ActivationFunction::Sigmoid)).unwrap()
}

#[test]
fn white_prefers_the_move_the_network_likes() {
    let net = e4_lover();
    let mut game = ScriptedGame::opening();

    let ranked = rank_moves(&net, &mut game, Side::White, None).unwrap();

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].mv, "e2e4");
    assert!(ranked[0].prediction > 0.99);
    assert_eq!(ranked[1].prediction, 0.5);
    assert!(ranked.iter().all(|c| c.engine_score.is_none() && c.scaled_engine_score == 0.0));
    assert!(game.history.is_empty());
    assert_eq!(game.fen(), START);
}

#[test]
fn black_sign_flips_the_preference() {
    let net = e4_lover();
    let mut game = ScriptedGame::opening();
    assert_eq!(best_move(&net, &mut game, Side::Black, None).unwrap().as_deref(), Some("a2a3"));
}

#[test]
fn engine_scores_are_scaled_and_combined() {
    let net = e4_lover();
    let mut game = ScriptedGame::opening();
    let mut engine = TableEvaluator::opening();

    let ranked = rank_moves(&net, &mut game, Side::White, Some(&mut engine)).unwrap();

    assert_eq!(ranked[0].mv, "a2a3");
    assert_eq!(ranked[0].engine_score, Some(300.0));
    assert_eq!(ranked[0].scaled_engine_score, 1.0);
    assert_eq!(ranked[0].combined, 1.5);
    assert_eq!(ranked[1].scaled_engine_score, 0.0);
    assert!(game.history.is_empty());
}

#[test]
fn no_legal_moves_means_no_ranking() {
    let net = e4_lover();
    let mut game = ScriptedGame::opening();
    game.make_move("e2e4").unwrap();
    assert!(rank_moves(&net, &mut game, Side::Black, None).unwrap().is_empty());
    assert_eq!(best_move(&net, &mut game, Side::Black, None).unwrap(), None);
}
