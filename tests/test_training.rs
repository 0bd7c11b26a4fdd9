// Training loop behaviour: batching, convergence and the end-to-end run.

use std::collections::HashSet;

use approx::assert_abs_diff_eq;
use rand::{rngs::StdRng, SeedableRng};

use rookery_nn::train::{partition_batches, train_loop};
use rookery_nn::{
    train_network, ActivationFunction, Dataset, Matrix, Network, NnError, TrainConfig,
};

// Points on a 5x5 grid in [0, 1]^2, labelled 1 above the line x + y = 1.
fn separable(name: &str) -> Dataset {
    let mut examples = Vec::new();
    let mut labels = Vec::new();
    for i in 0..5 {
        for j in 0..5 {
            let (x, y) = (i as f64 / 4.0, j as f64 / 4.0);
            if (x + y - 1.0).abs() < 1e-9 {
                continue;
            }
            examples.push(vec![x, y]);
            labels.push(if x + y > 1.0 { 1.0 } else { 0.0 });
        }
    }
    let features = Matrix::from_examples(&examples).unwrap();
    Dataset::new(name, vec!["x".into(), "y".into()], features, labels).unwrap()
}

fn small_network(seed: u64, learning_rate: f64) -> Network {
    let mut rng = StdRng::seed_from_u64(seed);
    Network::new(2, &[2], 1, learning_rate, 0.0, &[ActivationFunction::Sigmoid], &mut rng).unwrap()
}

#[test]
fn batches_cover_every_example_exactly_once() {
    for n in 1..40 {
        for k in 1..=n {
            let ranges = partition_batches(n, k).unwrap();
            assert_eq!(ranges.len(), k);

            let mut seen = HashSet::new();
            for range in &ranges {
                assert!(!range.is_empty());
                for i in range.clone() {
                    assert!(seen.insert(i), "index {i} repeated for n={n}, k={k}");
                }
            }
            assert_eq!(seen.len(), n);

            let sizes: Vec<usize> = ranges.iter().map(|r| r.len()).collect();
            let (min, max) = (sizes.iter().min().unwrap(), sizes.iter().max().unwrap());
            assert!(max - min <= 1);
        }
    }
}

#[test]
fn full_partition_training_reduces_cost() {
    let data = separable("grid");
    let mut net = small_network(3, 0.5);
    let config = TrainConfig::new(300, 0);

    let history = train_loop(&mut net, &data, &config).unwrap();

    assert_eq!(history.len(), 300);
    assert!(history.iter().all(|e| e.steps == 1 && e.cost.is_finite()));
    assert!(history.last().unwrap().cost < history[0].cost);
}

#[test]
fn mini_batch_training_reduces_cost() {
    let data = separable("grid");
    let mut net = small_network(4, 0.5);
    let config = TrainConfig::new(200, 4);

    let history = train_loop(&mut net, &data, &config).unwrap();

    assert!(history.iter().all(|e| e.steps == 4));
    assert!(history.last().unwrap().cost < history[0].cost);
    assert!(history.iter().all(|e| (0.0..=1.0).contains(&e.mae)));
}

#[test]
fn too_many_batches_are_rejected_before_training() {
    let data = separable("grid");
    let mut net = small_network(5, 0.5);
    let before = net.clone();
    let config = TrainConfig::new(3, data.len() + 1);

    let err = train_loop(&mut net, &data, &config).unwrap_err();
    assert!(matches!(err, NnError::BatchTooLarge { .. }));
    assert_eq!(net.output.linear.weights, before.output.linear.weights);
}

#[test]
fn feature_mismatch_is_rejected() {
    let data = separable("grid");
    let mut rng = StdRng::seed_from_u64(6);
    let mut net = Network::new(3, &[2], 1, 0.1, 0.0, &[], &mut rng).unwrap();
    assert!(matches!(
        train_loop(&mut net, &data, &TrainConfig::new(1, 0)),
        Err(NnError::Shape { .. })
    ));
}

#[test]
fn train_network_evaluates_and_saves_the_model() {
    let dir = tempfile::tempdir().unwrap();
    let data = separable("grid");
    let mut net = small_network(8, 0.5);
    let config = TrainConfig {
        epochs: 5,
        batch_size: 3,
        model_dir: dir.path().to_path_buf(),
        ..TrainConfig::default()
    };

    let report = train_network(&mut net, &data, &config).unwrap();

    assert_eq!(report.epochs.len(), 5);
    assert!(report.epochs.iter().all(|e| e.steps == 3));
    assert!(report.test_mae.is_finite());
    assert_eq!(
        report.model_path,
        dir.path().join("model_grid_Sigmoid_epochs5_minibatch3.json")
    );

    let loaded = Network::load_json(&report.model_path).unwrap();
    assert_eq!(loaded.metadata.dataset.as_deref(), Some("grid"));
    assert_eq!(loaded.metadata.epochs, Some(5));
    assert_abs_diff_eq!(loaded.metadata.test_mae.unwrap(), report.test_mae, epsilon = 1e-12);
    assert_eq!(loaded.dimensions(), net.dimensions());
}

#[test]
fn split_is_reproducible_across_runs() {
    let data = separable("grid");
    let (train_a, test_a) = data.split(0.2, 42).unwrap();
    let (train_b, test_b) = data.split(0.2, 42).unwrap();
    assert_eq!(train_a, train_b);
    assert_eq!(test_a, test_b);
    assert_eq!(train_a.len() + test_a.len(), data.len());
}
