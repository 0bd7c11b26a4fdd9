use rand::{rngs::StdRng, SeedableRng};
use rookery_nn::train::train_loop;
use rookery_nn::{ActivationFunction, Dataset, Matrix, Network, TrainConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let examples = vec![
        vec![0.0, 0.0],
        vec![0.2, 0.3],
        vec![0.4, 0.1],
        vec![0.9, 0.8],
        vec![0.7, 0.9],
        vec![1.0, 0.6],
    ];
    let labels = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
    let features = Matrix::from_examples(&examples).expect("rectangular examples");
    let data = Dataset::new("toy", vec!["x".into(), "y".into()], features, labels)
        .expect("labels match examples");

    let mut rng = StdRng::seed_from_u64(0);
    let mut network = Network::new(2, &[2], 1, 0.5, 0.0, &[ActivationFunction::Sigmoid], &mut rng)
        .expect("valid architecture");

    let history = train_loop(&mut network, &data, &TrainConfig::new(2000, 0)).expect("training");
    for stats in history.iter().step_by(250) {
        println!("Epoch {}: cost = {:.6}, mae = {:.6}", stats.epoch, stats.cost, stats.mae);
    }

    for (input, prediction) in examples.iter().zip(network.predict(&data.features).expect("predict")) {
        println!("Input: {:?} -> Output: {:.4}", input, prediction);
    }
}
