//! Command-line front end: train a board-evaluation network from a CSV
//! dataset, run a saved model over a dataset, or encode a FEN position.
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` for per-batch output.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use rookery_nn::encoding::encode_fen;
use rookery_nn::{train_network, Dataset, Network, NetworkSpec, TrainConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Feedforward chess position evaluator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train a network on a CSV dataset and save the model.
    Train {
        /// CSV file: feature columns followed by a label column.
        dataset: PathBuf,
        /// Hidden-layer activation (ReLU, Sigmoid, Gaussian); overrides the
        /// network file. Without either, hidden layers use ReLU.
        #[arg(short, long)]
        activation: Option<String>,
        #[arg(short, long)]
        epochs: Option<usize>,
        /// Number of mini-batches per epoch; 0 takes one full-partition step.
        #[arg(short, long)]
        batch_size: Option<usize>,
        /// JSON training configuration; flags override its fields.
        #[arg(long)]
        config: Option<PathBuf>,
        /// JSON network specification.
        #[arg(long)]
        network: Option<PathBuf>,
        #[arg(long)]
        model_dir: Option<PathBuf>,
        /// Seed for weight initialisation.
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Print one prediction per dataset row using a saved model.
    Predict {
        model: PathBuf,
        dataset: PathBuf,
    },
    /// Print the feature vector of a FEN position as one CSV row.
    Encode {
        fen: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> rookery_nn::Result<()> {
    match cli.command {
        Command::Train { dataset, activation, epochs, batch_size, config, network, model_dir, seed } => {
            let mut train_config = match config {
                Some(path) => TrainConfig::load_json(path)?,
                None => TrainConfig::default(),
            };
            if let Some(epochs) = epochs {
                train_config.epochs = epochs;
            }
            if let Some(batch_size) = batch_size {
                train_config.batch_size = batch_size;
            }
            if let Some(dir) = model_dir {
                train_config.model_dir = dir;
            }

            let spec = network_spec(network, activation)?;

            let data = Dataset::from_csv(&dataset, spec.input_size)?;
            let mut built = spec.build(&mut StdRng::seed_from_u64(seed))?;

            let report = train_network(&mut built.network, &data, &train_config)?;
            println!("test mae: {:.6}", report.test_mae);
            println!("model: {}", report.model_path.display());
        }
        Command::Predict { model, dataset } => {
            let network = Network::load_json(&model)?;
            let data = Dataset::from_csv(&dataset, network.input_size())?;
            for prediction in network.predict(&data.features)? {
                println!("{prediction}");
            }
        }
        Command::Encode { fen } => {
            let features = encode_fen(&fen)?;
            let row: Vec<String> = features.iter().map(|v| v.to_string()).collect();
            println!("{}", row.join(","));
        }
    }
    Ok(())
}

/// Network file (or the default architecture), with `activation` replacing
/// its hidden activations only when given.
fn network_spec(network: Option<PathBuf>, activation: Option<String>) -> rookery_nn::Result<NetworkSpec> {
    let spec = match network {
        Some(path) => NetworkSpec::load_json(path)?,
        None => NetworkSpec::default(),
    };
    Ok(match activation {
        Some(name) => spec.with_hidden_activation(&name),
        None => spec,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_train(args: &[&str]) -> (Option<PathBuf>, Option<String>) {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Train { network, activation, .. } => (network, activation),
            other => panic!("parsed {other:?}"),
        }
    }

    #[test]
    fn network_file_activations_survive_without_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");
        let mut spec = NetworkSpec::default();
        spec.activations = vec!["Gaussian".into(); spec.hidden_sizes.len()];
        spec.save_json(&path).unwrap();
        let path_arg = path.to_string_lossy().into_owned();

        let (network, activation) = parse_train(&["rookery", "train", "games.csv", "--network", &path_arg]);
        assert_eq!(activation, None);
        assert_eq!(network_spec(network, activation).unwrap().activations, spec.activations);

        let (network, activation) =
            parse_train(&["rookery", "train", "games.csv", "--network", &path_arg, "-a", "Sigmoid"]);
        let overridden = network_spec(network, activation).unwrap();
        assert_eq!(overridden.activations[0], "Sigmoid");
        assert_eq!(overridden.activations.len(), spec.hidden_sizes.len() + 1);
    }

    #[test]
    fn default_architecture_without_network_file() {
        let (network, activation) = parse_train(&["rookery", "train", "games.csv"]);
        assert_eq!(network_spec(network, activation).unwrap(), NetworkSpec::default());
    }
}
