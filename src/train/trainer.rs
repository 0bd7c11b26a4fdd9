use std::path::PathBuf;

use crate::{
    data::dataset::Dataset,
    error::{NnError, Result},
    loss::mae::mean_absolute_error,
    network::network::Network,
    train::epoch_stats::TrainReport,
    train::loop_fn::train_loop,
    train::train_config::TrainConfig,
};

/// Splits `dataset`, trains `network` on the training part, evaluates it on
/// the held-out part and saves it under `config.model_dir`.
pub fn train_network(network: &mut Network, dataset: &Dataset, config: &TrainConfig) -> Result<TrainReport> {
    config.validate()?;
    if network.output_size() != 1 {
        return Err(NnError::shape("network output", "1 unit", network.output_size()));
    }

    let (train, test) = dataset.split(config.test_fraction, config.split_seed)?;
    log::info!(
        "dataset '{}': {} training examples, {} test examples",
        dataset.name,
        train.len(),
        test.len()
    );

    let epochs = train_loop(network, &train, config)?;

    let test_predictions = network.predict(&test.features)?;
    let test_mae = mean_absolute_error(&test_predictions, &test.labels);
    log::info!("test mae: {:.6}", test_mae);

    network.metadata.dataset = Some(dataset.name.clone());
    network.metadata.feature_columns = Some(dataset.columns.clone());
    network.metadata.epochs = Some(config.epochs);
    network.metadata.batch_size = Some(config.batch_size);
    network.metadata.test_mae = Some(test_mae);

    std::fs::create_dir_all(&config.model_dir)?;
    let model_path: PathBuf = config.model_dir.join(model_file_name(
        &dataset.name,
        &hidden_activation_label(network),
        config.epochs,
        config.batch_size,
    ));
    network.save_json(&model_path)?;
    log::info!("model saved to {}", model_path.display());

    Ok(TrainReport { epochs, test_mae, model_path })
}

/// Deterministic artifact name, e.g.
/// `model_games_ReLU_epochs150_minibatch64.json` or `model_games_ReLU_epochs10_sgd.json`.
pub fn model_file_name(dataset: &str, activation: &str, epochs: usize, batch_size: usize) -> String {
    let mode = if batch_size == 0 {
        "sgd".to_string()
    } else {
        format!("minibatch{batch_size}")
    };
    format!(
        "model_{}_{}_epochs{}_{}.json",
        sanitize(dataset),
        sanitize(activation),
        epochs,
        mode
    )
}

fn hidden_activation_label(network: &Network) -> String {
    network.hidden.first()
        .unwrap_or(&network.output)
        .activation_function()
        .to_string()
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_encodes_run_parameters() {
        assert_eq!(
            model_file_name("10 games", "Gaussian", 150, 64),
            "model_10_games_Gaussian_epochs150_minibatch64.json"
        );
        assert_eq!(model_file_name("g", "ReLU", 3, 0), "model_g_ReLU_epochs3_sgd.json");
    }
}
