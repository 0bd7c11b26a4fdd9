use std::ops::Range;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data::dataset::Dataset;
use crate::error::{NnError, Result};
use crate::loss::mae::mean_absolute_error;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` on `train` for `config.epochs` epochs and returns the
/// statistics of every epoch.
///
/// With `batch_size == 0` each epoch is one `train_step` over the whole
/// partition. Otherwise the examples are reshuffled every epoch and split
/// into `batch_size` contiguous groups, one step per group.
///
/// # Errors
/// Fails before the first step if the partition is empty, if there are
/// more groups than examples, or if the feature count does not match the
/// network input.
pub fn train_loop(network: &mut Network, train: &Dataset, config: &TrainConfig) -> Result<Vec<EpochStats>> {
    config.validate()?;
    if train.is_empty() {
        return Err(NnError::EmptyPartition("train"));
    }
    if train.feature_count() != network.input_size() {
        return Err(NnError::shape(
            "training features",
            format!("{} features", network.input_size()),
            train.feature_count(),
        ));
    }
    let batches = if config.is_mini_batch() {
        Some(partition_batches(train.len(), config.batch_size)?)
    } else {
        None
    };

    let mut rng = StdRng::seed_from_u64(config.shuffle_seed);
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        // ── One full pass over the training data ───────────────────────────
        let (cost, mae, steps) = match &batches {
            None => {
                let (predictions, cost) = network.train_step(&train.features, &train.label_row())?;
                (cost, mean_absolute_error(&predictions, &train.labels), 1)
            }
            Some(groups) => run_mini_batch_epoch(network, train, groups, &mut rng)?,
        };

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            cost,
            mae,
            steps,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        log::info!(
            "epoch [{}/{}] cost: {:.6} mae: {:.6}",
            stats.epoch,
            stats.total_epochs,
            stats.cost,
            stats.mae
        );
        history.push(stats);
    }

    Ok(history)
}

/// Splits `n` examples into `groups` contiguous ranges. The first
/// `n % groups` ranges hold one extra example, so every index appears in
/// exactly one range.
pub fn partition_batches(n: usize, groups: usize) -> Result<Vec<Range<usize>>> {
    if n == 0 {
        return Err(NnError::EmptyPartition("train"));
    }
    if groups == 0 {
        return Err(NnError::InvalidConfig("mini-batch count must be at least 1".into()));
    }
    if groups > n {
        return Err(NnError::BatchTooLarge { batches: groups, examples: n });
    }

    let base = n / groups;
    let extra = n % groups;
    let mut start = 0;
    Ok((0..groups)
        .map(|g| {
            let len = base + usize::from(g < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Shuffles, then takes one step per group. Returns the mean cost, the
/// mean MAE and the number of steps.
fn run_mini_batch_epoch(
    network: &mut Network,
    train: &Dataset,
    groups: &[Range<usize>],
    rng: &mut StdRng,
) -> Result<(f64, f64, usize)> {
    let mut total_cost = 0.0;
    let mut total_mae = 0.0;

    for (i, batch) in epoch_batches(train, groups, rng)?.iter().enumerate() {
        let (predictions, cost) = network.train_step(&batch.features, &batch.label_row())?;
        let mae = mean_absolute_error(&predictions, &batch.labels);
        log::debug!("batch [{}/{}] cost: {:.6} mae: {:.6}", i + 1, groups.len(), cost, mae);
        total_cost += cost;
        total_mae += mae;
    }

    let count = groups.len() as f64;
    Ok((total_cost / count, total_mae / count, groups.len()))
}

/// Reshuffles the examples and cuts them into one sub-dataset per group.
fn epoch_batches(train: &Dataset, groups: &[Range<usize>], rng: &mut StdRng) -> Result<Vec<Dataset>> {
    let mut indices: Vec<usize> = (0..train.len()).collect();
    indices.shuffle(rng);
    groups.iter()
        .map(|group| train.select(&indices[group.clone()]))
        .collect()
}
