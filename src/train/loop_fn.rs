use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::error::TrainError;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::{check_dataset, total_squared_error, train_in_order};

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` online epochs and returns the stats
/// of the **last completed epoch** (`None` when no epoch ran).
///
/// # Arguments
/// - `network`      — mutable reference to the network; modified in place
/// - `train_inputs` — training samples, each of length `network.input_width()`
/// - `train_labels` — corresponding targets, same length as `train_inputs`
/// - `config`       — epochs, shuffling, optional progress channel, optional stop flag
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
pub fn train_loop(
    network: &mut Network,
    train_inputs: &[Vec<f64>],
    train_labels: &[Vec<f64>],
    config: &TrainConfig,
) -> Result<Option<EpochStats>, TrainError> {
    check_dataset(train_inputs, train_labels)?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut order: Vec<usize> = (0..train_inputs.len()).collect();
    let mut last = None;

    for epoch in 1..=config.epochs {
        // Check stop flag at the top of each epoch.
        if stop_requested(config.stop_flag.as_deref()) {
            warn!(epoch, "stop flag set, ending training");
            break;
        }

        let t_start = Instant::now();

        if config.shuffle {
            order.shuffle(&mut rng);
        }
        let train_loss = train_in_order(network, train_inputs, train_labels, &order)?;
        let sum_squared_error = total_squared_error(network, train_inputs, train_labels)?;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            sum_squared_error,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        if config.log_every > 0 && (epoch % config.log_every == 0 || epoch == config.epochs) {
            info!(epoch, train_loss, sum_squared_error, "epoch complete");
        }

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats.clone()).is_err() {
                warn!(epoch, "progress receiver dropped, ending training");
                last = Some(stats);
                break;
            }
        }
        last = Some(stats);
    }

    Ok(last)
}

fn stop_requested(flag: Option<&AtomicBool>) -> bool {
    flag.map_or(false, |f| f.load(Ordering::Relaxed))
}
