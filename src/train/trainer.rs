use crate::{
    error::TrainError,
    loss::mse::MseLoss,
    network::network::Network,
};

/// Runs one online epoch over `inputs` in order and returns the mean
/// per-sample MSE observed before each update.
pub fn train_network(
    network: &mut Network,
    inputs: &[Vec<f64>],
    expected_outputs: &[Vec<f64>],
) -> Result<f64, TrainError> {
    let order: Vec<usize> = (0..inputs.len()).collect();
    train_in_order(network, inputs, expected_outputs, &order)
}

pub(crate) fn train_in_order(
    network: &mut Network,
    inputs: &[Vec<f64>],
    expected_outputs: &[Vec<f64>],
    order: &[usize],
) -> Result<f64, TrainError> {
    check_dataset(inputs, expected_outputs)?;
    let mut total_loss = 0.0;

    for &idx in order {
        let expected = &expected_outputs[idx];
        let output = network.train_sample(&inputs[idx], expected)?;
        total_loss += MseLoss::loss(&output, expected);
    }

    Ok(total_loss / order.len().max(1) as f64)
}

/// Total squared error of the network over a dataset, without training.
pub fn total_squared_error(
    network: &mut Network,
    inputs: &[Vec<f64>],
    expected_outputs: &[Vec<f64>],
) -> Result<f64, TrainError> {
    check_dataset(inputs, expected_outputs)?;
    let mut total = 0.0;
    for (input, expected) in inputs.iter().zip(expected_outputs.iter()) {
        let output = network.predict(input)?;
        total += MseLoss::sum_squared(&output, expected);
    }
    Ok(total)
}

pub(crate) fn check_dataset(inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<(), TrainError> {
    if inputs.is_empty() {
        return Err(TrainError::EmptyDataset);
    }
    if inputs.len() != targets.len() {
        return Err(TrainError::LengthMismatch { inputs: inputs.len(), targets: targets.len() });
    }
    Ok(())
}
