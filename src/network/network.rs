use rand::Rng;
use tracing::{debug, trace};

use crate::activation::activation::{activate_layer, sigmoid_prime};
use crate::error::NetworkError;
use crate::math::matrix::{random_weights, MatrixView};
use crate::math::vector::argmax;
use crate::network::metadata::ModelMetadata;
use crate::network::topology::{self, IndexTable};
use crate::optim::sgd::Sgd;

/// Fully-connected sigmoid network trained one sample at a time.
///
/// `dimension` holds the per-layer widths *after* bias augmentation: every
/// layer but the output carries a leading bias unit pinned to `1.0`.
/// `weights[i]` is the row-major matrix for transition `i → i+1`, with one row
/// per real neuron of layer `i+1` and one column per (augmented) slot of
/// layer `i`.
///
/// `results` and `errors` are scratch caches. They describe the most recent
/// `predict` / `back_prop` call only and are overwritten by the next one.
/// Each `predict` arms exactly one `back_prop`; the update consumes it.
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub learning_rate: f64,
    pub momentum: f64,
    pub metadata: Option<ModelMetadata>,
    dimension: Vec<usize>,
    weights: Vec<Vec<f64>>,
    results: Vec<Vec<f64>>,
    errors: Vec<Vec<f64>>,
    indices: Vec<IndexTable>,
    velocity: Vec<Vec<f64>>,
    forward_pending: bool,
}

/// Winning output of [`Network::classify`].
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub index: usize,
    pub activation: f64,
    pub label: Option<String>,
}

impl Network {
    /// Builds a network with randomly initialized weights from `thread_rng`.
    pub fn new(size: &[usize], learning_rate: f64, momentum: f64) -> Result<Network, NetworkError> {
        Network::with_rng(size, learning_rate, momentum, &mut rand::thread_rng())
    }

    /// Builds a network drawing its initial weights from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        size: &[usize],
        learning_rate: f64,
        momentum: f64,
        rng: &mut R,
    ) -> Result<Network, NetworkError> {
        topology::validate_topology(size)?;
        let weights = size
            .windows(2)
            .map(|pair| random_weights(pair[1] * (pair[0] + 1), &mut *rng))
            .collect();
        Network::assemble(topology::augment(size), weights, learning_rate, momentum)
    }

    /// Builds a network around already-trained weights, skipping random init.
    pub fn with_weights(
        size: &[usize],
        learning_rate: f64,
        momentum: f64,
        weights: Vec<Vec<f64>>,
    ) -> Result<Network, NetworkError> {
        topology::validate_topology(size)?;
        Network::assemble(topology::augment(size), weights, learning_rate, momentum)
    }

    fn assemble(
        dimension: Vec<usize>,
        weights: Vec<Vec<f64>>,
        learning_rate: f64,
        momentum: f64,
    ) -> Result<Network, NetworkError> {
        let mut network = Network { learning_rate, momentum, ..Network::default() };
        network.set_parameters(dimension, weights)?;
        Ok(network)
    }

    /// Replaces the augmented dimension list and weights in one step.
    ///
    /// The index tables are rebuilt from `dimension`, and the `results`,
    /// `errors` and momentum caches are cleared. On error the network is left
    /// untouched.
    pub fn set_parameters(
        &mut self,
        dimension: Vec<usize>,
        weights: Vec<Vec<f64>>,
    ) -> Result<(), NetworkError> {
        topology::validate_dimension(&dimension)?;
        topology::validate_weights(&dimension, &weights)?;

        self.indices = topology::index_tables(&dimension);
        self.velocity = weights.iter().map(|w| vec![0.0; w.len()]).collect();
        self.dimension = dimension;
        self.weights = weights;
        self.results.clear();
        self.errors.clear();
        self.forward_pending = false;

        debug!(
            dimension = ?self.dimension,
            weights = self.weight_count(),
            "network parameters installed"
        );
        Ok(())
    }

    /// Augmented per-layer widths.
    pub fn dimension(&self) -> &[usize] {
        &self.dimension
    }

    /// Per-layer neuron counts without bias slots.
    pub fn topology(&self) -> Vec<usize> {
        topology::strip_bias(&self.dimension)
    }

    pub fn weights(&self) -> &[Vec<f64>] {
        &self.weights
    }

    /// Mutable access to each weight matrix; lengths are fixed by the topology.
    pub fn weights_mut(&mut self) -> impl Iterator<Item = &mut [f64]> {
        self.weights.iter_mut().map(|w| w.as_mut_slice())
    }

    /// Forward cache: `results[0]` is the bias-augmented input, `results[k]`
    /// the activations of layer `k`.
    pub fn results(&self) -> &[Vec<f64>] {
        &self.results
    }

    /// Backward cache: `errors[i]` is the error of the layer fed by transition `i`.
    pub fn errors(&self) -> &[Vec<f64>] {
        &self.errors
    }

    /// Number of features `predict` expects (bias excluded).
    pub fn input_width(&self) -> usize {
        self.dimension.first().map_or(0, |d| d.saturating_sub(1))
    }

    pub fn output_width(&self) -> usize {
        self.dimension.last().copied().unwrap_or(0)
    }

    pub fn weight_count(&self) -> usize {
        self.weights.iter().map(Vec::len).sum()
    }

    fn transitions(&self) -> usize {
        self.dimension.len().saturating_sub(1)
    }

    fn ensure_layers(&self) -> Result<(), NetworkError> {
        if self.transitions() == 0 {
            return Err(NetworkError::InvalidTopology("network has no layers".to_string()));
        }
        Ok(())
    }

    /// Runs a forward pass and returns the output layer's activations.
    ///
    /// `inputs` holds the raw features; the bias slot is prepended here.
    pub fn predict(&mut self, inputs: &[f64]) -> Result<Vec<f64>, NetworkError> {
        self.ensure_layers()?;
        if inputs.len() + 1 != self.dimension[0] {
            return Err(NetworkError::InvalidInputs {
                expected: self.input_width(),
                actual: inputs.len(),
            });
        }

        let last = self.transitions() - 1;
        let mut results = Vec::with_capacity(self.dimension.len());
        let mut augmented = Vec::with_capacity(self.dimension[0]);
        augmented.push(1.0);
        augmented.extend_from_slice(inputs);
        results.push(augmented);

        for i in 0..=last {
            let (rows, cols) = topology::transition_shape(&self.dimension, i);
            let sums = MatrixView::new(rows, cols, &self.weights[i]).mul_vec(&results[i]);
            results.push(activate_layer(&sums, i != last));
        }

        self.results = results;
        self.forward_pending = true;
        let output = self.results[last + 1].clone();
        trace!(?output, "forward pass");
        Ok(output)
    }

    /// Propagates the error against `answers` backwards and updates every
    /// weight in place. Must follow a `predict` call for the same sample.
    ///
    /// The cached activations describe the weights *before* this update, so a
    /// second call without a new `predict` fails with `MissingForwardPass`.
    /// `results()` stays readable after the update.
    pub fn back_prop(&mut self, answers: &[f64]) -> Result<(), NetworkError> {
        self.ensure_layers()?;
        if answers.len() != self.output_width() {
            return Err(NetworkError::InvalidAnswer {
                expected: self.output_width(),
                actual: answers.len(),
            });
        }
        if !self.forward_pending || self.results.len() != self.dimension.len() {
            return Err(NetworkError::MissingForwardPass);
        }

        let transitions = self.transitions();
        let output = &self.results[transitions];
        let output_error: Vec<f64> = answers
            .iter()
            .zip(output.iter())
            .map(|(&answer, &y)| (answer - y) * sigmoid_prime(y))
            .collect();

        // Built newest-first, then flipped so errors[0] is the first hidden layer.
        let mut errors = Vec::with_capacity(transitions);
        errors.push(output_error);
        for i in (0..transitions - 1).rev() {
            let next = i + 1;
            let (rows, cols) = topology::transition_shape(&self.dimension, next);
            let next_error = &errors[errors.len() - 1];
            let offset = usize::from(next != transitions - 1);
            let propagated =
                MatrixView::new(rows, cols, &self.weights[next]).transpose_mul_vec(&next_error[offset..]);
            let layer_error = propagated
                .iter()
                .zip(self.results[next].iter())
                .map(|(&err, &y)| sigmoid_prime(y) * err)
                .collect();
            errors.push(layer_error);
        }
        errors.reverse();
        self.errors = errors;

        let sgd = Sgd::new(self.learning_rate, self.momentum);
        for i in (0..transitions).rev() {
            let velocity = if sgd.uses_momentum() {
                Some(self.velocity[i].as_mut_slice())
            } else {
                None
            };
            sgd.step(
                &mut self.weights[i],
                velocity,
                &self.errors[i],
                &self.results[i],
                &self.indices[i],
                i != transitions - 1,
            );
        }

        self.forward_pending = false;
        trace!(learning_rate = self.learning_rate, "backward pass");
        Ok(())
    }

    /// Runs `predict` then `back_prop`, returning the output seen before the
    /// update.
    pub fn train_sample(&mut self, inputs: &[f64], answers: &[f64]) -> Result<Vec<f64>, NetworkError> {
        if answers.len() != self.output_width() {
            return Err(NetworkError::InvalidAnswer {
                expected: self.output_width(),
                actual: answers.len(),
            });
        }
        let output = self.predict(inputs)?;
        self.back_prop(answers)?;
        Ok(output)
    }

    /// Predicts and picks the strongest output, labelled from metadata when
    /// available.
    pub fn classify(&mut self, inputs: &[f64]) -> Result<Classification, NetworkError> {
        let output = self.predict(inputs)?;
        let index = argmax(&output);
        let label = self.metadata.as_ref().and_then(|m| m.label_for(index)).map(str::to_owned);
        Ok(Classification { index, activation: output[index], label })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::sigmoid;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(size: &[usize]) -> Network {
        Network::with_rng(size, 0.5, 0.0, &mut StdRng::seed_from_u64(42)).unwrap()
    }

    #[test]
    fn construction_augments_all_but_output() {
        let net = seeded(&[2, 3, 1]);
        assert_eq!(net.dimension(), &[3, 4, 1]);
        assert_eq!(net.topology(), vec![2, 3, 1]);
        assert_eq!(net.weights()[0].len(), 3 * 3);
        assert_eq!(net.weights()[1].len(), 1 * 4);
        assert_eq!(net.input_width(), 2);
        assert_eq!(net.output_width(), 1);
    }

    #[test]
    fn single_transition_uses_augmented_input() {
        let mut net = Network::with_weights(&[1, 1], 0.1, 0.0, vec![vec![1.0, 1.0]]).unwrap();
        let out = net.predict(&[0.0]).unwrap();
        assert_eq!(net.results()[0], vec![1.0, 0.0]);
        assert_eq!(out, vec![sigmoid(1.0 * 1.0 + 1.0 * 0.0)]);
    }

    #[test]
    fn hidden_results_carry_bias_slot() {
        let mut net = seeded(&[2, 3, 2]);
        net.predict(&[0.3, 0.7]).unwrap();
        let results = net.results();
        assert_eq!(results.len(), 3);
        assert_eq!(results[1].len(), 4);
        assert_eq!(results[1][0], 1.0);
        assert_eq!(results[2].len(), 2);
    }

    #[test]
    fn predict_rejects_wrong_input_length() {
        let mut net = seeded(&[2, 3, 1]);
        let err = net.predict(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(err.is_shape_mismatch());
        assert!(matches!(err, NetworkError::InvalidInputs { expected: 2, actual: 3 }));
    }

    #[test]
    fn back_prop_rejects_wrong_answer_length() {
        let mut net = seeded(&[2, 3, 1]);
        net.predict(&[1.0, 0.0]).unwrap();
        let err = net.back_prop(&[1.0, 0.0]).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidAnswer { expected: 1, actual: 2 }));
    }

    #[test]
    fn back_prop_requires_forward_pass() {
        let mut net = seeded(&[2, 1]);
        assert!(matches!(net.back_prop(&[1.0]), Err(NetworkError::MissingForwardPass)));
    }

    #[test]
    fn back_prop_consumes_its_forward_pass() {
        let mut net = seeded(&[2, 3, 1]);
        net.predict(&[1.0, 0.0]).unwrap();
        net.back_prop(&[1.0]).unwrap();
        let after_first = net.weights().to_vec();

        assert!(matches!(net.back_prop(&[1.0]), Err(NetworkError::MissingForwardPass)));
        assert_eq!(net.weights(), after_first.as_slice());
        assert_eq!(net.results().len(), 3);

        net.predict(&[1.0, 0.0]).unwrap();
        assert!(net.back_prop(&[1.0]).is_ok());
    }

    /// Half the summed squared error of `net` on one sample.
    fn half_sse(net: &mut Network, input: &[f64], target: &[f64]) -> f64 {
        let out = net.predict(input).unwrap();
        0.5 * out.iter().zip(target.iter()).map(|(y, t)| (t - y).powi(2)).sum::<f64>()
    }

    /// With a unit learning rate one update must equal the negative gradient
    /// of half the squared error, checked by central differences.
    fn assert_update_matches_numeric_gradient(size: &[usize], seed: u64) {
        let mut base = Network::with_rng(size, 1.0, 0.0, &mut StdRng::seed_from_u64(seed)).unwrap();
        // Spread the weights out so hidden derivatives are not all near 0.25.
        for w in base.weights_mut() {
            for x in w.iter_mut() {
                *x *= 4.0;
            }
        }
        let input: Vec<f64> = (0..size[0]).map(|k| 0.3 + 0.2 * k as f64).collect();
        let target: Vec<f64> = (0..*size.last().unwrap()).map(|k| (k % 2) as f64).collect();

        let mut trained = base.clone();
        trained.predict(&input).unwrap();
        trained.back_prop(&target).unwrap();

        let h = 1e-6;
        let mut worst: f64 = 0.0;
        for i in 0..base.weights().len() {
            for p in 0..base.weights()[i].len() {
                let mut plus = base.clone();
                plus.weights_mut().nth(i).unwrap()[p] += h;
                let mut minus = base.clone();
                minus.weights_mut().nth(i).unwrap()[p] -= h;
                let numeric = (half_sse(&mut plus, &input, &target)
                    - half_sse(&mut minus, &input, &target))
                    / (2.0 * h);
                let update = trained.weights()[i][p] - base.weights()[i][p];
                worst = worst.max((update + numeric).abs());
            }
        }
        assert!(worst < 1e-7, "update differs from -gradient by {worst} on {size:?}");
    }

    #[test]
    fn update_follows_gradient_with_one_hidden_layer() {
        assert_update_matches_numeric_gradient(&[2, 3, 1], 5);
    }

    #[test]
    fn update_follows_gradient_through_stacked_hidden_layers() {
        assert_update_matches_numeric_gradient(&[2, 3, 4, 2], 6);
        assert_update_matches_numeric_gradient(&[3, 4, 3, 5, 2], 7);
    }

    #[test]
    fn mismatched_weights_fail_at_construction() {
        let err = Network::with_weights(&[2, 1], 0.1, 0.0, vec![vec![0.0; 2]]).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidWeights(_)));
    }

    #[test]
    fn default_network_is_empty_and_refuses_work() {
        let mut net = Network::default();
        assert!(net.dimension().is_empty());
        assert_eq!(net.weight_count(), 0);
        assert!(matches!(net.predict(&[]), Err(NetworkError::InvalidTopology(_))));
    }

    #[test]
    fn default_network_accepts_parameters_later() {
        let mut net = Network::default();
        net.learning_rate = 0.2;
        net.set_parameters(vec![2, 1], vec![vec![0.0, 0.0]]).unwrap();
        assert_eq!(net.predict(&[3.0]).unwrap(), vec![0.5]);
        net.back_prop(&[1.0]).unwrap();
        assert_ne!(net.weights()[0], vec![0.0, 0.0]);
    }

    #[test]
    fn output_layer_update_matches_hand_computation() {
        let mut net = Network::with_weights(&[1, 1], 1.0, 0.0, vec![vec![0.0, 0.0]]).unwrap();
        net.predict(&[2.0]).unwrap();
        net.back_prop(&[1.0]).unwrap();
        // y = 0.5, error = (1 - 0.5) * 0.25 = 0.125
        assert_eq!(net.errors(), &[vec![0.125]]);
        assert_eq!(net.weights()[0], vec![0.125, 0.25]);
    }

    #[test]
    fn hidden_error_has_zero_bias_slot() {
        let mut net = seeded(&[2, 3, 1]);
        net.predict(&[1.0, 0.0]).unwrap();
        net.back_prop(&[1.0]).unwrap();
        let errors = net.errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].len(), 4);
        // sigmoid_prime(1.0) == 0, so the bias unit never receives error.
        assert_eq!(errors[0][0], 0.0);
        assert_eq!(errors[1].len(), 1);
    }

    #[test]
    fn back_prop_reduces_error_on_single_sample() {
        let mut net = seeded(&[3, 4, 2]);
        let input = [0.2, 0.9, 0.4];
        let target = [1.0, 0.0];
        let sse = |out: &[f64]| -> f64 { out.iter().zip(target.iter()).map(|(o, t)| (t - o).powi(2)).sum() };

        let before = sse(&net.predict(&input).unwrap());
        for _ in 0..50 {
            net.predict(&input).unwrap();
            net.back_prop(&target).unwrap();
        }
        let after = sse(&net.predict(&input).unwrap());
        assert!(after < before, "error went from {before} to {after}");
    }

    #[test]
    fn momentum_changes_trajectory() {
        let mut plain = seeded(&[2, 2, 1]);
        let mut heavy = seeded(&[2, 2, 1]);
        heavy.momentum = 0.9;
        for _ in 0..3 {
            plain.train_sample(&[1.0, 0.0], &[1.0]).unwrap();
            heavy.train_sample(&[1.0, 0.0], &[1.0]).unwrap();
        }
        assert_ne!(plain.weights(), heavy.weights());
    }

    #[test]
    fn classify_uses_metadata_labels() {
        let mut net = Network::with_weights(&[1, 2], 0.1, 0.0, vec![vec![-1.0, 0.0, 1.0, 0.0]]).unwrap();
        net.metadata = Some(ModelMetadata {
            description: None,
            output_labels: Some(vec!["low".into(), "high".into()]),
        });
        let class = net.classify(&[0.0]).unwrap();
        assert_eq!(class.index, 1);
        assert_eq!(class.label.as_deref(), Some("high"));
    }

    proptest! {
        #[test]
        fn zero_input_yields_open_unit_interval(
            size in proptest::collection::vec(1usize..6, 2..5),
            seed in any::<u64>(),
        ) {
            let mut net = Network::with_rng(&size, 0.1, 0.0, &mut StdRng::seed_from_u64(seed)).unwrap();
            let out = net.predict(&vec![0.0; size[0]]).unwrap();
            prop_assert_eq!(out.len(), *size.last().unwrap());
            prop_assert!(out.iter().all(|&y| y > 0.0 && y < 1.0));
        }

        #[test]
        fn predict_is_deterministic(
            inputs in proptest::collection::vec(-3.0f64..3.0, 4),
            seed in any::<u64>(),
        ) {
            let mut net = Network::with_rng(&[4, 5, 3], 0.1, 0.0, &mut StdRng::seed_from_u64(seed)).unwrap();
            let a = net.predict(&inputs).unwrap();
            let b = net.predict(&inputs).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn weight_count_follows_dimension(size in proptest::collection::vec(1usize..8, 2..6)) {
            let net = Network::with_rng(&size, 0.1, 0.0, &mut StdRng::seed_from_u64(1)).unwrap();
            let dimension = net.dimension();
            prop_assert_eq!(dimension.len(), net.weights().len() + 1);
            for (i, w) in net.weights().iter().enumerate() {
                prop_assert_eq!(w.len(), size[i + 1] * dimension[i]);
            }
            let last = net.weights().len() - 1;
            prop_assert_eq!(net.weights()[last].len(), dimension[last + 1] * dimension[last]);
        }
    }
}
