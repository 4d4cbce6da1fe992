use crate::network::topology::IndexTable;

/// Online gradient-descent update for one weight matrix.
///
/// With `momentum == 0.0` every weight simply moves by
/// `error · activation · learning_rate`. A non-zero momentum keeps a
/// per-weight velocity `v = momentum · v + delta` and moves the weight by `v`
/// instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
    pub momentum: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64, momentum: f64) -> Sgd {
        Sgd { learning_rate, momentum }
    }

    pub fn uses_momentum(&self) -> bool {
        self.momentum != 0.0
    }

    /// Applies one update in place.
    ///
    /// `errors` is the error vector of the layer the matrix feeds into and
    /// `inputs` the cached activations of the layer it reads from. When
    /// `has_bias` is set, `errors[0]` belongs to the bias unit and every real
    /// neuron's error sits one slot to the right.
    pub fn step(
        &self,
        weights: &mut [f64],
        velocity: Option<&mut [f64]>,
        errors: &[f64],
        inputs: &[f64],
        indices: &IndexTable,
        has_bias: bool,
    ) {
        let offset = usize::from(has_bias);
        let delta = |p: usize| {
            errors[indices.error[p] + offset] * inputs[indices.result[p]] * self.learning_rate
        };

        match velocity {
            Some(velocity) if self.uses_momentum() => {
                for (p, (w, v)) in weights.iter_mut().zip(velocity.iter_mut()).enumerate() {
                    *v = self.momentum * *v + delta(p);
                    *w += *v;
                }
            }
            _ => {
                for (p, w) in weights.iter_mut().enumerate() {
                    *w += delta(p);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_step_moves_by_error_times_activation() {
        let sgd = Sgd::new(0.5, 0.0);
        let indices = IndexTable::build(2, 2);
        let mut weights = vec![0.0, 0.0];
        sgd.step(&mut weights, None, &[0.2], &[1.0, 4.0], &indices, false);
        assert_eq!(weights, vec![0.1, 0.4]);
    }

    #[test]
    fn bias_offset_skips_placeholder_error() {
        let sgd = Sgd::new(1.0, 0.0);
        let indices = IndexTable::build(2, 1);
        let mut weights = vec![0.0, 0.0];
        // errors[0] is the bias placeholder and must never be read.
        sgd.step(&mut weights, None, &[99.0, 0.25, -0.5], &[2.0], &indices, true);
        assert_eq!(weights, vec![0.5, -1.0]);
    }

    #[test]
    fn momentum_accumulates_velocity() {
        let sgd = Sgd::new(1.0, 0.5);
        let indices = IndexTable::build(1, 1);
        let mut weights = vec![0.0];
        let mut velocity = vec![0.0];
        sgd.step(&mut weights, Some(&mut velocity), &[1.0], &[1.0], &indices, false);
        sgd.step(&mut weights, Some(&mut velocity), &[1.0], &[1.0], &indices, false);
        // v1 = 1.0, v2 = 0.5 * 1.0 + 1.0
        assert_eq!(velocity, vec![1.5]);
        assert_eq!(weights, vec![2.5]);
    }

    #[test]
    fn zero_momentum_ignores_velocity_buffer() {
        let sgd = Sgd::new(1.0, 0.0);
        let indices = IndexTable::build(1, 1);
        let mut weights = vec![0.0];
        let mut velocity = vec![7.0];
        sgd.step(&mut weights, Some(&mut velocity), &[1.0], &[1.0], &indices, false);
        assert_eq!(weights, vec![1.0]);
        assert_eq!(velocity, vec![7.0]);
    }
}
