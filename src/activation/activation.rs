use std::f64::consts::E;

/// Logistic sigmoid.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x))
}

/// Sigmoid derivative expressed in terms of the already-activated value
/// `y = sigmoid(x)`, not the pre-activation sum.
pub fn sigmoid_prime(y: f64) -> f64 {
    y * (1.0 - y)
}

/// Activates the weighted sums of one layer.
///
/// Output layers (`has_bias == false`) get a plain element-wise sigmoid.
/// Every other layer gets a leading bias slot pinned to `1.0`, followed by
/// one sigmoid value per weighted sum, so the result is one element longer
/// than `sums`.
pub fn activate_layer(sums: &[f64], has_bias: bool) -> Vec<f64> {
    if has_bias {
        let mut output = Vec::with_capacity(sums.len() + 1);
        output.push(1.0);
        output.extend(sums.iter().map(|&z| sigmoid(z)));
        output
    } else {
        sums.iter().map(|&z| sigmoid(z)).collect()
    }
}
