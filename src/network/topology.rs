use crate::error::NetworkError;

/// Checks a raw (un-augmented) topology: at least two layers, no empty layer.
pub fn validate_topology(size: &[usize]) -> Result<(), NetworkError> {
    if size.len() < 2 {
        return Err(NetworkError::InvalidTopology(format!(
            "need at least an input and an output layer, got {} layer(s)",
            size.len()
        )));
    }
    if let Some(layer) = size.iter().position(|&n| n == 0) {
        return Err(NetworkError::InvalidTopology(format!("layer {layer} has no neurons")));
    }
    Ok(())
}

/// Adds the bias slot to every layer except the output layer.
pub fn augment(size: &[usize]) -> Vec<usize> {
    let last = size.len().saturating_sub(1);
    size.iter()
        .enumerate()
        .map(|(i, &n)| if i < last { n + 1 } else { n })
        .collect()
}

/// Inverse of [`augment`]: strips the bias slot back off.
pub fn strip_bias(dimension: &[usize]) -> Vec<usize> {
    let last = dimension.len().saturating_sub(1);
    dimension
        .iter()
        .enumerate()
        .map(|(i, &n)| if i < last { n.saturating_sub(1) } else { n })
        .collect()
}

/// `(rows, cols)` of the weight matrix for transition `i → i+1`.
///
/// Rows are the real neurons of layer `i+1` (a bias unit has no incoming
/// weights); columns are the bias-augmented width of layer `i`.
pub fn transition_shape(dimension: &[usize], i: usize) -> (usize, usize) {
    let next_is_output = i + 2 == dimension.len();
    let rows = if next_is_output { dimension[i + 1] } else { dimension[i + 1] - 1 };
    (rows, dimension[i])
}

/// Checks that an augmented dimension list could have come out of [`augment`].
pub fn validate_dimension(dimension: &[usize]) -> Result<(), NetworkError> {
    let last = dimension.len().saturating_sub(1);
    if dimension.iter().take(last).any(|&d| d < 2) {
        return Err(NetworkError::InvalidTopology(
            "every non-output layer needs a bias slot plus at least one neuron".to_string(),
        ));
    }
    validate_topology(&strip_bias(dimension))
}

/// Checks externally supplied weights against an augmented dimension list.
pub fn validate_weights(dimension: &[usize], weights: &[Vec<f64>]) -> Result<(), NetworkError> {
    let transitions = dimension.len().saturating_sub(1);
    if weights.len() != transitions {
        return Err(NetworkError::InvalidWeights(format!(
            "expected {transitions} weight matrices, got {}",
            weights.len()
        )));
    }
    for (i, w) in weights.iter().enumerate() {
        let (rows, cols) = transition_shape(dimension, i);
        if w.len() != rows * cols {
            return Err(NetworkError::InvalidWeights(format!(
                "transition {i} needs {rows}x{cols} = {} weights, got {}",
                rows * cols,
                w.len()
            )));
        }
        if let Some(p) = w.iter().position(|x| !x.is_finite()) {
            return Err(NetworkError::InvalidWeights(format!(
                "transition {i} has a non-finite weight at {p}"
            )));
        }
    }
    Ok(())
}

/// Precomputed flat-index decomposition for one weight matrix.
///
/// `error[p]` is the output-neuron (row) and `result[p]` the input-neuron
/// (column) of flat weight position `p`. Built once per topology.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexTable {
    pub error: Vec<usize>,
    pub result: Vec<usize>,
}

impl IndexTable {
    pub fn build(weight_count: usize, cols: usize) -> IndexTable {
        let (error, result) = (0..weight_count).map(|p| (p / cols, p % cols)).unzip();
        IndexTable { error, result }
    }

    pub fn len(&self) -> usize {
        self.error.len()
    }

    pub fn is_empty(&self) -> bool {
        self.error.is_empty()
    }
}

/// One [`IndexTable`] per transition, derived purely from `dimension`.
pub fn index_tables(dimension: &[usize]) -> Vec<IndexTable> {
    (0..dimension.len().saturating_sub(1))
        .map(|i| {
            let (rows, cols) = transition_shape(dimension, i);
            IndexTable::build(rows * cols, cols)
        })
        .collect()
}
