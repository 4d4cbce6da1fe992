/// Encodes a class index as a vector of zeros with a single `1.0`.
///
/// Returns `None` when `index` is outside `0..width`.
pub fn one_hot(index: usize, width: usize) -> Option<Vec<f64>> {
    if index >= width {
        return None;
    }
    let mut v = vec![0.0; width];
    v[index] = 1.0;
    Some(v)
}

/// Index of the maximum element in a slice. Ties resolve to the first index,
/// NaN compares as equal, and an empty slice yields `0`.
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &x)| match best {
            Some((_, b)) if x <= b || x.is_nan() => best,
            _ => Some((i, x)),
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}
