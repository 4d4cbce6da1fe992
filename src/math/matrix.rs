use rand::Rng;

/// Read-only view of a row-major `rows × cols` matrix stored as one flat slice.
///
/// Weight matrices live in the network as plain `Vec<f64>` so they can be
/// serialized and replaced directly; this view supplies the two products the
/// forward and backward passes need without copying.
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a> {
    pub rows: usize,
    pub cols: usize,
    data: &'a [f64],
}

impl<'a> MatrixView<'a> {
    pub fn new(rows: usize, cols: usize, data: &'a [f64]) -> MatrixView<'a> {
        debug_assert_eq!(data.len(), rows * cols, "matrix storage does not match its shape");
        MatrixView { rows, cols, data }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &'a [f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// `M · v` where `v` has `cols` entries; yields `rows` entries.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(v.len(), self.cols);
        (0..self.rows)
            .map(|r| self.row(r).iter().zip(v.iter()).map(|(w, x)| w * x).sum())
            .collect()
    }

    /// `Mᵀ · v` where `v` has `rows` entries; yields `cols` entries.
    ///
    /// Walks the storage column-wise instead of materializing the transpose.
    pub fn transpose_mul_vec(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(v.len(), self.rows);
        let mut res = vec![0.0; self.cols];
        for (r, &scale) in v.iter().enumerate() {
            for (c, out) in res.iter_mut().enumerate() {
                *out += scale * self.get(r, c);
            }
        }
        res
    }
}

/// Draws `count` weights uniformly from roughly `(-r, r)` with `r = 1/sqrt(count)`.
///
/// Values are quantized to steps of `1e-6`: an integer is drawn from
/// `[0, 2_000_000 * r)`, recentred by half that range, then divided by
/// `1_000_000`.
pub fn random_weights<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let range = 1.0 / (count as f64).sqrt();
    let range_int = ((2_000_000.0 * range) as u32).max(1);
    let half = (range_int / 2) as f64;

    (0..count)
        .map(|_| (rng.gen_range(0..range_int) as f64 - half) / 1_000_000.0)
        .collect()
}
