//! Gaussian Process surrogate shared by the termination estimators.
//!
//! A small GP regressor with a **Matérn 5/2 kernel** and ARD lengthscales,
//! fitted via Cholesky decomposition. Targets are standardized internally;
//! predictions are returned in the original objective units so that
//! improvement and error estimates are directly comparable.

use nalgebra::{DMatrix, DVector};

/// Default observation noise variance added to the kernel diagonal.
pub(crate) const DEFAULT_NOISE_VAR: f64 = 1e-6;

/// Precomputed √5 constant.
const SQRT_5: f64 = 2.236_067_977_499_79;

/// A fitted GP model ready for predictions.
pub(crate) struct GpModel {
    /// Cholesky factor L of K + σ²I.
    cholesky: nalgebra::linalg::Cholesky<f64, nalgebra::Dyn>,
    /// α = (K + σ²I)^{-1} y (standardized targets).
    alpha: DVector<f64>,
    /// Training inputs, each row one data point.
    x_train: Vec<Vec<f64>>,
    /// ARD lengthscales per dimension.
    lengthscales: Vec<f64>,
    /// Signal variance (1.0, targets are standardized).
    signal_var: f64,
    /// Mean of the original targets, for un-standardization.
    y_mean: f64,
    /// Std dev of the original targets, for un-standardization.
    y_std: f64,
}

/// Matérn 5/2 kernel with ARD lengthscales.
///
/// `k(x1, x2) = σ² (1 + √5 r + 5/3 r²) exp(-√5 r)`
/// where `r = sqrt(Σ ((x1_i - x2_i) / l_i)²)`
fn matern52(x1: &[f64], x2: &[f64], lengthscales: &[f64], signal_var: f64) -> f64 {
    let mut r_sq = 0.0;
    for i in 0..x1.len() {
        let diff = (x1[i] - x2[i]) / lengthscales[i];
        r_sq += diff * diff;
    }
    let r = r_sq.sqrt();
    let sqrt5_r = SQRT_5 * r;
    signal_var * (1.0 + sqrt5_r + 5.0 / 3.0 * r_sq) * (-sqrt5_r).exp()
}

/// Build the kernel matrix `K + σ²I`.
fn kernel_matrix(
    x: &[Vec<f64>],
    lengthscales: &[f64],
    signal_var: f64,
    noise_var: f64,
) -> DMatrix<f64> {
    let n = x.len();
    DMatrix::from_fn(n, n, |i, j| {
        let k = matern52(&x[i], &x[j], lengthscales, signal_var);
        if i == j { k + noise_var } else { k }
    })
}

/// Compute the kernel vector k(x*, X) for a test point.
fn kernel_vector(
    x_star: &[f64],
    x_train: &[Vec<f64>],
    lengthscales: &[f64],
    signal_var: f64,
) -> DVector<f64> {
    DVector::from_fn(x_train.len(), |i, _| {
        matern52(x_star, &x_train[i], lengthscales, signal_var)
    })
}

/// Fit a GP model to the training data.
///
/// Returns `None` if there is no data or the Cholesky decomposition fails.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn fit(x_train: &[Vec<f64>], y_train: &[f64], noise_var: f64) -> Option<GpModel> {
    let n = y_train.len();
    if n == 0 {
        return None;
    }

    // Standardize y
    let y_mean = y_train.iter().sum::<f64>() / n as f64;
    let y_var = if n > 1 {
        y_train.iter().map(|&y| (y - y_mean).powi(2)).sum::<f64>() / (n - 1) as f64
    } else {
        1.0
    };
    let y_std = y_var.sqrt().max(1e-10);
    let y_standardized: Vec<f64> = y_train.iter().map(|&y| (y - y_mean) / y_std).collect();

    // ARD lengthscales: per-dimension std dev of training X, clamped
    let d = x_train.first().map_or(0, Vec::len);
    let lengthscales: Vec<f64> = (0..d)
        .map(|j| {
            let mean_j = x_train.iter().map(|x| x[j]).sum::<f64>() / n as f64;
            let var_j = x_train.iter().map(|x| (x[j] - mean_j).powi(2)).sum::<f64>() / n as f64;
            var_j.sqrt().max(0.01)
        })
        .collect();

    // Signal variance = 1.0 (data is standardized)
    let signal_var = 1.0;

    let k = kernel_matrix(x_train, &lengthscales, signal_var, noise_var);
    let cholesky = nalgebra::linalg::Cholesky::new(k)?;

    // α = (K + σ²I)^{-1} y
    let y_vec = DVector::from_column_slice(&y_standardized);
    let alpha = cholesky.solve(&y_vec);

    Some(GpModel {
        cholesky,
        alpha,
        x_train: x_train.to_vec(),
        lengthscales,
        signal_var,
        y_mean,
        y_std,
    })
}

impl GpModel {
    /// Predict mean and standard deviation at a test point, in the
    /// original (un-standardized) target units.
    pub(crate) fn predict(&self, x: &[f64]) -> (f64, f64) {
        let k_star = kernel_vector(x, &self.x_train, &self.lengthscales, self.signal_var);

        // Mean: k*^T α
        let mean = k_star.dot(&self.alpha);

        // Variance: k(x*, x*) - k*^T (K + σ²I)^{-1} k*
        let k_self = self.signal_var;
        let v = self.cholesky.solve(&k_star);
        let var = (k_self - k_star.dot(&v)).max(0.0);

        (
            mean * self.y_std + self.y_mean,
            var.sqrt() * self.y_std,
        )
    }
}
