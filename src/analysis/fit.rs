//! Least-squares throughput estimation.
//!
//! Fits `count(t) = intercept + slope * (t - start) / 1e9` against the
//! observed cumulative counts `(timestamp_i, i + 1)`, so the slope reads
//! directly in messages per second.

use crate::error::AnalysisError;

use super::NS_PER_SEC;

/// Offset window (ns from the sequence start) restricting the training set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitWindow {
    pub left_ns: i64,
    pub right_ns: i64,
}

impl FitWindow {
    /// Whether `offset` (ns from start) falls inside the window, both
    /// bounds inclusive.
    fn contains(&self, offset: i64) -> bool {
        self.left_ns <= offset && offset <= self.right_ns
    }
}

/// Initial `[intercept, slope]` guess handed to the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSeed {
    pub intercept: f64,
    pub slope: f64,
}

impl Default for FitSeed {
    fn default() -> Self {
        Self {
            intercept: 0.0,
            slope: 1.0,
        }
    }
}

/// A fitted linear rate model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateFit {
    pub intercept: f64,
    /// Messages per second.
    pub slope: f64,
    /// Window the model was trained on, as offsets from the start. Equals
    /// the sequence's own span when no window was requested.
    pub window: FitWindow,
}

impl RateFit {
    /// Model value at an elapsed offset in milliseconds.
    pub fn count_at_ms(&self, elapsed_ms: f64) -> f64 {
        self.intercept + self.slope * elapsed_ms / 1e3
    }

    /// Estimated throughput in queries per second.
    pub fn qps(&self) -> f64 {
        self.slope
    }

    /// Startup delay implied by the intercept, in milliseconds: the time at
    /// which the fitted count line crosses zero.
    pub fn startup_delay_ms(&self) -> f64 {
        -self.intercept / self.slope * 1e3
    }
}

/// Fit a linear rate model over `timestamps` relative to `start`.
///
/// Training points are `(offset_i, i + 1)` for timestamps whose offset from
/// `start` lies inside `window`; without a window every point trains and the
/// reported window is the sequence's own span. An empty sequence, or a
/// window that excludes every point, is an [`AnalysisError::EmptyInput`].
///
/// The result is bit-for-bit reproducible for identical inputs.
pub fn fit(
    timestamps: &[u64],
    start: u64,
    window: Option<FitWindow>,
    seed: Option<FitSeed>,
) -> Result<RateFit, AnalysisError> {
    let (first, last) = match (timestamps.first(), timestamps.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Err(AnalysisError::EmptyInput),
    };

    let window = window.unwrap_or(FitWindow {
        left_ns: first as i64 - start as i64,
        right_ns: last as i64 - start as i64,
    });

    let train: Vec<(f64, f64)> = timestamps
        .iter()
        .enumerate()
        .filter(|&(_, &ts)| window.contains(ts as i64 - start as i64))
        .map(|(i, &ts)| ((ts as f64 - start as f64) / NS_PER_SEC, (i + 1) as f64))
        .collect();

    if train.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let (intercept, slope) = gauss_newton(&train, seed.unwrap_or_default());
    Ok(RateFit {
        intercept,
        slope,
        window,
    })
}

/// Seeded Gauss-Newton least squares on the two-parameter linear model.
///
/// The model is linear in both parameters, so the first step already lands
/// on the optimum; further steps only absorb rounding. A singular normal
/// matrix (all offsets identical) leaves the seed untouched.
fn gauss_newton(train: &[(f64, f64)], seed: FitSeed) -> (f64, f64) {
    const MAX_STEPS: usize = 3;
    const TOLERANCE: f64 = 1e-12;

    let mut intercept = seed.intercept;
    let mut slope = seed.slope;
    let n = train.len() as f64;

    for _ in 0..MAX_STEPS {
        let mut sum_dt = 0.0;
        let mut sum_dt2 = 0.0;
        let mut sum_r = 0.0;
        let mut sum_rdt = 0.0;
        for &(dt, count) in train {
            let residual = intercept + slope * dt - count;
            sum_dt += dt;
            sum_dt2 += dt * dt;
            sum_r += residual;
            sum_rdt += residual * dt;
        }

        // Normal equations J^T J d = -J^T r with Jacobian rows [1, dt].
        let det = n * sum_dt2 - sum_dt * sum_dt;
        if det.abs() <= f64::EPSILON * n * sum_dt2.max(1.0) {
            break;
        }

        let d_intercept = (sum_rdt * sum_dt - sum_r * sum_dt2) / det;
        let d_slope = (sum_r * sum_dt - n * sum_rdt) / det;
        intercept += d_intercept;
        slope += d_slope;

        if d_intercept.abs() < TOLERANCE && d_slope.abs() < TOLERANCE {
            break;
        }
    }

    (intercept, slope)
}
