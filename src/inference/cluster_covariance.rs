//! One-way cluster-robust covariance (Liang–Zeger sandwich).
//!
//! `V = c · (X'X)^-1 (Σ_g u_g u_g') (X'X)^-1` with `u_g = Σ_{i∈g} e_i x_i`
//! and the small-sample correction `c = G/(G-1) · (n-1)/(n-k)`.
//!
//! Residuals may be arbitrarily correlated within a cluster; clusters are
//! assumed independent. Only the partition matters, so any bijective
//! relabeling of the cluster ids yields the same covariance.

use super::sandwich;
use crate::solvers::RegressionError;
use faer::{Col, Mat};
use std::collections::BTreeMap;

/// Number of distinct clusters in a label vector.
pub fn count_clusters(groups: &[u64]) -> usize {
    let mut labels: Vec<u64> = groups.to_vec();
    labels.sort_unstable();
    labels.dedup();
    labels.len()
}

/// Cluster-robust covariance of the coefficients.
///
/// # Arguments
/// * `design` - Design matrix (n × k), intercept column included
/// * `residuals` - OLS residuals
/// * `xtx_inverse` - `(X'X)^-1` of the design
/// * `groups` - Cluster label of every observation
pub fn compute_cluster_covariance(
    design: &Mat<f64>,
    residuals: &Col<f64>,
    xtx_inverse: &Mat<f64>,
    groups: &[u64],
) -> Result<Mat<f64>, RegressionError> {
    let n = design.nrows();
    let k = design.ncols();

    if residuals.nrows() != n {
        return Err(RegressionError::DimensionMismatch {
            x_rows: n,
            y_len: residuals.nrows(),
        });
    }
    if groups.len() != n {
        return Err(RegressionError::DimensionMismatch {
            x_rows: n,
            y_len: groups.len(),
        });
    }
    if n <= k {
        return Err(RegressionError::InsufficientObservations {
            needed: k + 1,
            got: n,
        });
    }

    // Per-cluster score sums u_g
    let mut scores: BTreeMap<u64, Vec<f64>> = BTreeMap::new();
    for (i, &g) in groups.iter().enumerate() {
        let u = scores.entry(g).or_insert_with(|| vec![0.0; k]);
        for (c, u_c) in u.iter_mut().enumerate() {
            *u_c += residuals[i] * design[(i, c)];
        }
    }

    let n_clusters = scores.len();
    if n_clusters < 2 {
        return Err(RegressionError::InsufficientObservations {
            needed: 2,
            got: n_clusters,
        });
    }

    let mut meat = Mat::zeros(k, k);
    for u in scores.values() {
        for r in 0..k {
            for c in 0..k {
                meat[(r, c)] += u[r] * u[c];
            }
        }
    }

    let g = n_clusters as f64;
    let correction = g / (g - 1.0) * (n - 1) as f64 / (n - k) as f64;

    let mut vcov = sandwich(xtx_inverse, &meat);
    for r in 0..k {
        for c in 0..k {
            vcov[(r, c)] *= correction;
        }
    }
    Ok(vcov)
}
