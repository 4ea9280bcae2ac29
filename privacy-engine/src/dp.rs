//! Laplace-mechanism histogram of visited grid cells.
//!
//! Each cell count has sensitivity one per trajectory point, so noise drawn
//! from `Laplace(0, sensitivity / epsilon)` makes the published weight
//! epsilon-differentially private. Clamping to zero, the publication threshold
//! and rounding are post-processing and leave the guarantee intact.

use crate::constants::{
    DEFAULT_EPSILON, DEFAULT_SENSITIVITY, GRID_SIZE, MAX_SAMPLING_ATTEMPTS, PUBLICATION_THRESHOLD,
    WEIGHT_DECIMALS,
};
use crate::errors::PrivacyError;
use crate::grid;
use crate::round_to;
use crate::types::{GeoPoint, GridCell, HistogramBucket, HistogramUpload};
use rand::{CryptoRng, Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregationParams {
    pub epsilon: f64,
    pub sensitivity: f64,
    pub grid_size: f64,
}

impl Default for AggregationParams {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            sensitivity: DEFAULT_SENSITIVITY,
            grid_size: GRID_SIZE,
        }
    }
}

impl AggregationParams {
    pub fn with_epsilon(epsilon: f64) -> Self {
        Self { epsilon, ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), PrivacyError> {
        check_budget(self.epsilon, self.sensitivity)?;
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            return Err(PrivacyError::InvalidGridSize(self.grid_size));
        }
        Ok(())
    }

    /// Laplace scale `b = sensitivity / epsilon`.
    pub fn scale(&self) -> f64 {
        self.sensitivity / self.epsilon
    }
}

fn check_budget(epsilon: f64, sensitivity: f64) -> Result<(), PrivacyError> {
    if !(epsilon.is_finite() && epsilon > 0.0) {
        return Err(PrivacyError::InvalidPrivacyBudget(format!(
            "epsilon must be finite and positive, got {epsilon}"
        )));
    }
    if !(sensitivity.is_finite() && sensitivity > 0.0) {
        return Err(PrivacyError::InvalidPrivacyBudget(format!(
            "sensitivity must be finite and positive, got {sensitivity}"
        )));
    }
    Ok(())
}

/// Inverse-CDF sample from `Laplace(0, scale)`.
///
/// `u` is uniform on `[-0.5, 0.5)`; the endpoint `-0.5` maps to `ln(0)` and is
/// drawn again.
pub fn laplace_noise(rng: &mut (impl RngCore + CryptoRng), scale: f64) -> Result<f64, PrivacyError> {
    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        let u: f64 = rng.gen_range(-0.5..0.5);
        if u == -0.5 {
            continue;
        }
        return Ok(-scale * u.signum() * (1.0 - 2.0 * u.abs()).ln());
    }
    Err(PrivacyError::RandomnessExhausted(MAX_SAMPLING_ATTEMPTS))
}

/// `max(0, count + Laplace(sensitivity / epsilon))`.
pub fn add_noise(
    rng: &mut (impl RngCore + CryptoRng),
    count: f64,
    epsilon: f64,
    sensitivity: f64,
) -> Result<f64, PrivacyError> {
    check_budget(epsilon, sensitivity)?;
    let noise = laplace_noise(rng, sensitivity / epsilon)?;
    Ok((count + noise).max(0.0))
}

/// Bucket `trajectory` into grid cells and publish the noised visit counts.
///
/// Buckets come out in first-visit order. Weights at or below the publication
/// threshold are dropped, the rest are rounded to three decimals.
pub fn aggregate(
    rng: &mut (impl RngCore + CryptoRng),
    trajectory: &[GeoPoint],
    params: &AggregationParams,
) -> Result<Vec<HistogramBucket>, PrivacyError> {
    params.validate()?;

    let mut index: HashMap<GridCell, usize> = HashMap::new();
    let mut counts: Vec<(GridCell, u64)> = Vec::new();
    for point in trajectory {
        let cell = grid::point_to_grid(point, params.grid_size)?;
        match index.get(&cell) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(cell, counts.len());
                counts.push((cell, 1));
            }
        }
    }

    let mut buckets = Vec::with_capacity(counts.len());
    for (cell, count) in counts.iter().copied() {
        let weight = add_noise(rng, count as f64, params.epsilon, params.sensitivity)?;
        if weight > PUBLICATION_THRESHOLD {
            buckets.push(HistogramBucket {
                cell,
                weight: round_to(weight, WEIGHT_DECIMALS),
            });
        }
    }

    debug!(
        points = trajectory.len(),
        cells = counts.len(),
        published = buckets.len(),
        epsilon = params.epsilon,
        "aggregated trajectory histogram"
    );
    Ok(buckets)
}

/// Sum published weights per cell across uploads, keeping first-seen order.
pub fn merge_histograms(uploads: &[HistogramUpload]) -> Vec<HistogramBucket> {
    let mut index: HashMap<GridCell, usize> = HashMap::new();
    let mut merged: Vec<HistogramBucket> = Vec::new();
    for bucket in uploads.iter().flat_map(|upload| upload.data.iter()) {
        match index.get(&bucket.cell) {
            Some(&slot) => merged[slot].weight += bucket.weight,
            None => {
                index.insert(bucket.cell, merged.len());
                merged.push(bucket.clone());
            }
        }
    }
    for bucket in &mut merged {
        bucket.weight = round_to(bucket.weight, WEIGHT_DECIMALS);
    }
    merged
}
