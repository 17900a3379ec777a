//! Neighbor-based imputer (unit B of the global imputer state).
//!
//! Cloud cover, evaporation and sunshine correlate with each other far more
//! than with any per-location batch statistic, so their residual gaps are
//! filled from the most similar training rows instead of a column aggregate.

use crate::error::RaincastError;
use log::{info, warn};
use ordered_float::OrderedFloat;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Fixed-count nearest-neighbor imputer with NaN-aware Euclidean distance.
///
/// Fit stores the training sample matrix (missing entries encoded as NaN)
/// together with per-column fallback means. Transform fills each missing
/// entry with the mean of that column over the `neighbors` nearest stored
/// rows that observed it; neighbor ties break on sample index so the result
/// is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnImputer {
    columns: Vec<String>,
    neighbors: usize,
    samples: Option<Vec<Vec<f64>>>,
    fallback_means: Option<Vec<f64>>,
}

impl KnnImputer {
    pub fn new<I, S>(columns: I, neighbors: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            neighbors,
            samples: None,
            fallback_means: None,
        }
    }

    /// Stores the batch as the donor sample set, then fills the batch itself.
    pub fn fit_transform(&mut self, df: DataFrame) -> Result<DataFrame, RaincastError> {
        let samples = self.extract_matrix(&df)?;
        let width = self.columns.len();
        let mut fallback_means = Vec::with_capacity(width);
        for j in 0..width {
            let observed: Vec<f64> = samples
                .iter()
                .map(|row| row[j])
                .filter(|v| !v.is_nan())
                .collect();
            if observed.is_empty() {
                warn!(
                    "column {} has no observed values to fit on",
                    self.columns[j]
                );
                fallback_means.push(f64::NAN);
            } else {
                fallback_means.push(observed.iter().sum::<f64>() / observed.len() as f64);
            }
        }
        info!(
            "fitted neighbor imputer on {} samples over {} columns",
            samples.len(),
            width
        );
        self.samples = Some(samples);
        self.fallback_means = Some(fallback_means);
        self.transform(df)
    }

    /// Fills from the stored donor set, without refitting.
    pub fn transform(&self, mut df: DataFrame) -> Result<DataFrame, RaincastError> {
        let (samples, fallback_means) = match (&self.samples, &self.fallback_means) {
            (Some(s), Some(f)) => (s, f),
            _ => {
                return Err(RaincastError::UninitializedState {
                    component: "KnnImputer",
                })
            }
        };

        let matrix = self.extract_matrix(&df)?;
        let mut filled = matrix.clone();
        for (i, row) in matrix.iter().enumerate() {
            for j in 0..self.columns.len() {
                if row[j].is_nan() {
                    filled[i][j] = self.impute_entry(row, j, samples, fallback_means);
                }
            }
        }

        for (j, column) in self.columns.iter().enumerate() {
            let values: Vec<Option<f64>> = filled
                .iter()
                .map(|row| if row[j].is_nan() { None } else { Some(row[j]) })
                .collect();
            df.with_column(Series::new(column.as_str().into(), values))?;
        }
        Ok(df)
    }

    fn impute_entry(
        &self,
        row: &[f64],
        target: usize,
        samples: &[Vec<f64>],
        fallback_means: &[f64],
    ) -> f64 {
        // Donors must observe the target column and share at least one
        // observed coordinate with the query row.
        let mut candidates: Vec<(OrderedFloat<f64>, usize)> = samples
            .iter()
            .enumerate()
            .filter(|(_, sample)| !sample[target].is_nan())
            .filter_map(|(index, sample)| {
                nan_euclidean(row, sample).map(|d| (OrderedFloat(d), index))
            })
            .collect();
        candidates.sort_unstable();

        let donors: Vec<f64> = candidates
            .iter()
            .take(self.neighbors)
            .map(|(_, index)| samples[*index][target])
            .collect();
        if donors.is_empty() {
            return fallback_means[target];
        }
        donors.iter().sum::<f64>() / donors.len() as f64
    }

    fn extract_matrix(&self, df: &DataFrame) -> Result<Vec<Vec<f64>>, RaincastError> {
        let mut series = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            series.push(df.column(column)?.f64()?.clone());
        }
        let mut matrix = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            matrix.push(
                series
                    .iter()
                    .map(|ca| ca.get(i).unwrap_or(f64::NAN))
                    .collect(),
            );
        }
        Ok(matrix)
    }
}

/// Euclidean distance over the mutually observed coordinates, scaled by
/// `n_total / n_present` to stay comparable across missingness patterns.
/// `None` when the rows share no observed coordinate.
fn nan_euclidean(a: &[f64], b: &[f64]) -> Option<f64> {
    let total = a.len();
    let mut present = 0usize;
    let mut acc = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        if !x.is_nan() && !y.is_nan() {
            present += 1;
            acc += (x - y) * (x - y);
        }
    }
    if present == 0 {
        None
    } else {
        Some((acc * total as f64 / present as f64).sqrt())
    }
}
