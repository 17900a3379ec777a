//! Min-max scaling with bounds frozen at fit time.

use crate::error::RaincastError;
use log::{info, warn};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Rescales each column to `[0, 1]` via `(x - min) / (max - min)`, with the
/// bounds observed once on the training batch.
///
/// Transform reuses the stored bounds: inference values outside the
/// originally observed range land outside `[0, 1]`, which is accepted
/// behavior rather than an error. A constant column scales to 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    columns: Vec<String>,
    bounds: Option<Vec<(String, f64, f64)>>,
}

impl MinMaxScaler {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            bounds: None,
        }
    }

    /// Observes and stores per-column min/max, then rescales the batch.
    pub fn fit_transform(&mut self, df: DataFrame) -> Result<DataFrame, RaincastError> {
        let mut bounds = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let ca = df.column(column)?.f64()?;
            match (ca.min(), ca.max()) {
                (Some(min), Some(max)) => bounds.push((column.clone(), min, max)),
                _ => warn!("column {column} is entirely null, scaling skipped for it"),
            }
        }
        info!("fitted min-max bounds for {} columns", bounds.len());
        self.bounds = Some(bounds);
        self.transform(df)
    }

    /// Rescales with previously stored bounds, without recomputation.
    pub fn transform(&self, df: DataFrame) -> Result<DataFrame, RaincastError> {
        let bounds = self
            .bounds
            .as_ref()
            .ok_or(RaincastError::UninitializedState {
                component: "MinMaxScaler",
            })?;
        let exprs: Vec<Expr> = bounds
            .iter()
            .map(|(column, min, max)| {
                let range = max - min;
                let divisor = if range == 0.0 { 1.0 } else { range };
                ((col(column.as_str()) - lit(*min)) / lit(divisor)).alias(column.as_str())
            })
            .collect();
        Ok(df.lazy().with_columns(exprs).collect()?)
    }

    /// The stored `(min, max)` for one column, if fitted.
    pub fn bounds_for(&self, column: &str) -> Option<(f64, f64)> {
        self.bounds
            .as_ref()?
            .iter()
            .find(|(name, _, _)| name == column)
            .map(|(_, min, max)| (*min, *max))
    }
}
