//! Global median imputer (unit A of the global imputer state).

use crate::error::RaincastError;
use log::{info, warn};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Fills residual missing values with per-column medians fitted once on the
/// training batch and reused verbatim at inference time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedianImputer {
    columns: Vec<String>,
    medians: Option<Vec<(String, f64)>>,
}

impl MedianImputer {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            medians: None,
        }
    }

    /// Computes and stores the per-column medians, then fills the batch.
    pub fn fit_transform(&mut self, df: DataFrame) -> Result<DataFrame, RaincastError> {
        let mut medians = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            match df.column(column)?.f64()?.median() {
                Some(median) => medians.push((column.clone(), median)),
                None => warn!("column {column} is entirely null, no median stored"),
            }
        }
        info!("fitted median imputer over {} columns", medians.len());
        self.medians = Some(medians);
        self.transform(df)
    }

    /// Fills with previously stored medians, without recomputation.
    pub fn transform(&self, df: DataFrame) -> Result<DataFrame, RaincastError> {
        let medians = self
            .medians
            .as_ref()
            .ok_or(RaincastError::UninitializedState {
                component: "MedianImputer",
            })?;
        let exprs: Vec<Expr> = medians
            .iter()
            .map(|(column, median)| {
                col(column.as_str())
                    .fill_null(lit(*median))
                    .alias(column.as_str())
            })
            .collect();
        Ok(df.lazy().with_columns(exprs).collect()?)
    }
}
