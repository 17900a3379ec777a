//! IQR-based outlier capping with bounds frozen at fit time.
//!
//! The bounds are computed once from the training batch and persisted with
//! the rest of the pipeline state. Recomputing quantiles per batch would make
//! capping a no-op on single-row inference batches while training-time
//! capping stays population-based, so training and serving would silently
//! disagree; stored bounds apply identically on both paths.

use crate::error::RaincastError;
use log::{info, warn};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Clips numeric columns to `[Q1 - k*IQR, Q3 + k*IQR]` with quartiles taken
/// from the fit batch (linear interpolation, matching the usual convention).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IqrCapper {
    columns: Vec<String>,
    multiplier: f64,
    bounds: Option<Vec<(String, f64, f64)>>,
}

impl IqrCapper {
    pub fn new<I, S>(columns: I, multiplier: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            multiplier,
            bounds: None,
        }
    }

    /// Computes and stores the cap bounds from this batch, then clips it.
    pub fn fit_transform(&mut self, df: DataFrame) -> Result<DataFrame, RaincastError> {
        let mut exprs = Vec::with_capacity(self.columns.len() * 2);
        for column in &self.columns {
            exprs.push(
                col(column.as_str())
                    .quantile(lit(0.25), QuantileMethod::Linear)
                    .alias(format!("{column}:q1")),
            );
            exprs.push(
                col(column.as_str())
                    .quantile(lit(0.75), QuantileMethod::Linear)
                    .alias(format!("{column}:q3")),
            );
        }
        let quartiles = df.clone().lazy().select(exprs).collect()?;

        let mut bounds = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let q1 = quartiles.column(&format!("{column}:q1"))?.f64()?.get(0);
            let q3 = quartiles.column(&format!("{column}:q3"))?.f64()?.get(0);
            match (q1, q3) {
                (Some(q1), Some(q3)) => {
                    let iqr = q3 - q1;
                    bounds.push((
                        column.clone(),
                        q1 - self.multiplier * iqr,
                        q3 + self.multiplier * iqr,
                    ));
                }
                _ => warn!("column {column} has no quartiles, capping skipped for it"),
            }
        }
        info!("fitted IQR caps for {} columns", bounds.len());
        self.bounds = Some(bounds);
        self.transform(df)
    }

    /// Clips with previously stored bounds, without recomputation.
    pub fn transform(&self, df: DataFrame) -> Result<DataFrame, RaincastError> {
        let bounds = self
            .bounds
            .as_ref()
            .ok_or(RaincastError::UninitializedState {
                component: "IqrCapper",
            })?;
        let exprs: Vec<Expr> = bounds
            .iter()
            .map(|(column, lower, upper)| {
                when(col(column.as_str()).lt(lit(*lower)))
                    .then(lit(*lower))
                    .when(col(column.as_str()).gt(lit(*upper)))
                    .then(lit(*upper))
                    .otherwise(col(column.as_str()))
                    .alias(column.as_str())
            })
            .collect();
        Ok(df.lazy().with_columns(exprs).collect()?)
    }

    /// The stored `[lower, upper]` bounds for one column, if fitted.
    pub fn bounds_for(&self, column: &str) -> Option<(f64, f64)> {
        self.bounds
            .as_ref()?
            .iter()
            .find(|(name, _, _)| name == column)
            .map(|(_, lower, upper)| (*lower, *upper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rainfall_frame(values: &[f64]) -> DataFrame {
        df! { "Rainfall" => values }.unwrap()
    }

    #[test]
    fn fit_clips_values_outside_the_whiskers() {
        // Q1 = 2, Q3 = 4 (linear interpolation), IQR = 2 -> bounds [-1, 7].
        let df = rainfall_frame(&[1.0, 2.0, 3.0, 4.0, 100.0]);
        let mut capper = IqrCapper::new(["Rainfall"], 1.5);
        let capped = capper.fit_transform(df).unwrap();

        let rainfall = capped.column("Rainfall").unwrap().f64().unwrap();
        assert_eq!(rainfall.get(4), Some(7.0));
        assert_eq!(rainfall.get(0), Some(1.0));

        let (lower, upper) = capper.bounds_for("Rainfall").unwrap();
        assert!((lower - -1.0).abs() < 1e-9);
        assert!((upper - 7.0).abs() < 1e-9);
    }

    #[test]
    fn transform_applies_stored_bounds_to_a_single_row() {
        let mut capper = IqrCapper::new(["Rainfall"], 1.5);
        capper
            .fit_transform(rainfall_frame(&[1.0, 2.0, 3.0, 4.0, 5.0]))
            .unwrap();

        // A lone inference row no longer escapes capping.
        let capped = capper.transform(rainfall_frame(&[1000.0])).unwrap();
        let rainfall = capped.column("Rainfall").unwrap().f64().unwrap();
        let (_, upper) = capper.bounds_for("Rainfall").unwrap();
        assert_eq!(rainfall.get(0), Some(upper));
    }

    #[test]
    fn in_range_values_pass_through_untouched() {
        let mut capper = IqrCapper::new(["Rainfall"], 1.5);
        capper
            .fit_transform(rainfall_frame(&[1.0, 2.0, 3.0, 4.0, 5.0]))
            .unwrap();

        let capped = capper.transform(rainfall_frame(&[3.3])).unwrap();
        let rainfall = capped.column("Rainfall").unwrap().f64().unwrap();
        assert_eq!(rainfall.get(0), Some(3.3));
    }

    #[test]
    fn transform_before_fit_is_an_error() {
        let capper = IqrCapper::new(["Rainfall"], 1.5);
        let err = capper.transform(rainfall_frame(&[1.0])).unwrap_err();
        assert!(matches!(err, RaincastError::UninitializedState { .. }));
    }
}
