//! The pipeline orchestrator: one fixed step sequence, two paths through it.
//!
//! The fit-transform path computes every statistic and returns it bundled in
//! a [`FittedPipelineState`]; the transform-only path replays the identical
//! step order against a previously fitted state. Column order of the output
//! is enforced here through the fitted manifest, never left to the caller.

mod state;

pub use state::FittedPipelineState;

use crate::encoding::cyclic;
use crate::encoding::label::LocationEncoder;
use crate::error::RaincastError;
use crate::impute::groupwise;
use crate::impute::knn::KnnImputer;
use crate::impute::median::MedianImputer;
use crate::outlier::IqrCapper;
use crate::scale::MinMaxScaler;
use crate::schema::{
    self, ColumnManifest, CATEGORICAL_COLS, CLOUD_TOTAL, DATE, HUMIDITY_DIFF, LOCATION, MONTH,
    NEIGHBOR_COLS, PRESSURE_DIFF, RAIN_TODAY, RAIN_TOMORROW, TIME_SERIES_COLS, WIND_SPEED_DIFF,
};
use bon::Builder;
use chrono::{Datelike, NaiveDate};
use log::{info, warn};
use polars::prelude::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Tunables of the pipeline. The defaults reproduce the reference behavior.
#[derive(Debug, Clone, Builder)]
pub struct PipelineConfig {
    /// Donor count for the neighbor imputer.
    #[builder(default = 5)]
    pub neighbors: usize,
    /// Whisker multiplier for IQR capping.
    #[builder(default = 1.5)]
    pub iqr_multiplier: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig::builder().build()
    }
}

/// Sequences cleaning, imputation, encoding and scaling into a feature
/// matrix with a stable column schema.
#[derive(Debug, Clone, Default)]
pub struct WeatherPipeline {
    config: PipelineConfig,
}

impl WeatherPipeline {
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Training path: fits every statistic on `batch` and returns the
    /// feature matrix (label column included, last) together with the
    /// fitted state. The batch must carry the label column.
    pub fn fit_transform(
        &self,
        batch: &DataFrame,
    ) -> Result<(DataFrame, FittedPipelineState), RaincastError> {
        if batch.column(RAIN_TOMORROW).is_err() {
            return Err(RaincastError::MissingRequiredColumn {
                column: RAIN_TOMORROW.to_string(),
            });
        }
        let manifest = ColumnManifest::from_fit_batch(batch);

        let mut df = prepare(batch)?;
        if df.height() > 1 {
            df = groupwise_stage(df)?;
        }

        let mut median_imputer = MedianImputer::new(TIME_SERIES_COLS);
        df = median_imputer.fit_transform(df)?;
        let mut knn_imputer = KnnImputer::new(NEIGHBOR_COLS, self.config.neighbors);
        df = knn_imputer.fit_transform(df)?;

        // Rows without a label cannot contribute to training.
        df = df
            .lazy()
            .filter(col(RAIN_TOMORROW).is_not_null())
            .collect()?;

        let mut outlier_caps =
            IqrCapper::new(schema::capped_columns(), self.config.iqr_multiplier);
        df = outlier_caps.fit_transform(df)?;

        encode_rain_flag(&mut df, RAIN_TODAY)?;
        encode_rain_flag(&mut df, RAIN_TOMORROW)?;

        let mut location_encoder = LocationEncoder::new();
        df = location_encoder.fit_transform(df)?;
        df = cyclic::encode_wind_directions(df)?;
        df = cyclic::encode_month(df)?;
        df = add_derived_features(df)?;

        let mut scaler = MinMaxScaler::new(schema::scaled_columns());
        df = scaler.fit_transform(df)?;

        let features = manifest.project(&df, true)?;
        info!(
            "fit pass complete: {} rows, {} feature columns",
            features.height(),
            features.width()
        );

        let state = FittedPipelineState {
            median_imputer,
            knn_imputer,
            location_encoder,
            outlier_caps,
            scaler,
            manifest,
        };
        Ok((features, state))
    }

    /// Inference path: replays the fit-time step order with stored
    /// statistics. The label column is ignored if present; the batch schema
    /// must otherwise match the fit-time schema exactly.
    pub fn transform(
        &self,
        batch: &DataFrame,
        state: &FittedPipelineState,
    ) -> Result<DataFrame, RaincastError> {
        state.manifest.validate(batch)?;

        let mut df = prepare(batch)?;
        if df.height() > 1 {
            df = groupwise_stage(df)?;
        }

        df = state.median_imputer.transform(df)?;
        df = state.knn_imputer.transform(df)?;
        df = state.outlier_caps.transform(df)?;

        encode_rain_flag(&mut df, RAIN_TODAY)?;

        df = state.location_encoder.transform(df)?;
        df = cyclic::encode_wind_directions(df)?;
        df = cyclic::encode_month(df)?;
        df = add_derived_features(df)?;
        df = state.scaler.transform(df)?;

        state.manifest.project(&df, false)
    }
}

/// Validates the required keys, derives the month column, casts the numeric
/// fields and sorts by (location, date). ISO date strings sort
/// chronologically, which the fill direction of the time-series imputation
/// depends on.
fn prepare(batch: &DataFrame) -> Result<DataFrame, RaincastError> {
    let mut df = batch.clone();
    for required in [LOCATION, DATE] {
        if df.column(required).is_err() {
            return Err(RaincastError::MissingRequiredColumn {
                column: required.to_string(),
            });
        }
    }

    let months = {
        let locations = df.column(LOCATION)?.str()?;
        if let Some(row) = locations.into_iter().position(|v| v.is_none()) {
            return Err(RaincastError::MissingRequiredField {
                field: LOCATION.to_string(),
                row,
            });
        }

        let dates = df.column(DATE)?.str()?;
        let mut months: Vec<f64> = Vec::with_capacity(dates.len());
        for (row, value) in dates.into_iter().enumerate() {
            let value = value.ok_or_else(|| RaincastError::MissingRequiredField {
                field: DATE.to_string(),
                row,
            })?;
            let parsed = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| {
                RaincastError::InvalidDate {
                    value: value.to_string(),
                    source,
                }
            })?;
            months.push(parsed.month() as f64);
        }
        months
    };
    df.with_column(Series::new(MONTH.into(), months))?;

    let casts: Vec<Expr> = schema::numeric_columns()
        .iter()
        .map(|c| col(c.as_str()).cast(DataType::Float64).alias(c.as_str()))
        .collect();
    let sorted = df
        .lazy()
        .with_columns(casts)
        .sort(
            [LOCATION, DATE],
            SortMultipleOptions::new().with_maintain_order(true),
        )
        .collect()?;
    Ok(sorted)
}

/// Per-location, batch-local imputation. Skipped for single-row batches,
/// where every group statistic degenerates to the row itself and the global
/// imputers carry the load alone.
fn groupwise_stage(mut df: DataFrame) -> Result<DataFrame, RaincastError> {
    df = groupwise::fill_simple_by_location(df)?;
    df = groupwise::fill_time_series_by_location(df)?;
    for column in CATEGORICAL_COLS {
        groupwise::fill_mode_by_location(&mut df, column)?;
    }
    Ok(df)
}

/// Maps a Yes/No column to 1/0. The only other value that can reach this
/// point is the imputation sentinel, which becomes null.
fn encode_rain_flag(df: &mut DataFrame, column: &str) -> Result<(), RaincastError> {
    let values: Vec<Option<f64>> = {
        let flags = df.column(column)?.str()?;
        flags
            .into_iter()
            .map(|flag| match flag {
                Some("Yes") => Some(1.0),
                Some("No") => Some(0.0),
                Some(other) => {
                    warn!("unmappable value '{other}' in {column}, emitting null");
                    None
                }
                None => None,
            })
            .collect()
    };
    df.with_column(Series::new(column.into(), values))?;
    Ok(())
}

/// The four derived features, added before scaling so the scaler fits them
/// like any other numeric column.
fn add_derived_features(df: DataFrame) -> Result<DataFrame, RaincastError> {
    Ok(df
        .lazy()
        .with_columns([
            (col("Pressure3pm") - col("Pressure9am")).alias(PRESSURE_DIFF),
            (col("Humidity3pm") - col("Humidity9am")).alias(HUMIDITY_DIFF),
            (col("WindSpeed3pm") - col("WindSpeed9am")).alias(WIND_SPEED_DIFF),
            (col("Cloud9am") + col("Cloud3pm")).alias(CLOUD_TOTAL),
        ])
        .collect()?)
}
