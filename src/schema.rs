//! Column dictionary for the raw weather schema and the fitted column manifest.
//!
//! Every stage of the pipeline addresses columns through the constants below,
//! never through dtype introspection at call time. The set of columns a fitted
//! pipeline expects is frozen into a [`ColumnManifest`] at fit time and
//! validated against on every subsequent transform.

use crate::error::RaincastError;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Grouping key, always present in a raw record.
pub const LOCATION: &str = "Location";
/// Ordering key, always present in a raw record (ISO-8601 date string).
pub const DATE: &str = "Date";
/// Binary "did it rain today" field (Yes/No in raw data).
pub const RAIN_TODAY: &str = "RainToday";
/// Binary label, present on the fit path only (Yes/No in raw data).
pub const RAIN_TOMORROW: &str = "RainTomorrow";
/// Derived month column, dropped again before the feature matrix is returned.
pub const MONTH: &str = "month";

/// Numeric fields imputed with the per-location in-batch median.
pub const SIMPLE_IMPUTE_COLS: [&str; 9] = [
    "MinTemp",
    "MaxTemp",
    "Rainfall",
    "Temp9am",
    "Temp3pm",
    "WindSpeed9am",
    "WindSpeed3pm",
    "Humidity9am",
    "Humidity3pm",
];

/// Slowly-varying fields imputed with forward/backward fill along the
/// date-sorted sequence of each location, then globally by stored medians.
pub const TIME_SERIES_COLS: [&str; 3] = ["WindGustSpeed", "Pressure9am", "Pressure3pm"];

/// Fields with weak batch-level signal, imputed by the neighbor imputer.
pub const NEIGHBOR_COLS: [&str; 4] = ["Cloud9am", "Cloud3pm", "Evaporation", "Sunshine"];

/// Compass-direction fields, replaced by sine/cosine pairs in the output.
pub const WIND_DIR_COLS: [&str; 3] = ["WindGustDir", "WindDir9am", "WindDir3pm"];

/// Categorical fields imputed with the per-location mode.
pub const CATEGORICAL_COLS: [&str; 4] = ["WindDir9am", "WindGustDir", "WindDir3pm", RAIN_TODAY];

/// Derived differential/aggregate features, computed after encoding and
/// before scaling so they pass through min-max scaling themselves.
pub const PRESSURE_DIFF: &str = "Pressure_Diff";
pub const HUMIDITY_DIFF: &str = "Humidity_Diff";
pub const WIND_SPEED_DIFF: &str = "WindSpeed_Diff";
pub const CLOUD_TOTAL: &str = "Cloud_Total";
pub const DERIVED_COLS: [&str; 4] = [PRESSURE_DIFF, HUMIDITY_DIFF, WIND_SPEED_DIFF, CLOUD_TOTAL];

/// All raw numeric meteorological fields, in raw-schema order.
pub fn numeric_columns() -> Vec<String> {
    [
        "MinTemp",
        "MaxTemp",
        "Rainfall",
        "Evaporation",
        "Sunshine",
        "WindGustSpeed",
        "WindSpeed9am",
        "WindSpeed3pm",
        "Humidity9am",
        "Humidity3pm",
        "Pressure9am",
        "Pressure3pm",
        "Cloud9am",
        "Cloud3pm",
        "Temp9am",
        "Temp3pm",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Columns subject to IQR capping: the raw numerics plus the derived month.
pub fn capped_columns() -> Vec<String> {
    let mut cols = numeric_columns();
    cols.push(MONTH.to_string());
    cols
}

/// Columns subject to min-max scaling: the raw numerics plus the four derived
/// features. Encoded location, the 0/1 rain flag and the sine/cosine pairs
/// keep their natural ranges.
pub fn scaled_columns() -> Vec<String> {
    let mut cols = numeric_columns();
    cols.extend(DERIVED_COLS.iter().map(|s| s.to_string()));
    cols
}

/// The fixed output order of the feature matrix, label last (fit path only).
pub fn output_columns() -> Vec<String> {
    let mut cols = vec![LOCATION.to_string()];
    cols.extend(numeric_columns());
    cols.push(RAIN_TODAY.to_string());
    for wind in WIND_DIR_COLS {
        cols.push(format!("{wind}_sin"));
        cols.push(format!("{wind}_cos"));
    }
    cols.push(format!("{MONTH}_sin"));
    cols.push(format!("{MONTH}_cos"));
    cols.extend(DERIVED_COLS.iter().map(|s| s.to_string()));
    cols.push(RAIN_TOMORROW.to_string());
    cols
}

/// The ordered column schema recorded when a pipeline is fitted.
///
/// `input_columns` is the raw-batch schema (label excluded) seen at fit time;
/// `output_columns` is the feature-matrix schema including the label. A
/// transform-time batch whose columns differ in set or order is rejected with
/// [`RaincastError::SchemaMismatch`] instead of silently producing a
/// misaligned vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnManifest {
    pub input_columns: Vec<String>,
    pub output_columns: Vec<String>,
}

impl ColumnManifest {
    /// Records the manifest from a fit-path batch.
    pub fn from_fit_batch(batch: &DataFrame) -> Self {
        Self {
            input_columns: input_columns_of(batch),
            output_columns: output_columns(),
        }
    }

    /// Checks a transform-time batch against the fit-time input schema.
    /// The label column is ignored if present.
    pub fn validate(&self, batch: &DataFrame) -> Result<(), RaincastError> {
        let found = input_columns_of(batch);
        if found != self.input_columns {
            return Err(RaincastError::SchemaMismatch {
                expected: self.input_columns.clone(),
                found,
            });
        }
        Ok(())
    }

    /// Projects a processed frame onto the fixed output order, with or
    /// without the label column.
    pub fn project(&self, df: &DataFrame, with_label: bool) -> Result<DataFrame, RaincastError> {
        let selection = self
            .output_columns
            .iter()
            .filter(|c| with_label || c.as_str() != RAIN_TOMORROW)
            .map(|c| c.as_str());
        Ok(df.select(selection)?)
    }
}

/// The column names of a batch in order, label excluded.
pub fn input_columns_of(batch: &DataFrame) -> Vec<String> {
    batch
        .get_column_names()
        .iter()
        .filter(|name| name.as_str() != RAIN_TOMORROW)
        .map(|name| name.to_string())
        .collect()
}
