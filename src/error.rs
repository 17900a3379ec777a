use crate::assets::AssetError;
use polars::error::PolarsError;
use thiserror::Error;

/// Errors surfaced by the feature pipeline.
///
/// All variants are fatal to the current fit or transform call: no partial
/// or best-effort output is ever returned, and retries belong to the caller.
#[derive(Debug, Error)]
pub enum RaincastError {
    #[error("'{component}' was asked to transform before being fitted or loaded")]
    UninitializedState { component: &'static str },

    #[error("value '{value}' in column '{column}' is not part of the fitted vocabulary")]
    UnknownCategory { column: String, value: String },

    #[error("transform-time columns {found:?} do not match fit-time columns {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("required column '{column}' is absent from the batch")]
    MissingRequiredColumn { column: String },

    #[error("required field '{field}' is null at row {row}")]
    MissingRequiredField { field: String, row: usize },

    #[error("could not parse date '{value}'")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
