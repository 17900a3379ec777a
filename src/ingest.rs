//! CSV ingestion for the weatherAUS observation format.

use crate::error::RaincastError;
use log::info;
use polars::prelude::*;
use std::path::Path;

/// Reads a weatherAUS-style CSV into a DataFrame of string columns.
///
/// Every column is read as text and the `NA` missing-value marker becomes a
/// proper null. Numeric casting is left to the pipeline, which knows which
/// columns are numeric; inferring dtypes here would let a stray `NA` flip a
/// column's type depending on the batch.
pub fn read_weather_csv(path: impl AsRef<Path>) -> Result<DataFrame, RaincastError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
        .finish()?;

    let exprs: Vec<Expr> = df
        .get_column_names()
        .iter()
        .map(|name| {
            when(col(name.as_str()).eq(lit("NA")))
                .then(lit(NULL))
                .otherwise(col(name.as_str()))
                .alias(name.as_str())
        })
        .collect();
    let df = df.lazy().with_columns(exprs).collect()?;
    info!(
        "read {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.as_ref().display()
    );
    Ok(df)
}
