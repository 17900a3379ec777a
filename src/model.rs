//! Hand-off surface between the feature pipeline and a downstream model.
//!
//! The pipeline itself never trains a classifier; it produces the feature
//! matrix and the split helper below. Any model that can consume the matrix
//! implements [`BinaryClassifier`].

use crate::error::RaincastError;
use crate::schema::RAIN_TOMORROW;
use polars::prelude::*;

/// A binary rain/no-rain classifier over the pipeline's feature matrix.
pub trait BinaryClassifier {
    fn fit(&mut self, features: &DataFrame, labels: &Float64Chunked) -> Result<(), RaincastError>;

    /// Probability of the positive class (rain tomorrow), one per row.
    fn predict_proba(&self, features: &DataFrame) -> Result<Vec<f64>, RaincastError>;

    fn predict(&self, features: &DataFrame) -> Result<Vec<bool>, RaincastError> {
        Ok(self
            .predict_proba(features)?
            .into_iter()
            .map(|p| p >= 0.5)
            .collect())
    }
}

/// Splits a fit-path feature matrix into features and the 0/1 label column.
pub fn split_features_label(matrix: &DataFrame) -> Result<(DataFrame, Column), RaincastError> {
    let labels = matrix.column(RAIN_TOMORROW)?.clone();
    let features = matrix.drop(RAIN_TOMORROW)?;
    Ok((features, labels))
}
