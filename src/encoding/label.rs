//! Integer encoding of the location label with a frozen vocabulary.

use crate::error::RaincastError;
use crate::schema::LOCATION;
use log::info;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maps location names to fixed integer codes.
///
/// Codes are assigned in sorted label order at fit time so that the same
/// training set always yields the same vocabulary. After fitting, the
/// vocabulary is frozen: a label that was never seen raises
/// [`RaincastError::UnknownCategory`] instead of being given a default code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationEncoder {
    vocabulary: Option<BTreeMap<String, u32>>,
}

impl LocationEncoder {
    pub fn new() -> Self {
        Self { vocabulary: None }
    }

    /// Builds the vocabulary from the batch and encodes it in one pass.
    pub fn fit_transform(&mut self, df: DataFrame) -> Result<DataFrame, RaincastError> {
        let labels = df.column(LOCATION)?.str()?;
        let mut vocabulary = BTreeMap::new();
        for label in labels.into_iter().flatten() {
            vocabulary.entry(label.to_string()).or_insert(0u32);
        }
        // BTreeMap iterates sorted, so enumeration is the sorted-label order.
        for (code, (_, slot)) in vocabulary.iter_mut().enumerate() {
            *slot = code as u32;
        }
        info!("fitted location vocabulary with {} labels", vocabulary.len());
        self.vocabulary = Some(vocabulary);
        self.transform(df)
    }

    /// Encodes through the stored vocabulary.
    pub fn transform(&self, mut df: DataFrame) -> Result<DataFrame, RaincastError> {
        let vocabulary =
            self.vocabulary
                .as_ref()
                .ok_or(RaincastError::UninitializedState {
                    component: "LocationEncoder",
                })?;
        let labels = df.column(LOCATION)?.str()?;
        let mut codes: Vec<Option<f64>> = Vec::with_capacity(labels.len());
        for label in labels.into_iter() {
            match label {
                Some(value) => match vocabulary.get(value) {
                    Some(code) => codes.push(Some(*code as f64)),
                    None => {
                        return Err(RaincastError::UnknownCategory {
                            column: LOCATION.to_string(),
                            value: value.to_string(),
                        })
                    }
                },
                None => codes.push(None),
            }
        }
        df.with_column(Series::new(LOCATION.into(), codes))?;
        Ok(df)
    }

    /// The fitted label→code mapping, if any.
    pub fn vocabulary(&self) -> Option<&BTreeMap<String, u32>> {
        self.vocabulary.as_ref()
    }
}
