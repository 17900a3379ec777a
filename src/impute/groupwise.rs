//! Stateless per-location imputation over a single batch.
//!
//! Operates purely on the batch passed in: per-location medians for the
//! simple numeric group, forward/backward fill along the date-sorted sequence
//! for the time-series group, and per-location modes for categoricals. A
//! location that is entirely missing for a numeric field is left missing here
//! and picked up by the global imputers.

use crate::error::RaincastError;
use crate::schema::{LOCATION, SIMPLE_IMPUTE_COLS, TIME_SERIES_COLS};
use polars::prelude::*;
use std::collections::BTreeMap;

/// Fills the simple numeric group with each location's in-batch median.
pub fn fill_simple_by_location(df: DataFrame) -> Result<DataFrame, RaincastError> {
    let exprs: Vec<Expr> = SIMPLE_IMPUTE_COLS
        .iter()
        .map(|c| {
            col(*c)
                .fill_null(col(*c).median().over([col(LOCATION)]))
                .alias(*c)
        })
        .collect();
    Ok(df.lazy().with_columns(exprs).collect()?)
}

/// Fills the time-series group by forward fill then backward fill within each
/// location. The batch must already be sorted by (location, date) for the
/// fill direction to mean anything.
pub fn fill_time_series_by_location(df: DataFrame) -> Result<DataFrame, RaincastError> {
    let exprs: Vec<Expr> = TIME_SERIES_COLS
        .iter()
        .map(|c| {
            col(*c)
                .forward_fill(None)
                .backward_fill(None)
                .over([col(LOCATION)])
                .alias(*c)
        })
        .collect();
    Ok(df.lazy().with_columns(exprs).collect()?)
}

/// Fills a categorical column with each location's modal value, falling back
/// to the `"Unknown"` sentinel for locations with no observed value at all.
/// Ties on the mode break toward the lexicographically smallest label so the
/// result is deterministic.
pub fn fill_mode_by_location(df: &mut DataFrame, column: &str) -> Result<(), RaincastError> {
    let filled = {
        let locations = df.column(LOCATION)?.str()?;
        let values = df.column(column)?.str()?;

        let mut counts: BTreeMap<&str, BTreeMap<&str, u32>> = BTreeMap::new();
        for (location, value) in locations.into_iter().zip(values.into_iter()) {
            if let (Some(location), Some(value)) = (location, value) {
                *counts
                    .entry(location)
                    .or_default()
                    .entry(value)
                    .or_insert(0) += 1;
            }
        }

        let mut modes: BTreeMap<&str, &str> = BTreeMap::new();
        for (location, value_counts) in &counts {
            let mut best: Option<(&str, u32)> = None;
            for (value, count) in value_counts {
                // Strict comparison keeps the first (smallest) label on ties.
                if best.map_or(true, |(_, best_count)| *count > best_count) {
                    best = Some((value, *count));
                }
            }
            if let Some((value, _)) = best {
                modes.insert(location, value);
            }
        }

        let mut filled: Vec<String> = Vec::with_capacity(df.height());
        for (location, value) in locations.into_iter().zip(values.into_iter()) {
            match value {
                Some(value) => filled.push(value.to_string()),
                None => {
                    let fallback = location
                        .and_then(|l| modes.get(l).copied())
                        .unwrap_or("Unknown");
                    filled.push(fallback.to_string());
                }
            }
        }
        filled
    };

    df.with_column(Series::new(column.into(), filled))?;
    Ok(())
}
