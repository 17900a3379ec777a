//! Cyclic encoding of compass directions and calendar months.
//!
//! A periodic quantity encoded as a plain integer (or one-hot) loses its
//! circular adjacency: 350 degrees and 10 degrees end up numerically far
//! apart. Mapping the quantity onto the unit circle as a sine/cosine pair
//! preserves that adjacency, which is what the classifier consumes.

use crate::error::RaincastError;
use crate::schema::{self, MONTH, WIND_DIR_COLS};
use log::warn;
use polars::prelude::*;
use std::f64::consts::TAU;

/// The 16-point compass rose in table order, N first.
pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Reference angle in degrees for a 16-point compass label, `None` for
/// anything outside the rose (including the "Unknown" imputation sentinel).
pub fn compass_degrees(label: &str) -> Option<f64> {
    let index = COMPASS_POINTS.iter().position(|p| *p == label)?;
    Some(index as f64 * 22.5)
}

/// Sine/cosine pair for an angle given in degrees.
pub fn degrees_to_pair(degrees: f64) -> (f64, f64) {
    let theta = degrees * TAU / 360.0;
    (theta.sin(), theta.cos())
}

/// Sine/cosine pair for a month number on the 12-month circle.
pub fn month_to_pair(month: f64) -> (f64, f64) {
    let theta = month * TAU / 12.0;
    (theta.sin(), theta.cos())
}

/// Replaces each wind-direction column with `<name>_sin` / `<name>_cos` and
/// drops the raw label. A label outside the compass rose yields null pairs;
/// it can only be the sentinel produced when a location never reported a
/// direction, so it is logged rather than treated as fatal.
pub fn encode_wind_directions(mut df: DataFrame) -> Result<DataFrame, RaincastError> {
    for column in WIND_DIR_COLS {
        let labels = df.column(column)?.str()?;
        let mut sines: Vec<Option<f64>> = Vec::with_capacity(labels.len());
        let mut cosines: Vec<Option<f64>> = Vec::with_capacity(labels.len());
        for label in labels.into_iter() {
            match label.and_then(compass_degrees) {
                Some(degrees) => {
                    let (sin, cos) = degrees_to_pair(degrees);
                    sines.push(Some(sin));
                    cosines.push(Some(cos));
                }
                None => {
                    if let Some(value) = label {
                        warn!("no compass angle for '{value}' in column {column}, emitting null");
                    }
                    sines.push(None);
                    cosines.push(None);
                }
            }
        }
        df.with_column(Series::new(format!("{column}_sin").into(), sines))?;
        df.with_column(Series::new(format!("{column}_cos").into(), cosines))?;
        df = df.drop(column)?;
    }
    Ok(df)
}

/// Adds `month_sin` / `month_cos` from the derived month column. The raw
/// month column stays in place; the output projection drops it.
pub fn encode_month(mut df: DataFrame) -> Result<DataFrame, RaincastError> {
    let months = df.column(MONTH)?.f64()?;
    let mut sines: Vec<Option<f64>> = Vec::with_capacity(months.len());
    let mut cosines: Vec<Option<f64>> = Vec::with_capacity(months.len());
    for month in months.into_iter() {
        match month {
            Some(m) => {
                let (sin, cos) = month_to_pair(m);
                sines.push(Some(sin));
                cosines.push(Some(cos));
            }
            None => {
                sines.push(None);
                cosines.push(None);
            }
        }
    }
    df.with_column(Series::new(format!("{}_sin", schema::MONTH).into(), sines))?;
    df.with_column(Series::new(format!("{}_cos", schema::MONTH).into(), cosines))?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn every_compass_point_lands_on_the_unit_circle() {
        for point in COMPASS_POINTS {
            let degrees = compass_degrees(point).unwrap();
            let (sin, cos) = degrees_to_pair(degrees);
            assert!(
                (sin * sin + cos * cos - 1.0).abs() < EPS,
                "{point} is off the unit circle"
            );
        }
    }

    #[test]
    fn north_and_south_are_antipodal() {
        assert_eq!(compass_degrees("N"), Some(0.0));
        assert_eq!(compass_degrees("S"), Some(180.0));

        let (sin_n, cos_n) = degrees_to_pair(0.0);
        let (sin_s, cos_s) = degrees_to_pair(180.0);
        assert!(sin_n.abs() < EPS && (cos_n - 1.0).abs() < EPS);
        assert!(sin_s.abs() < EPS && (cos_s + 1.0).abs() < EPS);
    }

    #[test]
    fn opposite_directions_have_opposite_cosines() {
        let (_, cos_ne) = degrees_to_pair(compass_degrees("NE").unwrap());
        let (_, cos_sw) = degrees_to_pair(compass_degrees("SW").unwrap());
        assert!((cos_ne + cos_sw).abs() < EPS);
        assert!(cos_ne > 0.0 && cos_sw < 0.0);
    }

    #[test]
    fn unknown_label_has_no_angle() {
        assert_eq!(compass_degrees("Unknown"), None);
        assert_eq!(compass_degrees(""), None);
    }

    #[test]
    fn month_december_wraps_to_january_neighbourhood() {
        let (sin_dec, cos_dec) = month_to_pair(12.0);
        let (sin_jan, cos_jan) = month_to_pair(1.0);
        assert!(sin_dec.abs() < EPS && (cos_dec - 1.0).abs() < EPS);
        // January sits one step around the circle from December.
        let gap = ((sin_dec - sin_jan).powi(2) + (cos_dec - cos_jan).powi(2)).sqrt();
        assert!(gap < 0.6, "adjacent months should stay close, gap={gap}");
    }

    #[test]
    fn wind_encoding_replaces_raw_columns() {
        let df = polars::prelude::df! {
            "WindGustDir" => &["N", "S"],
            "WindDir9am" => &["E", "W"],
            "WindDir3pm" => &["Unknown", "NNW"],
        }
        .unwrap();
        let encoded = encode_wind_directions(df).unwrap();
        let names: Vec<String> = encoded
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert!(!names.contains(&"WindGustDir".to_string()));
        assert!(names.contains(&"WindGustDir_sin".to_string()));
        assert!(names.contains(&"WindDir3pm_cos".to_string()));

        let gust_cos = encoded.column("WindGustDir_cos").unwrap().f64().unwrap();
        assert!((gust_cos.get(0).unwrap() - 1.0).abs() < EPS);
        assert!((gust_cos.get(1).unwrap() + 1.0).abs() < EPS);

        // The sentinel propagates as null, not as a made-up angle.
        let pm_sin = encoded.column("WindDir3pm_sin").unwrap().f64().unwrap();
        assert!(pm_sin.get(0).is_none());
        assert!(pm_sin.get(1).is_some());
    }
}
