//! Deterministic weather fixtures shared across the test modules.

use chrono::{Days, NaiveDate};
use polars::prelude::*;

const DAYS_PER_LOCATION: usize = 30;
const LOCATIONS: [&str; 2] = ["Albury", "Sydney"];
const WIND_CYCLE: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

fn dates(len: usize) -> Vec<String> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..len)
        .map(|i| {
            (start + Days::new(i as u64))
                .format("%Y-%m-%d")
                .to_string()
        })
        .collect()
}

/// A linear ramp with roughly one gap per ten rows. `offset` staggers the
/// gaps so no row loses every column at once.
fn ramp(base: f64, step: f64, len: usize, offset: usize, phase: usize) -> Vec<Option<f64>> {
    (0..len)
        .map(|i| {
            if (i + offset) % 10 == phase {
                None
            } else {
                Some(base + step * i as f64)
            }
        })
        .collect()
}

fn wind(len: usize, offset: usize, phase: usize) -> Vec<Option<&'static str>> {
    (0..len)
        .map(|i| {
            if (i + offset) % 10 == phase {
                None
            } else {
                Some(WIND_CYCLE[(i + offset) % WIND_CYCLE.len()])
            }
        })
        .collect()
}

fn rain_flags(len: usize, phase: usize) -> Vec<Option<&'static str>> {
    (0..len)
        .map(|i| {
            if (i + 5) % 10 == phase {
                None
            } else if i % 4 == 0 {
                Some("Yes")
            } else {
                Some("No")
            }
        })
        .collect()
}

/// Two locations, thirty days each, with scattered missing values in every
/// imputed column and a couple of unlabeled rows. Column order matches the
/// raw weatherAUS layout with the label last.
pub fn training_frame() -> DataFrame {
    let mut date = Vec::new();
    let mut location = Vec::new();
    let mut min_temp = Vec::new();
    let mut max_temp = Vec::new();
    let mut rainfall = Vec::new();
    let mut evaporation = Vec::new();
    let mut sunshine = Vec::new();
    let mut gust_dir = Vec::new();
    let mut gust_speed = Vec::new();
    let mut dir_9am = Vec::new();
    let mut dir_3pm = Vec::new();
    let mut speed_9am = Vec::new();
    let mut speed_3pm = Vec::new();
    let mut humidity_9am = Vec::new();
    let mut humidity_3pm = Vec::new();
    let mut pressure_9am = Vec::new();
    let mut pressure_3pm = Vec::new();
    let mut cloud_9am = Vec::new();
    let mut cloud_3pm = Vec::new();
    let mut temp_9am = Vec::new();
    let mut temp_3pm = Vec::new();
    let mut rain_today = Vec::new();
    let mut rain_tomorrow = Vec::new();

    for (phase, name) in LOCATIONS.iter().enumerate() {
        let n = DAYS_PER_LOCATION;
        let shift = phase as f64 * 1.5;
        date.extend(dates(n));
        location.extend(std::iter::repeat(*name).take(n));
        min_temp.extend(ramp(10.0 + shift, 0.3, n, 0, phase));
        max_temp.extend(ramp(20.0 + shift, 0.4, n, 1, phase));
        rainfall.extend(ramp(0.0, 0.2, n, 2, phase));
        evaporation.extend(ramp(4.0 + shift, 0.1, n, 3, phase));
        sunshine.extend(ramp(6.0, 0.15, n, 4, phase));
        gust_dir.extend(wind(n, 0, phase));
        gust_speed.extend(ramp(30.0 + shift, 0.5, n, 5, phase));
        dir_9am.extend(wind(n, 1, phase));
        dir_3pm.extend(wind(n, 2, phase));
        speed_9am.extend(ramp(10.0, 0.4, n, 6, phase));
        speed_3pm.extend(ramp(15.0, 0.3, n, 7, phase));
        humidity_9am.extend(ramp(60.0 + shift, 0.5, n, 8, phase));
        humidity_3pm.extend(ramp(45.0 + shift, 0.6, n, 9, phase));
        pressure_9am.extend(ramp(1005.0, 0.5, n, 3, phase));
        pressure_3pm.extend(ramp(1003.0, 0.7, n, 6, phase));
        cloud_9am.extend(ramp(2.0, 0.2, n, 1, phase));
        cloud_3pm.extend(ramp(3.0 + shift, 0.15, n, 8, phase));
        temp_9am.extend(ramp(15.0 + shift, 0.3, n, 4, phase));
        temp_3pm.extend(ramp(19.0 + shift, 0.35, n, 9, phase));
        rain_today.extend(rain_flags(n, phase));
        // A couple of unlabeled rows per location exercise the label filter.
        rain_tomorrow.extend((0..n).map(|i| {
            if i == 7 {
                None
            } else if (i + 1) % 4 == 0 {
                Some("Yes")
            } else {
                Some("No")
            }
        }));
    }

    df! {
        "Date" => date,
        "Location" => location,
        "MinTemp" => min_temp,
        "MaxTemp" => max_temp,
        "Rainfall" => rainfall,
        "Evaporation" => evaporation,
        "Sunshine" => sunshine,
        "WindGustDir" => gust_dir,
        "WindGustSpeed" => gust_speed,
        "WindDir9am" => dir_9am,
        "WindDir3pm" => dir_3pm,
        "WindSpeed9am" => speed_9am,
        "WindSpeed3pm" => speed_3pm,
        "Humidity9am" => humidity_9am,
        "Humidity3pm" => humidity_3pm,
        "Pressure9am" => pressure_9am,
        "Pressure3pm" => pressure_3pm,
        "Cloud9am" => cloud_9am,
        "Cloud3pm" => cloud_3pm,
        "Temp9am" => temp_9am,
        "Temp3pm" => temp_3pm,
        "RainToday" => rain_today,
        "RainTomorrow" => rain_tomorrow,
    }
    .unwrap()
}

/// One fully observed inference row with mid-range values, matching the
/// training column order minus the label.
pub fn inference_row(location: &str) -> DataFrame {
    df! {
        "Date" => &["2024-02-01"],
        "Location" => &[location],
        "MinTemp" => &[15.0],
        "MaxTemp" => &[25.0],
        "Rainfall" => &[1.2],
        "Evaporation" => &[5.0],
        "Sunshine" => &[8.0],
        "WindGustDir" => &["N"],
        "WindGustSpeed" => &[35.0],
        "WindDir9am" => &["N"],
        "WindDir3pm" => &["NE"],
        "WindSpeed9am" => &[15.0],
        "WindSpeed3pm" => &[18.0],
        "Humidity9am" => &[65.0],
        "Humidity3pm" => &[50.0],
        "Pressure9am" => &[1010.0],
        "Pressure3pm" => &[1015.0],
        "Cloud9am" => &[4.0],
        "Cloud3pm" => &[5.0],
        "Temp9am" => &[18.0],
        "Temp3pm" => &[23.0],
        "RainToday" => &["No"],
    }
    .unwrap()
}
