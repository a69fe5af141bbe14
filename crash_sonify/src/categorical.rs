// Categorical lookups: weather, daylight, side and severity.
//
// Each categorical source column maps to one p-field through a fixed table.
// The tables live here as plain `(key, value)` slices so the whole domain of
// each mapping, and what happens outside it, can be read in one place:
//
// - Weather -> p11 filter cutoff. Open set: anything not in the table gets
//   `WEATHER_DEFAULT_CUTOFF`. A trailing " / Windy" is dropped first, so the
//   windy variant of a category lands in the same bucket as the plain one.
// - Daylight -> p8 reverb send. `D` is dry, everything else is night.
// - Side -> p9 balance. `R` pans hard right (0), everything else left (1).
// - Severity -> p10 pitch ratio. Closed set: only 2, 3 and 4 exist, anything
//   else is an `UnmappedCategory` error.
//
// Brighter weather means a darker filter: clear skies get the lowest cutoff
// and thunderstorms the highest.

use crate::error::FieldError;
use crate::record::{RecordTable, column};

/// Filter cutoff (Hz) per base weather category, before scaling.
pub const WEATHER_CUTOFFS: &[(&str, f64)] = &[
    ("Clear", 10000.0),
    ("Fair", 10000.0),
    ("Fog", 12000.0),
    ("Light Rain", 14000.0),
    ("Light Snow", 18000.0),
    ("Snow", 18000.0),
    ("Thunder", 20000.0),
];

/// Cutoff for any weather category missing from `WEATHER_CUTOFFS`.
pub const WEATHER_DEFAULT_CUTOFF: f64 = 16000.0;

/// Suffix marking the windy variant of a weather category.
pub const WINDY_SUFFIX: &str = " / Windy";

pub const DAYLIGHT_GAINS: &[(&str, f64)] = &[("D", 0.0)];
pub const NIGHT_REVERB_GAIN: f64 = 0.2;

pub const SIDE_BALANCES: &[(&str, f64)] = &[("R", 0.0)];
pub const LEFT_BALANCE: f64 = 1.0;

/// Pitch ratio for each mapped severity class.
pub const SEVERITY_PITCHES: &[(i64, f64)] = &[(2, 3.0), (3, 4.0), (4, 5.0)];

fn lookup<K: PartialEq + Copy>(table: &[(K, f64)], key: K) -> Option<f64> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Strip surrounding whitespace and the windy suffix from a weather string.
pub fn normalize_weather(condition: &str) -> &str {
    let trimmed = condition.trim();
    trimmed
        .strip_suffix(WINDY_SUFFIX)
        .map(str::trim_end)
        .unwrap_or(trimmed)
}

/// Unscaled filter cutoff for a weather string. Never fails.
pub fn weather_cutoff(condition: &str) -> f64 {
    lookup(WEATHER_CUTOFFS, normalize_weather(condition)).unwrap_or(WEATHER_DEFAULT_CUTOFF)
}

pub fn daylight_gain(flag: &str) -> f64 {
    lookup(DAYLIGHT_GAINS, flag.trim()).unwrap_or(NIGHT_REVERB_GAIN)
}

pub fn side_balance(flag: &str) -> f64 {
    lookup(SIDE_BALANCES, flag.trim()).unwrap_or(LEFT_BALANCE)
}

/// Pitch ratio for a severity class, or `None` outside {2, 3, 4}.
pub fn severity_pitch(severity: i64) -> Option<f64> {
    lookup(SEVERITY_PITCHES, severity)
}

/// p11 for every record: weather cutoff times `scale`.
pub fn weather_column(table: &RecordTable, scale: f64) -> Vec<f64> {
    table
        .records()
        .iter()
        .map(|r| weather_cutoff(&r.weather) * scale)
        .collect()
}

/// p8 for every record.
pub fn daylight_column(table: &RecordTable) -> Vec<f64> {
    table
        .records()
        .iter()
        .map(|r| daylight_gain(&r.sunrise_sunset))
        .collect()
}

/// p9 for every record.
pub fn side_column(table: &RecordTable) -> Vec<f64> {
    table.records().iter().map(|r| side_balance(&r.side)).collect()
}

/// p10 for every record. Stops at the first record whose severity is not an
/// integer or not one of the mapped classes.
pub fn severity_column(table: &RecordTable) -> Result<Vec<f64>, FieldError> {
    table
        .iter()
        .map(|(index, record)| -> Result<f64, FieldError> {
            let raw = record.severity.trim();
            let severity: i64 = raw.parse().map_err(|_| FieldError::InputFormat {
                index,
                column: column::SEVERITY,
                value: record.severity.clone(),
            })?;
            severity_pitch(severity).ok_or_else(|| FieldError::UnmappedCategory {
                index,
                column: column::SEVERITY,
                value: raw.to_string(),
            })
        })
        .collect()
}
