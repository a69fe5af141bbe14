// Elapsed crash time and the p3 event duration.
//
// Both timestamps are parsed with the configured chrono format (default
// `%m/%d/%Y %H:%M`, minute precision, no timezone). The event duration is
//
//     p3 = ln(end - start in seconds) / scale
//
// Elapsed time is fractional (millisecond resolution), so formats carrying
// `%.f` sub-second digits keep them. The logarithm only yields a usable
// duration when more than one second has elapsed. Reports whose end is at or before their start (or within the same
// second) are rejected with `NonPositiveDuration` instead of leaking zero,
// negative or NaN durations into the score.

use crate::error::FieldError;
use crate::record::{RecordTable, column};
use chrono::NaiveDateTime;

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M";
const MILLIS_PER_SECOND: f64 = 1000.0;

fn parse_timestamp(
    index: usize,
    column: &'static str,
    raw: &str,
    format: &str,
) -> Result<NaiveDateTime, FieldError> {
    NaiveDateTime::parse_from_str(raw.trim(), format).map_err(|_| FieldError::TimestampParse {
        index,
        column,
        value: raw.to_string(),
        format: format.to_string(),
    })
}

/// Signed `end - start` in seconds.
pub fn elapsed_seconds(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    (end - start).num_milliseconds() as f64 / MILLIS_PER_SECOND
}

/// Log-scaled duration. Only meaningful for `elapsed > 1`.
pub fn event_duration(elapsed: f64, scale: f64) -> f64 {
    elapsed.ln() / scale
}

/// Elapsed seconds for every record. Fails on the first unparseable
/// timestamp or on any record that lasted one second or less.
pub fn elapsed_column(table: &RecordTable, format: &str) -> Result<Vec<f64>, FieldError> {
    table
        .iter()
        .map(|(index, r)| -> Result<f64, FieldError> {
            let start = parse_timestamp(index, column::START_TIME, &r.start_time, format)?;
            let end = parse_timestamp(index, column::END_TIME, &r.end_time, format)?;
            let elapsed = elapsed_seconds(start, end);
            if elapsed <= 1.0 {
                return Err(FieldError::NonPositiveDuration {
                    index,
                    elapsed_seconds: elapsed,
                });
            }
            Ok(elapsed)
        })
        .collect()
}

/// p3 for every elapsed time.
pub fn duration_column(elapsed: &[f64], scale: f64) -> Vec<f64> {
    elapsed.iter().map(|e| event_duration(*e, scale)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SourceRecord;

    fn record(start: &str, end: &str) -> SourceRecord {
        SourceRecord {
            start_time: start.into(),
            end_time: end.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_one_hour_is_3600_seconds() {
        let table = RecordTable::from_records(vec![record("01/01/2021 00:00", "01/01/2021 01:00")]);
        let elapsed = elapsed_column(&table, DEFAULT_TIMESTAMP_FORMAT).unwrap();
        assert_eq!(elapsed, vec![3600.0]);
        let p3 = duration_column(&elapsed, 40.0);
        assert!((p3[0] - 3600f64.ln() / 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_elapsed_crosses_day_boundary() {
        let table = RecordTable::from_records(vec![record("12/31/2020 23:30", "01/01/2021 00:15")]);
        assert_eq!(
            elapsed_column(&table, DEFAULT_TIMESTAMP_FORMAT).unwrap(),
            vec![45.0 * 60.0]
        );
    }

    #[test]
    fn test_zero_elapsed_is_rejected() {
        let table = RecordTable::from_records(vec![
            record("01/01/2021 00:00", "01/01/2021 00:05"),
            record("01/01/2021 00:00", "01/01/2021 00:00"),
        ]);
        match elapsed_column(&table, DEFAULT_TIMESTAMP_FORMAT) {
            Err(FieldError::NonPositiveDuration {
                index,
                elapsed_seconds,
            }) => {
                assert_eq!(index, 1);
                assert_eq!(elapsed_seconds, 0.0);
            }
            other => panic!("expected NonPositiveDuration, got {other:?}"),
        }
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let table = RecordTable::from_records(vec![record("01/01/2021 02:00", "01/01/2021 01:00")]);
        match elapsed_column(&table, DEFAULT_TIMESTAMP_FORMAT) {
            Err(FieldError::NonPositiveDuration {
                index,
                elapsed_seconds,
            }) => {
                assert_eq!(index, 0);
                assert_eq!(elapsed_seconds, -3600.0);
            }
            other => panic!("expected NonPositiveDuration, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_timestamp_names_string() {
        let table = RecordTable::from_records(vec![record("2021-01-01 00:00:00", "01/01/2021 01:00")]);
        match elapsed_column(&table, DEFAULT_TIMESTAMP_FORMAT) {
            Err(FieldError::TimestampParse {
                index,
                column,
                value,
                ..
            }) => {
                assert_eq!(index, 0);
                assert_eq!(column, "Start_Time");
                assert_eq!(value, "2021-01-01 00:00:00");
            }
            other => panic!("expected TimestampParse, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_format() {
        let table = RecordTable::from_records(vec![record("2021-01-01 00:00:00", "2021-01-01 00:00:30")]);
        assert_eq!(
            elapsed_column(&table, "%Y-%m-%d %H:%M:%S").unwrap(),
            vec![30.0]
        );
    }

    const FRACTIONAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

    #[test]
    fn test_fractional_seconds_are_kept() {
        let table = RecordTable::from_records(vec![record(
            "2021-01-01 00:00:00.000",
            "2021-01-01 00:00:02.900",
        )]);
        let elapsed = elapsed_column(&table, FRACTIONAL_FORMAT).unwrap();
        assert!((elapsed[0] - 2.9).abs() < 1e-12, "{elapsed:?}");
        let p3 = duration_column(&elapsed, 40.0);
        assert!((p3[0] - 2.9f64.ln() / 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_one_and_a_half_seconds_is_accepted() {
        let table = RecordTable::from_records(vec![record(
            "2021-01-01 00:00:00.0",
            "2021-01-01 00:00:01.5",
        )]);
        assert_eq!(elapsed_column(&table, FRACTIONAL_FORMAT).unwrap(), vec![1.5]);
    }

    #[test]
    fn test_exactly_one_second_is_rejected() {
        let table = RecordTable::from_records(vec![record(
            "2021-01-01 00:00:00.000",
            "2021-01-01 00:00:01.000",
        )]);
        match elapsed_column(&table, FRACTIONAL_FORMAT) {
            Err(FieldError::NonPositiveDuration {
                index,
                elapsed_seconds,
            }) => {
                assert_eq!(index, 0);
                assert_eq!(elapsed_seconds, 1.0);
            }
            other => panic!("expected NonPositiveDuration, got {other:?}"),
        }
    }
}
