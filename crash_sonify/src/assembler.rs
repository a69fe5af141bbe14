// Assembles the twelve parameter columns for a record table.
//
// The config is validated before anything runs. Generators then run in a
// fixed order:
//   1. constants and start-time sequence (p1, p2, p4..p7)
//   2. temporal duration (p3)
//   3. categorical lookups (p8..p11)
//   4. geodesic sweep (p12)
//
// Each generator is a pure function from the source table to one column; the
// assembler is the only thing that writes into the `ParameterTable`. A failing
// generator aborts the whole run with the p-field it was computing attached,
// and the partially filled table is dropped, so callers either get every
// column for every record or nothing.
//
// The raw elapsed seconds and distances behind p3 and p12 are kept as
// `DerivedColumns` for inspection (the CLI's `--derived` report).

use crate::categorical;
use crate::config::SonifyConfig;
use crate::error::SonifyError;
use crate::fields::{constant_column, sequence_column};
use crate::geodesic;
use crate::params::{Field, ParameterTable, ParameterVector};
use crate::record::RecordTable;
use crate::temporal;
use serde::Serialize;
use tracing::{debug, info};

/// Intermediate per-record values behind the log-scaled fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedColumns {
    /// `End_Time - Start_Time` per record (input to p3).
    pub elapsed_seconds: Vec<f64>,
    /// Haversine distance per record (input to p12).
    pub distance_km: Vec<f64>,
}

/// The finished parameter table plus its derived intermediates.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub parameters: ParameterTable,
    pub derived: DerivedColumns,
}

/// One row of the derived report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRecord {
    pub index: usize,
    pub elapsed_seconds: f64,
    pub distance_km: f64,
    pub parameters: ParameterVector,
}

impl Assembly {
    /// Per-record view joining the derived columns with each parameter
    /// vector.
    pub fn derived_records(&self) -> Result<Vec<DerivedRecord>, SonifyError> {
        let vectors = self.parameters.vectors()?;
        Ok(vectors
            .into_iter()
            .zip(&self.derived.elapsed_seconds)
            .zip(&self.derived.distance_km)
            .enumerate()
            .map(|(index, ((parameters, elapsed), distance))| DerivedRecord {
                index,
                elapsed_seconds: *elapsed,
                distance_km: *distance,
                parameters,
            })
            .collect())
    }
}

/// Compute every p-field for every record in `table`. The config is
/// validated first.
pub fn assemble(table: &RecordTable, config: &SonifyConfig) -> Result<Assembly, SonifyError> {
    config.validate()?;
    let len = table.len();
    let mut parameters = ParameterTable::new(len);
    debug!("Assembling parameters for {len} records");

    parameters.insert(Field::P1, constant_column(len, f64::from(config.instrument)))?;
    parameters.insert(Field::P2, sequence_column(len, config.start_step))?;
    parameters.insert(Field::P4, constant_column(len, config.amplitude))?;
    parameters.insert(Field::P5, constant_column(len, config.skip))?;
    parameters.insert(Field::P6, constant_column(len, config.attack))?;
    parameters.insert(Field::P7, constant_column(len, config.release))?;
    debug!("Constant and sequence fields done");

    let elapsed_seconds = temporal::elapsed_column(table, &config.timestamp_format)
        .map_err(SonifyError::field(Field::P3))?;
    parameters.insert(
        Field::P3,
        temporal::duration_column(&elapsed_seconds, config.duration_scale),
    )?;
    debug!("Duration field done");

    parameters.insert(Field::P8, categorical::daylight_column(table))?;
    parameters.insert(Field::P9, categorical::side_column(table))?;
    parameters.insert(
        Field::P10,
        categorical::severity_column(table).map_err(SonifyError::field(Field::P10))?,
    )?;
    parameters.insert(
        Field::P11,
        categorical::weather_column(table, config.weather_scale),
    )?;
    debug!("Categorical fields done");

    let distance_km = geodesic::distance_column(table).map_err(SonifyError::field(Field::P12))?;
    parameters.insert(
        Field::P12,
        geodesic::sweep_column(&distance_km, config.distance_scale),
    )?;
    debug!("Sweep field done");

    if let Some(&field) = parameters.missing_fields().first() {
        return Err(SonifyError::MissingField { field });
    }

    info!("Assembled {len} parameter vectors");
    Ok(Assembly {
        parameters,
        derived: DerivedColumns {
            elapsed_seconds,
            distance_km,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;
    use crate::record::SourceRecord;

    fn record(severity: &str) -> SourceRecord {
        SourceRecord {
            start_time: "01/01/2021 00:00".into(),
            end_time: "01/01/2021 01:00".into(),
            start_lat: "0".into(),
            start_lng: "0".into(),
            end_lat: "0".into(),
            end_lng: "1".into(),
            weather: "Fog".into(),
            sunrise_sunset: "N".into(),
            side: "R".into(),
            severity: severity.into(),
        }
    }

    #[test]
    fn test_assemble_fills_every_field() {
        let table = RecordTable::from_records(vec![record("2"), record("3"), record("4")]);
        let assembly = assemble(&table, &SonifyConfig::default()).unwrap();
        assert!(assembly.parameters.is_complete());

        let vectors = assembly.parameters.vectors().unwrap();
        assert_eq!(vectors.len(), 3);
        let starts: Vec<f64> = vectors.iter().map(|v| v.get(Field::P2)).collect();
        assert_eq!(starts, vec![0.0, 0.25, 0.5]);
        let pitches: Vec<f64> = vectors.iter().map(|v| v.get(Field::P10)).collect();
        assert_eq!(pitches, vec![3.0, 4.0, 5.0]);
        for v in &vectors {
            assert_eq!(v.get(Field::P1), 9.0);
            assert_eq!(v.get(Field::P4), 0.3);
            assert_eq!(v.get(Field::P5), 0.0);
            assert_eq!(v.get(Field::P6), 0.01);
            assert_eq!(v.get(Field::P7), 0.1);
            assert_eq!(v.get(Field::P8), 0.2);
            assert_eq!(v.get(Field::P9), 0.0);
            assert_eq!(v.get(Field::P11), 12000.0);
            assert!((v.get(Field::P3) - 3600f64.ln() / 40.0).abs() < 1e-12);
        }
        assert_eq!(assembly.derived.elapsed_seconds, vec![3600.0; 3]);
        assert!((assembly.derived.distance_km[0] - 111.23).abs() < 0.01);
    }

    #[test]
    fn test_severity_failure_names_p10() {
        let table = RecordTable::from_records(vec![record("2"), record("5")]);
        match assemble(&table, &SonifyConfig::default()) {
            Err(SonifyError::Field {
                field: Field::P10,
                source: FieldError::UnmappedCategory { index: 1, .. },
            }) => {}
            other => panic!("expected p10 failure, got {other:?}"),
        }
    }

    #[test]
    fn test_timestamp_failure_names_p3() {
        let mut bad = record("2");
        bad.end_time = "not a time".into();
        let table = RecordTable::from_records(vec![bad]);
        assert!(matches!(
            assemble(&table, &SonifyConfig::default()),
            Err(SonifyError::Field {
                field: Field::P3,
                source: FieldError::TimestampParse { index: 0, .. }
            })
        ));
    }

    #[test]
    fn test_coordinate_failure_names_p12() {
        let mut bad = record("2");
        bad.start_lng = "west".into();
        let table = RecordTable::from_records(vec![record("3"), bad]);
        assert!(matches!(
            assemble(&table, &SonifyConfig::default()),
            Err(SonifyError::Field {
                field: Field::P12,
                source: FieldError::InputFormat { index: 1, .. }
            })
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected_before_any_field() {
        let table = RecordTable::from_records(vec![record("2"), record("3")]);
        let config = SonifyConfig {
            start_step: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            assemble(&table, &config),
            Err(SonifyError::Config(_))
        ));
    }

    #[test]
    fn test_empty_table_assembles() {
        let assembly = assemble(&RecordTable::default(), &SonifyConfig::default()).unwrap();
        assert!(assembly.parameters.is_empty());
        assert!(assembly.parameters.is_complete());
        assert!(assembly.derived_records().unwrap().is_empty());
    }

    #[test]
    fn test_derived_records_join_by_index() {
        let table = RecordTable::from_records(vec![record("2"), record("4")]);
        let assembly = assemble(&table, &SonifyConfig::default()).unwrap();
        let rows = assembly.derived_records().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].index, 1);
        assert_eq!(rows[1].elapsed_seconds, 3600.0);
        assert_eq!(rows[1].parameters.get(Field::P10), 5.0);
    }
}
