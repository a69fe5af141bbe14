// Calibration for the record-to-parameter mapping.
//
// Every number the pipeline uses that is not part of a lookup table lives in
// `SonifyConfig`: the constant p-fields, the start-time step, the log scale
// divisors, the timestamp format, the trailer event and the orchestra
// settings. An empty `{}` config file is the same as no config file.
//
// Loaded from JSON with `SonifyConfig::load()` (or `from_json()`); fields
// missing from the file keep their defaults. `validate()` must pass before
// the config is used: a zero scale yields inf/NaN durations and a
// non-positive step yields colliding start times.

use crate::error::SonifyError;
use crate::temporal::DEFAULT_TIMESTAMP_FORMAT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The single record-independent event written before the record events. In
/// the default orchestra this is the global reverb instrument: it runs for
/// `duration` seconds with reverb time `gain`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailerEvent {
    pub instrument: u32,
    pub start: f64,
    pub duration: f64,
    pub gain: f64,
}

impl Default for TrailerEvent {
    fn default() -> Self {
        Self {
            instrument: 99,
            start: 0.0,
            duration: 50.0,
            gain: 0.2,
        }
    }
}

/// Settings for the generated orchestra (see orchestra.rs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestraConfig {
    /// Sound file the record instrument plays back.
    pub sample_path: String,
    /// Frequency (Hz) the filter sweeps down to.
    pub sweep_floor_hz: f64,
    /// The sweep lasts `p12 / sweep_divisor` seconds.
    pub sweep_divisor: f64,
}

impl Default for OrchestraConfig {
    fn default() -> Self {
        Self {
            sample_path: "sample9.wav".into(),
            sweep_floor_hz: 3000.0,
            sweep_divisor: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SonifyConfig {
    /// p1: instrument number of the record events.
    pub instrument: u32,
    /// p2 step between consecutive records, in seconds.
    pub start_step: f64,
    /// Divisor for the log-scaled p3 duration.
    pub duration_scale: f64,
    /// p4.
    pub amplitude: f64,
    /// p5.
    pub skip: f64,
    /// p6.
    pub attack: f64,
    /// p7.
    pub release: f64,
    /// Multiplier for the p11 weather cutoff.
    pub weather_scale: f64,
    /// Divisor for the log-scaled p12 sweep.
    pub distance_scale: f64,
    /// chrono format of `Start_Time` / `End_Time`.
    pub timestamp_format: String,
    pub trailer: TrailerEvent,
    pub orchestra: OrchestraConfig,
}

impl Default for SonifyConfig {
    fn default() -> Self {
        Self {
            instrument: 9,
            start_step: 0.25,
            duration_scale: 40.0,
            amplitude: 0.3,
            skip: 0.0,
            attack: 0.01,
            release: 0.1,
            weather_scale: 1.0,
            distance_scale: 10.0,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.into(),
            trailer: TrailerEvent::default(),
            orchestra: OrchestraConfig::default(),
        }
    }
}

impl SonifyConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path:?}"))?;
        Self::from_json(&data).with_context(|| format!("Failed to parse config file: {path:?}"))
    }

    /// Reject values that would break the score contract.
    pub fn validate(&self) -> std::result::Result<(), SonifyError> {
        if !(self.start_step.is_finite() && self.start_step > 0.0) {
            return Err(SonifyError::Config(format!(
                "start_step must be a positive number, got {}",
                self.start_step
            )));
        }
        for (name, value) in [
            ("duration_scale", self.duration_scale),
            ("distance_scale", self.distance_scale),
            ("weather_scale", self.weather_scale),
        ] {
            if !value.is_finite() || value == 0.0 {
                return Err(SonifyError::Config(format!(
                    "{name} must be finite and non-zero, got {value}"
                )));
            }
        }
        if self.timestamp_format.trim().is_empty() {
            return Err(SonifyError::Config("timestamp_format is empty".into()));
        }
        if self.instrument == self.trailer.instrument {
            return Err(SonifyError::Config(format!(
                "record and trailer events both use instrument {}",
                self.instrument
            )));
        }
        if !(self.orchestra.sweep_divisor.is_finite() && self.orchestra.sweep_divisor > 0.0) {
            return Err(SonifyError::Config(format!(
                "orchestra.sweep_divisor must be positive, got {}",
                self.orchestra.sweep_divisor
            )));
        }
        Ok(())
    }
}
