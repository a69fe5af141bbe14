// Great-circle distance and the p12 filter sweep.
//
// Distance uses the haversine formula on a spherical earth of radius
// `EARTH_RADIUS_KM`. The sweep duration is then
//
//     p12 = ln((distance_km + DISTANCE_OFFSET_KM) * 1000) / scale
//
// The offset keeps the logarithm defined (and positive) for crashes whose
// start and end coordinates coincide, which is common in the source data.
// Radius, offset and the metre conversion are calibration constants: changing
// them changes every score ever produced.

use crate::error::FieldError;
use crate::record::{RecordTable, column};

pub const EARTH_RADIUS_KM: f64 = 6373.0;
pub const DISTANCE_OFFSET_KM: f64 = 0.002;
const METRES_PER_KM: f64 = 1000.0;

/// A point in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Haversine great-circle distance in kilometres.
pub fn haversine_km(start: LatLon, end: LatLon) -> f64 {
    let lat1 = start.lat.to_radians();
    let lat2 = end.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (end.lon - start.lon).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Log-scaled sweep duration for a distance in kilometres.
pub fn sweep_duration(distance_km: f64, scale: f64) -> f64 {
    ((distance_km + DISTANCE_OFFSET_KM) * METRES_PER_KM).ln() / scale
}

fn parse_coordinate(index: usize, column: &'static str, raw: &str) -> Result<f64, FieldError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FieldError::InputFormat {
            index,
            column,
            value: raw.to_string(),
        })
}

/// Distance in kilometres for every record.
pub fn distance_column(table: &RecordTable) -> Result<Vec<f64>, FieldError> {
    table
        .iter()
        .map(|(index, r)| -> Result<f64, FieldError> {
            let start = LatLon::new(
                parse_coordinate(index, column::START_LAT, &r.start_lat)?,
                parse_coordinate(index, column::START_LNG, &r.start_lng)?,
            );
            let end = LatLon::new(
                parse_coordinate(index, column::END_LAT, &r.end_lat)?,
                parse_coordinate(index, column::END_LNG, &r.end_lng)?,
            );
            Ok(haversine_km(start, end))
        })
        .collect()
}

/// p12 for every distance in `distances_km`.
pub fn sweep_column(distances_km: &[f64], scale: f64) -> Vec<f64> {
    distances_km
        .iter()
        .map(|d| sweep_duration(*d, scale))
        .collect()
}
