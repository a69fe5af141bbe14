// The source record table.
//
// One `SourceRecord` per collision report, in file order. Row order is the
// playback order of the score, so the table never reorders, adds or drops
// rows once loaded.
//
// Source attributes are kept as the raw strings found in the file. Turning
// them into numbers is the generators' job (geodesic.rs, temporal.rs,
// categorical.rs), which lets every parse failure report the record index and
// column it came from instead of failing somewhere inside the CSV decoder.
//
// Column names follow the US traffic accident export the tool was built
// around (`Start_Time`, `Start_Lat`, `Weather_Condition`, ...). Any other
// columns in the file are ignored.

use crate::error::TableError;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Column names as they appear in the source file, used in error messages.
pub mod column {
    pub const START_TIME: &str = "Start_Time";
    pub const END_TIME: &str = "End_Time";
    pub const START_LAT: &str = "Start_Lat";
    pub const START_LNG: &str = "Start_Lng";
    pub const END_LAT: &str = "End_Lat";
    pub const END_LNG: &str = "End_Lng";
    pub const WEATHER: &str = "Weather_Condition";
    pub const SUNRISE_SUNSET: &str = "Sunrise_Sunset";
    pub const SIDE: &str = "Side";
    pub const SEVERITY: &str = "Severity";
}

/// One collision report, exactly as read from the source table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    #[serde(rename = "Start_Time")]
    pub start_time: String,
    #[serde(rename = "End_Time")]
    pub end_time: String,
    #[serde(rename = "Start_Lat")]
    pub start_lat: String,
    #[serde(rename = "Start_Lng")]
    pub start_lng: String,
    #[serde(rename = "End_Lat")]
    pub end_lat: String,
    #[serde(rename = "End_Lng")]
    pub end_lng: String,
    /// Free-text weather category, e.g. `Light Rain / Windy`.
    #[serde(rename = "Weather_Condition")]
    pub weather: String,
    /// `D` for daytime, anything else is treated as night.
    #[serde(rename = "Sunrise_Sunset")]
    pub sunrise_sunset: String,
    /// `R` for the right-hand side of the road, anything else is left.
    #[serde(rename = "Side")]
    pub side: String,
    /// Severity class; only 2, 3 and 4 are mapped.
    #[serde(rename = "Severity")]
    pub severity: String,
}

/// Ordered, immutable collection of source records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTable {
    records: Vec<SourceRecord>,
}

impl RecordTable {
    pub fn from_records(records: Vec<SourceRecord>) -> Self {
        Self { records }
    }

    /// Decode a headered CSV stream.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let records = csv_reader
            .deserialize()
            .collect::<Result<Vec<SourceRecord>, csv::Error>>()?;
        Ok(Self { records })
    }

    /// Read and decode a CSV file.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(std::io::BufReader::new(file))?;
        info!("Loaded {} records from {:?}", table.len(), path);
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SourceRecord> {
        self.records.get(index)
    }

    /// Records in playback order.
    pub fn records(&self) -> &[SourceRecord] {
        &self.records
    }

    /// `(index, record)` pairs in playback order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &SourceRecord)> {
        self.records.iter().enumerate()
    }
}
