// Crash Sonification
//
// Turns a table of traffic collision reports into a Csound score. Every
// record becomes one note event whose twelve p-fields encode an attribute of
// the crash: how long it lasted (duration), how severe it was (pitch), which
// side of the road it happened on (pan), the weather (filter cutoff), how far
// the incident stretched (filter sweep) and whether it happened at night
// (reverb send). A single trailer event closes out the shared reverb bus.
//
// Architecture:
// - record.rs: Source table (CSV in, raw string attributes out)
// - params.rs: The p1..p12 field set, parameter vectors and the column table
// - categorical.rs: Lookup tables for weather, daylight, side and severity
// - geodesic.rs: Haversine distance and the log-scaled sweep duration
// - temporal.rs: Timestamp parsing and the log-scaled event duration
// - fields.rs: Constant and start-time sequence columns
// - assembler.rs: Runs every generator in dependency order, all-or-nothing
// - score.rs: Score text serialization (trailer + one line per record)
// - orchestra.rs: Matching orchestra text and the unified .csd document
// - config.rs: Calibration constants, loadable from JSON
// - error.rs: Error taxonomy shared by all of the above
//
// The pipeline is deterministic: the same table and config always produce
// byte-identical score text.

pub mod assembler;
pub mod categorical;
pub mod config;
pub mod error;
pub mod fields;
pub mod geodesic;
pub mod orchestra;
pub mod params;
pub mod record;
pub mod score;
pub mod temporal;

pub use assembler::{Assembly, DerivedColumns, assemble};
pub use config::SonifyConfig;
pub use error::{FieldError, SonifyError, TableError};
pub use params::{Field, ParameterTable, ParameterVector};
pub use record::{RecordTable, SourceRecord};
pub use score::render_score;

/// Load-independent entry point: assemble every parameter for `table` and
/// render the score text. Nothing is returned unless every record maps
/// cleanly.
pub fn sonify(table: &RecordTable, config: &SonifyConfig) -> Result<String, SonifyError> {
    let assembly = assemble(table, config)?;
    render_score(&assembly.parameters, &config.trailer)
}

/// `sonify` for a CSV file on disk.
pub fn sonify_file(path: &std::path::Path, config: &SonifyConfig) -> Result<String, SonifyError> {
    let table = RecordTable::load(path).map_err(SonifyError::table(path))?;
    sonify(&table, config)
}
