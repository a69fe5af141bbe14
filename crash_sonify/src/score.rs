// Score text output.
//
// The score is one trailer statement followed by one statement per record,
// in record order:
//
//     i99 0 50 0.2
//     i9 0 0.2047 0.3 0 0.01 0.1 0.2 0 4 14000 0.0693
//     i9 0.25 ...
//
// Fields are separated by single spaces. p1 is written in the engine's
// instrument statement form (`i` + number); every other field uses Rust's
// shortest round-trip float formatting, so whole numbers print without a
// decimal point and no precision is lost. No header, no record index, no
// trailing whitespace. The text ends with a newline.
//
// The serializer trusts the assembler: it only checks that the parameter
// table is complete, and a missing column is a structural error.

use crate::config::TrailerEvent;
use crate::error::SonifyError;
use crate::params::{Field, ParameterTable, ParameterVector};
use std::fmt::Write;
use tracing::info;

/// Prefix of an instrument statement.
pub const INSTRUMENT_STATEMENT: char = 'i';

/// `i<instrument> <start> <duration> <gain>`.
pub fn trailer_line(trailer: &TrailerEvent) -> String {
    format!(
        "{}{} {} {} {}",
        INSTRUMENT_STATEMENT, trailer.instrument, trailer.start, trailer.duration, trailer.gain
    )
}

/// One record statement: the twelve fields in p1..p12 order.
pub fn record_line(vector: &ParameterVector) -> String {
    let mut line = String::new();
    for field in Field::ALL {
        let value = vector.get(field);
        if field == Field::P1 {
            let _ = write!(line, "{INSTRUMENT_STATEMENT}{value}");
        } else {
            let _ = write!(line, " {value}");
        }
    }
    line
}

/// Render the full score text.
pub fn render_score(parameters: &ParameterTable, trailer: &TrailerEvent) -> Result<String, SonifyError> {
    let vectors = parameters.vectors()?;

    let mut score = trailer_line(trailer);
    score.push('\n');
    for vector in &vectors {
        score.push_str(&record_line(vector));
        score.push('\n');
    }

    info!("Rendered score with {} record events", vectors.len());
    Ok(score)
}
