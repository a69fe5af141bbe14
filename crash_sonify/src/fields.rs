// Record-independent columns.
//
// `constant_column` fills p1 and p4..p7; `sequence_column` produces the p2
// start times `0, step, 2*step, ...`. Start times are computed as
// `index * step` rather than by repeated addition so that long tables don't
// accumulate rounding drift.

pub fn constant_column(len: usize, value: f64) -> Vec<f64> {
    vec![value; len]
}

/// Start-time offsets for `len` records, `step` apart, starting at 0.
pub fn sequence_column(len: usize, step: f64) -> Vec<f64> {
    (0..len).map(|i| i as f64 * step).collect()
}
