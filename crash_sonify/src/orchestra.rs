// Csound orchestra and unified .csd output.
//
// The score alone is not playable: the engine also needs the instrument
// definitions that give each p-field its meaning. `render_orchestra` writes
// the two instruments the score addresses:
//
// - The record instrument plays a sound file once per crash. p4/p6/p3/p7
//   shape a linear amplitude envelope, p10 is the playback speed (pitch),
//   p5 the skip into the file. A K35 low-pass filter sweeps exponentially
//   from p11 down to `sweep_floor_hz` over `p12 / sweep_divisor` seconds.
//   p9 pans (1 = left, 0 = right) and p8 scales the send into the global
//   reverb bus `garvbsig`.
// - The trailer instrument reverberates the bus with reverb time p4 and
//   clears it every control period.
//
// `render_csd` wraps orchestra and score in a single <CsoundSynthesizer>
// document so the engine can be pointed at one file. Running the engine is
// not this crate's concern.

use crate::config::SonifyConfig;
use std::fmt::Write;

/// Engine options used when none are given: real-time audio out.
pub const DEFAULT_CSD_OPTIONS: &str = "-odac";

/// Quote a string for use as a Csound string literal.
fn csound_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Orchestra text for the record and trailer instruments in `config`.
pub fn render_orchestra(config: &SonifyConfig) -> String {
    let orc = &config.orchestra;
    let mut out = String::new();

    let _ = writeln!(out, "nchnls    =         2");
    let _ = writeln!(out);
    let _ = writeln!(out, "garvbsig  init      0");
    let _ = writeln!(out);

    let _ = writeln!(out, "          instr {}", config.instrument);
    for (var, field) in [
        ("idur", "p3"),
        ("iamp", "p4"),
        ("iskiptime", "p5"),
        ("iattack", "p6"),
        ("irelease", "p7"),
        ("irvbgain", "p8"),
        ("ibalance", "p9"),
        ("ipitch", "p10"),
        ("ifreq1", "p11"),
        ("isweep", "p12"),
    ] {
        let _ = writeln!(out, "{var:<10}=         {field}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "kamp      linen     iamp, iattack, idur, irelease");
    let _ = writeln!(
        out,
        "asig      diskin    {}, ipitch, iskiptime, 1, 0, 32",
        csound_string(&orc.sample_path)
    );
    let _ = writeln!(
        out,
        "asig      =         K35_lpf(asig, expseg:a(ifreq1, isweep/{}, {}), 9, 0, 2)",
        orc.sweep_divisor, orc.sweep_floor_hz
    );
    let _ = writeln!(out, "arampsig  =         kamp * asig");
    let _ = writeln!(out, "          outs      arampsig * ibalance, arampsig * (1 - ibalance)");
    let _ = writeln!(out, "garvbsig  =         garvbsig + arampsig * irvbgain");
    let _ = writeln!(out, "          endin");
    let _ = writeln!(out);

    let _ = writeln!(out, "          instr {}", config.trailer.instrument);
    let _ = writeln!(out, "irvbtime  =         p4");
    let _ = writeln!(out, "asig      reverb    garvbsig, irvbtime");
    let _ = writeln!(out, "          outs      asig, asig");
    let _ = writeln!(out, "garvbsig  =         0");
    let _ = writeln!(out, "          endin");

    out
}

/// A complete .csd document. `options` defaults to `DEFAULT_CSD_OPTIONS`.
pub fn render_csd(orchestra: &str, score: &str, options: Option<&str>) -> String {
    let options = options.unwrap_or(DEFAULT_CSD_OPTIONS);
    let mut csd = String::new();
    let _ = writeln!(csd, "<CsoundSynthesizer>");
    let _ = writeln!(csd, "<CsOptions>");
    let _ = writeln!(csd, "{}", options.trim());
    let _ = writeln!(csd, "</CsOptions>");
    let _ = writeln!(csd, "<CsInstruments>");
    let _ = write!(csd, "{}", ensure_newline(orchestra));
    let _ = writeln!(csd, "</CsInstruments>");
    let _ = writeln!(csd, "<CsScore>");
    let _ = write!(csd, "{}", ensure_newline(score));
    let _ = writeln!(csd, "</CsScore>");
    let _ = writeln!(csd, "</CsoundSynthesizer>");
    csd
}

fn ensure_newline(text: &str) -> String {
    if text.is_empty() || text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{text}\n")
    }
}
