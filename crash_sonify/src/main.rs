// Crash Sonification: CLI entry point.
//
// Reads a collision table, maps every record onto a score event and writes
// the score (stdout by default). Optionally also writes the matching
// orchestra, a unified .csd document, and a JSON report of the derived
// per-record values.
//
// Every artifact is rendered in memory before anything is written, so a bad
// record leaves no partial output behind.
//
// Usage:
//   sonify <INPUT_CSV> [--config cfg.json] [--output score.sco]
//     [--orchestra crashes.orc] [--csd crashes.csd] [--csd-options "-odac"]
//     [--derived derived.json]
//
// Log verbosity is controlled with the LOG_LEVEL environment variable
// (default: info). Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use crash_sonify::assembler::assemble;
use crash_sonify::config::SonifyConfig;
use crash_sonify::orchestra::{render_csd, render_orchestra};
use crash_sonify::record::RecordTable;
use crash_sonify::score::render_score;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[clap(about = "Turn a traffic collision table into a Csound score")]
struct CliArgs {
    /// CSV file of collision records.
    pub input: PathBuf,

    /// JSON calibration file. Missing keys keep their defaults.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Where to write the score. Defaults to stdout.
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the matching orchestra to this path.
    #[clap(long)]
    pub orchestra: Option<PathBuf>,

    /// Also write a unified .csd document (orchestra + score) to this path.
    #[clap(long)]
    pub csd: Option<PathBuf>,

    /// Engine options placed in the .csd <CsOptions> block.
    #[clap(long, allow_hyphen_values = true, default_value = crash_sonify::orchestra::DEFAULT_CSD_OPTIONS)]
    pub csd_options: String,

    /// Also write per-record elapsed time, distance and p-fields as JSON.
    #[clap(long)]
    pub derived: Option<PathBuf>,
}

fn main() {
    let cli_args = CliArgs::parse();

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        );
    if let Err(e) = subscriber.try_init() {
        eprintln!("Failed to initialize logging: {e}");
    }

    if let Err(e) = run(&cli_args) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading config from {path:?}");
            SonifyConfig::load(path)?
        }
        None => SonifyConfig::default(),
    };
    config.validate()?;

    let table = RecordTable::load(&args.input)
        .with_context(|| format!("Failed to load records from {:?}", args.input))?;
    let assembly = assemble(&table, &config)?;
    let score = render_score(&assembly.parameters, &config.trailer)?;

    let orchestra = (args.orchestra.is_some() || args.csd.is_some()).then(|| render_orchestra(&config));
    let csd = match (&args.csd, &orchestra) {
        (Some(_), Some(orc)) => Some(render_csd(orc, &score, Some(&args.csd_options))),
        _ => None,
    };
    let derived = match &args.derived {
        Some(_) => Some(serde_json::to_string_pretty(&assembly.derived_records()?)?),
        None => None,
    };

    if let (Some(path), Some(orc)) = (&args.orchestra, &orchestra) {
        write_artifact(path, orc, "orchestra")?;
    }
    if let (Some(path), Some(text)) = (&args.csd, &csd) {
        write_artifact(path, text, "csd")?;
    }
    if let (Some(path), Some(text)) = (&args.derived, &derived) {
        write_artifact(path, text, "derived report")?;
    }
    match &args.output {
        Some(path) => write_artifact(path, &score, "score")?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(score.as_bytes())
                .context("Failed to write score to stdout")?;
            stdout.flush()?;
        }
    }

    info!("Done: {} record events", table.len());
    Ok(())
}

fn write_artifact(path: &Path, contents: &str, what: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("Failed to write {what} to {path:?}"))?;
    info!("Wrote {what} to {path:?}");
    Ok(())
}
