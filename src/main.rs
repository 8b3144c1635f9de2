use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mig_grinder::record::{enumerate_inputs, speed_label, InputFile, Record};
use mig_grinder::report::{summarize, AnalysisConfig, ReportBuilder};

#[derive(Parser, Debug)]
#[command(name = "mig-grinder")]
#[command(about = "Analyze MIG message-throughput benchmark logs into an HTML chart report")]
struct Args {
    /// Input files or directories with MIG data. Directories are scanned
    /// for .json files; a test-<number>.json name doubles as a speed label.
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// File to write the report to (default stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report title
    #[arg(short, long, default_value = "Unknown")]
    title: String,

    /// Additional marker for the matching input (repeatable)
    #[arg(short = 'd', long = "detail")]
    details: Vec<String>,

    /// Ignore all data before this point index (inclusive)
    #[arg(long)]
    from_point: Option<usize>,

    /// Ignore all data after this point index (inclusive)
    #[arg(long)]
    to_point: Option<usize>,

    /// Ignore the fits section embedded in input files
    #[arg(long)]
    no_fit: bool,

    /// Also build a receiving-rate vs sending-rate chart
    #[arg(long)]
    rates: bool,

    /// Print a JSON summary per input instead of rendering charts
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let inputs = enumerate_inputs(&args.inputs)?;

    if args.summary {
        return run_summary(&args, &inputs);
    }

    let mut builder = ReportBuilder::new(&args.title, AnalysisConfig::default(), args.rates);
    for (index, input) in inputs.iter().enumerate() {
        let record = load_record(&args, input)?;
        let label = input_label(index, &args.details, input.speed);
        info!("analyzing {}", input.path.display());
        builder.add_record(&record, &label)?;
    }

    let html = builder.finish().render_html()?;
    write_output(args.output.as_deref(), &html)
}

/// Summary mode: one `{"send", "recv", "lost"}` JSON line per input.
fn run_summary(args: &Args, inputs: &[InputFile]) -> Result<()> {
    for input in inputs {
        let record = load_record(args, input)?;
        let summary = summarize(&record)
            .with_context(|| format!("cannot summarize {}", input.path.display()))?;
        println!("{}", serde_json::to_string(&summary)?);
    }
    Ok(())
}

fn load_record(args: &Args, input: &InputFile) -> Result<Record> {
    let mut record = Record::load(&input.path)
        .with_context(|| format!("failed to load {}", input.path.display()))?;
    if args.no_fit {
        record.fits.clear();
    }
    record.slice(args.from_point, args.to_point);
    Ok(record)
}

/// Label for input `index`: detail override, else inferred speed, else
/// empty.
fn input_label(index: usize, details: &[String], speed: Option<u64>) -> String {
    if let Some(detail) = details.get(index) {
        if !detail.is_empty() {
            return detail.clone();
        }
    }
    speed.map(speed_label).unwrap_or_default()
}

fn write_output(output: Option<&std::path::Path>, html: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, html)
            .with_context(|| format!("cannot write {}", path.display())),
        None => {
            io::stdout().write_all(html.as_bytes())?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_label_precedence() {
        let details = vec!["warm cache".to_string(), String::new()];
        assert_eq!(input_label(0, &details, Some(9_000)), "warm cache");
        // Empty detail falls back to the inferred speed.
        assert_eq!(input_label(1, &details, Some(9_000)), "9k");
        // Out of details: speed, then empty.
        assert_eq!(input_label(2, &details, Some(12_500)), "12.5k");
        assert_eq!(input_label(2, &details, None), "");
    }
}
