use std::{
    io::{self, BufWriter, Write as _},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context as _;
use audio_pipeline::{
    clip::wav::WavClip,
    feeder::{FeederConfig, LogProgressSink, extract_mfcc},
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Prints one MFCC vector per frame of a WAV file, tab separated.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Input audio file
    input: PathBuf,
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(io::stderr(), "Fatal error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> anyhow::Result<()> {
    let clip = WavClip::from_file(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;

    let config = FeederConfig::default();
    let frames = extract_mfcc(Box::new(clip), &config, &mut LogProgressSink::default())
        .context("extracting MFCC features")?;

    let mut out = BufWriter::new(io::stdout().lock());
    frames.write_tsv(&mut out).context("writing coefficients")?;
    out.flush().context("writing coefficients")?;
    Ok(())
}
