//! flpsplit - write one FL Studio project per playlist track.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use flpsplit::{
    io::{FileSink, read_project},
    prelude::*,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for flpsplit.
#[derive(Parser, Debug)]
#[command(name = "flpsplit")]
#[command(version)]
#[command(about = "Split an FL Studio project into one project per playlist track")]
#[command(long_about = "Reads an FL Studio project and writes one copy of it per playlist \n\
    track. Each copy keeps only the clips placed on that track.\n\n\
    Outputs are named after the input: song.flp becomes song-001.flp, song-002.flp, ...\n\n\
    EXAMPLES:\n    \
    flpsplit song.flp\n    \
    flpsplit song.flp -o stems/\n    \
    flpsplit song.flp --dry-run -v")]
struct Args {
    /// Project file to split
    input: PathBuf,

    /// Directory to write outputs to (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Filter tracks one after another instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Discover and filter tracks, but write nothing
    #[arg(long)]
    dry_run: bool,

    /// Verbose output (per chunk and per event progress)
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn default_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    fn options(&self) -> SplitOptions {
        SplitOptions {
            parallel: !self.sequential,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.default_filter()));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let project = read_project(&args.input)
        .with_context(|| format!("reading project {}", args.input.display()))?;

    match project.header() {
        Some(h) => info!(
            format = h.format_kind,
            channels = h.channel_count,
            time_base = h.time_base,
            chunks = project.chunks().len(),
            "parsed project"
        ),
        None => warn!("project has no header chunk"),
    }

    let mut sink = FileSink::new(&args.input);
    if let Some(dir) = &args.output_dir {
        sink = sink.with_dir(dir);
    }

    let splitter = Splitter::new(&project, args.options());
    let result = if args.dry_run {
        let dry = |track: TrackNumber, bytes: Vec<u8>| -> std::io::Result<()> {
            info!(%track, path = %sink.path_for(track).display(), bytes = bytes.len(), "would write");
            Ok(())
        };
        splitter.run(&dry)
    } else {
        splitter.run(&sink)
    };
    let report = result.context("splitting project")?;

    if report.outputs.is_empty() {
        warn!("the playlist is empty, nothing was written");
    }
    info!("finished, {} tracks", report.outputs.len());
    Ok(())
}
