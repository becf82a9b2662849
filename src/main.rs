#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use dirsize::cli::Args;
use dirsize::render::write_report;
use dirsize::report::ConsoleReporter;
use dirsize::tree::{TreeBuilder, WalkdirTreeBuilder};
use std::io::{self, BufWriter, Write};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Exit status after Ctrl-C, as shells report SIGINT.
const EXIT_INTERRUPTED: i32 = 130;

enum Outcome {
    Completed,
    Interrupted,
}

fn main() {
    let args = Args::parse().validated();
    init_tracing(args.log_level());

    match run_app(&args) {
        Ok(Outcome::Completed) => {}
        Ok(Outcome::Interrupted) => std::process::exit(EXIT_INTERRUPTED),
        Err(e) => {
            eprintln!("dirsize: {e:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run_app(args: &Args) -> Result<Outcome> {
    let scan_config = args.scan_config();
    let select_config = args.select_config();
    let render_config = args.render_config();

    let cancel = Arc::clone(&scan_config.cancel);
    if let Err(err) = ctrlc::set_handler(move || cancel.store(true, Ordering::Relaxed)) {
        tracing::warn!("cannot install Ctrl-C handler: {err}");
    }

    tracing::debug!(
        dirs = args.dirs.len(),
        min_size = select_config.min_size,
        min_percent = select_config.min_percent,
        min_depth = select_config.min_depth,
        "starting"
    );

    let builder = WalkdirTreeBuilder;
    let mut reporter = ConsoleReporter::new(args.silent);
    let mut out = BufWriter::new(io::stdout().lock());

    for dir in &args.dirs {
        let tree = builder.build_tree(dir, &scan_config, &mut reporter);
        write_report(&mut out, &tree, &select_config, &render_config)
            .and_then(|()| out.flush())
            .with_context(|| format!("{}: failed to write report", dir.display()))?;

        if scan_config.cancel.load(Ordering::Relaxed) {
            eprintln!(
                "dirsize: interrupted, report for {} is partial",
                dir.display()
            );
            return Ok(Outcome::Interrupted);
        }
    }
    Ok(Outcome::Completed)
}
