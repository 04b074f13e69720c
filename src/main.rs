// src/main.rs

use anyhow::Context;
use clap::Parser;
use loc_history::cli::Args;
use loc_history::model::Report;
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let start_time = Instant::now();

    let report = match loc_history::run(&args) {
        Ok(report) => report,
        Err(e) => {
            if let Some(instructions) = e.recovery_instructions() {
                eprintln!("{}", instructions);
            }
            return Err(e).context("measuring line counts over history");
        }
    };

    print_summary(&report);
    println!("Total time: {:.2?}", start_time.elapsed());
    Ok(())
}

fn print_summary(report: &Report) {
    let analysis = &report.analysis;
    println!(
        "Measured {} of {} commits ({} skipped).",
        analysis.samples.len(),
        analysis.total_commits,
        analysis.skipped.len()
    );
    for skipped in &analysis.skipped {
        println!("  skipped {}: {}", skipped.commit, skipped.reason);
    }

    if let (Some(first), Some(last)) = (analysis.samples.first(), analysis.samples.last()) {
        println!("Line count went from {} to {}.", first.lines, last.lines);
    }
    if let Some((start, end)) = analysis.time_span() {
        let fmt = |ts: i64| {
            chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.to_rfc2822())
                .unwrap_or_else(|| ts.to_string())
        };
        println!("Measured history spans from {} to {}.", fmt(start), fmt(end));
    }

    println!("Back on {}.", report.head);
    println!("Plot saved to {}", report.output.display());
}
