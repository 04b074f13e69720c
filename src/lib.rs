// src/lib.rs

pub mod analyzer;
pub mod cli;
pub mod counter;
pub mod error;
pub mod model;
pub mod renderer;
pub mod repo;

use analyzer::AnalyzeOptions;
use cli::{Args, CounterKind};
use counter::{LineCounter, NativeCounter, ShellCounter};
use error::Result;
use model::Report;
use renderer::ChartOptions;
use repo::Workspace;
use tracing::{error, info, warn};

pub fn counter_for(args: &Args) -> Box<dyn LineCounter> {
    match args.counter {
        CounterKind::Native => Box::new(NativeCounter {
            respect_gitignore: args.respect_gitignore,
        }),
        CounterKind::Shell => {
            if args.respect_gitignore {
                warn!("--respect-gitignore has no effect with the shell counter");
            }
            Box::new(ShellCounter)
        }
    }
}

pub fn run(args: &Args) -> Result<Report> {
    run_with_counter(args, counter_for(args).as_ref())
}

/// Measures every commit, puts the repository back where it was and draws the chart.
///
/// Once the first checkout may have happened, restoring HEAD is always attempted,
/// and a failed restore wins over any other error.
pub fn run_with_counter(args: &Args, counter: &dyn LineCounter) -> Result<Report> {
    let folder = match &args.folder {
        Some(folder) => folder.clone(),
        None => std::env::current_dir()?,
    };
    let folder = folder.canonicalize()?;

    let workspace = Workspace::discover(&folder)?;
    info!(repository = %workspace.workdir().display(), folder = %folder.display(), ext = %args.ext, "starting");

    workspace.ensure_clean()?;
    let head = workspace.original_head()?;
    if matches!(head, model::OriginalHead::Detached(_)) {
        warn!(%head, "HEAD is not on a branch, it will be returned to the same commit");
    }
    info!(%head, "current position");

    let commits = analyzer::collect_commits(&workspace, args.scope)?;

    let opts = AnalyzeOptions {
        folder: &folder,
        ext: &args.ext,
        show_progress: !args.quiet,
    };
    let analysis = analyzer::analyze(&workspace, &commits, counter, &opts);

    if let Err(e) = workspace.restore(&head) {
        error!(error = %e, "could not return to {}", head);
        return Err(e);
    }
    info!(%head, "restored");

    if analysis.samples.is_empty() {
        warn!("no commit could be measured, the chart will be empty");
    }

    let chart = ChartOptions {
        output: &args.output,
        width: args.width,
        height: args.height,
        title: renderer::chart_title(&args.ext, &folder),
        font: args.font.as_deref(),
    };
    renderer::render_chart(&analysis.samples, &chart)?;
    info!(output = %args.output.display(), "chart saved");

    Ok(Report {
        head,
        analysis,
        output: args.output.clone(),
    })
}
