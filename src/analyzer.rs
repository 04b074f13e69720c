// src/analyzer.rs

use crate::cli::Scope;
use crate::counter::LineCounter;
use crate::error::{Result, SkipReason};
use crate::model::*;
use crate::repo::Workspace;
use git2::Oid;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{info, warn};

pub struct AnalyzeOptions<'a> {
    pub folder: &'a Path,
    pub ext: &'a str,
    pub show_progress: bool,
}

/// Lists the commits to measure. Nothing has been checked out yet when this fails.
pub fn collect_commits(workspace: &Workspace, scope: Scope) -> Result<Vec<Oid>> {
    let commits = workspace.commits(scope)?;
    info!(commits = commits.len(), ?scope, "collected commits");
    Ok(commits)
}

/// Checks out every commit in turn and counts lines there.
///
/// A commit that cannot be checked out or counted is logged and skipped, it never
/// ends the run. The caller owns putting HEAD back afterwards.
pub fn analyze(
    workspace: &Workspace,
    commits: &[Oid],
    counter: &dyn LineCounter,
    opts: &AnalyzeOptions<'_>,
) -> AnalysisResult {
    let bar = if opts.show_progress {
        ProgressBar::new(commits.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message("Measuring commits");

    let mut samples = Vec::with_capacity(commits.len());
    let mut skipped = Vec::new();

    for &oid in commits {
        match measure_commit(workspace, oid, counter, opts) {
            Ok(sample) => samples.push(sample),
            Err(err) => {
                let reason = err.to_string();
                bar.suspend(|| warn!(commit = %oid, %reason, "skipping commit"));
                skipped.push(SkippedCommit { commit: oid, reason });
            }
        }
        bar.inc(1);
    }
    bar.finish_with_message("Measurement complete");

    AnalysisResult {
        samples,
        skipped,
        total_commits: commits.len(),
    }
}

fn measure_commit(
    workspace: &Workspace,
    oid: Oid,
    counter: &dyn LineCounter,
    opts: &AnalyzeOptions<'_>,
) -> std::result::Result<Sample, SkipReason> {
    workspace.checkout(oid).map_err(SkipReason::Checkout)?;
    let time = workspace.commit_time(oid).map_err(SkipReason::Commit)?;
    let count = counter.count(opts.folder, opts.ext)?;

    Ok(Sample {
        commit: oid,
        time,
        files: count.files,
        lines: count.lines,
    })
}
