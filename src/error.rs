// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("{} is not inside a git repository", .0.display())]
    NotARepository(PathBuf),

    #[error("{} is a bare repository, there is no working tree to check out", .0.display())]
    BareRepository(PathBuf),

    #[error("Repository has no commits yet")]
    NoCommits,

    #[error("Please commit all your changes before running this tool ({} modified path(s))", .paths.len())]
    DirtyWorkingTree { paths: Vec<String> },

    #[error("Could not list commits: {0}")]
    CommitEnumeration(#[source] git2::Error),

    #[error("Could not check out {target}: {source}. Please run `git checkout {target}` manually")]
    Restore {
        target: String,
        #[source]
        source: git2::Error,
    },

    #[error("Chart rendering failed: {0}")]
    Render(String),

    #[error("Could not write chart: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// What the user has to do by hand when the repository could not be put back
    pub fn recovery_instructions(&self) -> Option<String> {
        match self {
            Error::Restore { target, source } => Some(format!(
                "Error checking out {target}: {source}\n\
                 The repository was left on a detached commit.\n\
                 Please run `git checkout {target}` manually"
            )),
            _ => None,
        }
    }
}

/// Why a commit produced no sample
#[derive(Error, Debug)]
pub enum SkipReason {
    #[error("checkout failed: {0}")]
    Checkout(#[source] Error),

    #[error("could not read commit: {0}")]
    Commit(#[source] Error),

    #[error("line count failed: {0}")]
    Count(#[from] CountError),
}

/// Failure to count lines at a single commit. These never abort a run.
#[derive(Error, Debug)]
pub enum CountError {
    #[error("folder {} does not exist at this commit", .0.display())]
    MissingFolder(PathBuf),

    #[error("walk failed: {0}")]
    Walk(#[from] ignore::Error),

    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not run count command: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("count command exited with {status}: {stderr}")]
    CommandFailed { status: std::process::ExitStatus, stderr: String },

    #[error("could not parse the total line from {0:?}")]
    UnparsableOutput(String),
}
