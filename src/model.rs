// src/model.rs

use git2::Oid;
use std::fmt;
use std::path::PathBuf;

/// One line count measurement taken at a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub commit: Oid,
    /// Commit time, seconds since the epoch
    pub time: i64,
    /// Number of files that matched the extension
    pub files: usize,
    pub lines: u64,
}

/// A commit for which no sample could be taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCommit {
    pub commit: Oid,
    pub reason: String,
}

/// Where HEAD pointed before the run started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginalHead {
    Branch {
        /// Short name, e.g. `main`
        name: String,
        /// Full reference, e.g. `refs/heads/main`
        reference: String,
    },
    Detached(Oid),
}

impl OriginalHead {
    /// What the user has to pass to `git checkout` to get back here
    pub fn checkout_target(&self) -> String {
        match self {
            OriginalHead::Branch { name, .. } => name.clone(),
            OriginalHead::Detached(oid) => oid.to_string(),
        }
    }
}

impl fmt::Display for OriginalHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OriginalHead::Branch { name, .. } => write!(f, "branch {}", name),
            OriginalHead::Detached(oid) => write!(f, "detached commit {}", oid),
        }
    }
}

/// Everything the measurement loop produced
#[derive(Debug)]
pub struct AnalysisResult {
    /// Oldest commit first
    pub samples: Vec<Sample>,
    pub skipped: Vec<SkippedCommit>,
    pub total_commits: usize,
}

impl AnalysisResult {
    pub fn line_counts(&self) -> Vec<u64> {
        self.samples.iter().map(|s| s.lines).collect()
    }

    /// Commit times of the first and last sample
    pub fn time_span(&self) -> Option<(i64, i64)> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        Some((first.time, last.time))
    }
}

/// Outcome of a complete run
#[derive(Debug)]
pub struct Report {
    pub head: OriginalHead,
    pub analysis: AnalysisResult,
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(byte: u8) -> Oid {
        Oid::from_bytes(&[byte; 20]).unwrap()
    }

    #[test]
    fn checkout_target_uses_branch_name_or_hash() {
        let branch = OriginalHead::Branch {
            name: "main".to_string(),
            reference: "refs/heads/main".to_string(),
        };
        assert_eq!(branch.checkout_target(), "main");

        let detached = OriginalHead::Detached(oid(0xab));
        assert_eq!(detached.checkout_target(), "ab".repeat(20));
    }

    #[test]
    fn time_span_covers_first_and_last_sample() {
        let mut result = AnalysisResult {
            samples: Vec::new(),
            skipped: Vec::new(),
            total_commits: 0,
        };
        assert_eq!(result.time_span(), None);

        result.samples.push(Sample { commit: oid(1), time: 100, files: 1, lines: 10 });
        result.samples.push(Sample { commit: oid(2), time: 250, files: 2, lines: 15 });
        assert_eq!(result.time_span(), Some((100, 250)));
        assert_eq!(result.line_counts(), vec![10, 15]);
    }
}
