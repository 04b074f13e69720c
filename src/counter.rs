// src/counter.rs

use crate::error::CountError;
use ignore::WalkBuilder;
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Aggregate over all matching files in a folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineCount {
    pub files: usize,
    pub lines: u64,
}

/// Counts the lines of every file below `folder` whose name ends with `ext`.
///
/// `ext` is expected in its dotted form (see [`crate::cli::parse_extension`]).
pub trait LineCounter {
    fn count(&self, folder: &Path, ext: &str) -> Result<LineCount, CountError>;
}

/// Recursive in-process walk. Lines are counted like `wc -l`, i.e. newline bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCounter {
    pub respect_gitignore: bool,
}

impl LineCounter for NativeCounter {
    fn count(&self, folder: &Path, ext: &str) -> Result<LineCount, CountError> {
        if !folder.is_dir() {
            return Err(CountError::MissingFolder(folder.to_path_buf()));
        }

        let walker = WalkBuilder::new(folder)
            .hidden(false)
            .parents(self.respect_gitignore)
            .ignore(false)
            .git_ignore(self.respect_gitignore)
            .git_global(false)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .filter_entry(|entry| entry.file_name() != ".git")
            .build();

        let mut total = LineCount::default();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().map_or(false, |t| t.is_file()) {
                continue;
            }
            // Byte-wise, so names that are not valid UTF-8 still match like `find -name`
            if !entry.file_name().as_encoded_bytes().ends_with(ext.as_bytes()) {
                continue;
            }

            let content = fs::read(entry.path()).map_err(|source| CountError::Read {
                path: entry.path().to_path_buf(),
                source,
            })?;
            total.files += 1;
            total.lines += count_newlines(&content);
        }

        Ok(total)
    }
}

pub fn count_newlines(content: &[u8]) -> u64 {
    memchr::memchr_iter(b'\n', content).count() as u64
}

/// The original pipeline: `find | xargs wc -l | sort -nr`.
///
/// Needs a POSIX `sh` with `find`, `xargs`, `wc` and `sort` on `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellCounter;

const SHELL_PIPELINE: &str = r#"find "$1" -type f -name "*$2" -print0 | xargs -0 wc -l | sort -nr"#;

impl LineCounter for ShellCounter {
    fn count(&self, folder: &Path, ext: &str) -> Result<LineCount, CountError> {
        if !folder.is_dir() {
            return Err(CountError::MissingFolder(folder.to_path_buf()));
        }

        // Folder and extension travel as positional parameters, never spliced into the script.
        let output = Command::new("sh")
            .arg("-c")
            .arg(SHELL_PIPELINE)
            .arg("sh")
            .arg(folder)
            .arg(ext)
            .env("LC_ALL", "C")
            .output()
            .map_err(CountError::Spawn)?;

        if !output.status.success() {
            return Err(CountError::CommandFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(output = %stdout, "wc output");
        let lines = parse_wc_total(&stdout)
            .ok_or_else(|| CountError::UnparsableOutput(stdout.chars().take(200).collect()))?;
        let files = stdout
            .lines()
            .filter(|line| line.split_whitespace().nth(1).map_or(false, |f| f != "total"))
            .count();

        Ok(LineCount { files, lines })
    }
}

/// Extracts the aggregate from `wc -l` output.
///
/// `xargs` may split a long file list over several `wc` runs, each printing its own
/// `total` line, so all of them are summed. With a single file there is no total line
/// and that file's count is the aggregate. Anything else is unparsable.
pub fn parse_wc_total(output: &str) -> Option<u64> {
    let rows: Vec<Vec<&str>> = output
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>())
        .filter(|fields| !fields.is_empty())
        .collect();

    let totals: Vec<&Vec<&str>> = rows
        .iter()
        .filter(|fields| fields.len() == 2 && fields[1] == "total")
        .collect();

    if !totals.is_empty() {
        let mut sum = 0u64;
        for fields in totals {
            sum += fields[0].parse::<u64>().ok()?;
        }
        return Some(sum);
    }

    match rows.as_slice() {
        [fields] if fields.len() >= 2 => fields[0].parse().ok(),
        _ => None,
    }
}
