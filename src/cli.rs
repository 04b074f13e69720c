// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT: &str = "lines_of_code_over_commit_time.png";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Chart the line count of a file type over a repository's commits", long_about = None)]
pub struct Args {
    /// Folder to scan at every commit (defaults to the current directory)
    #[arg(long)]
    pub folder: Option<PathBuf>,

    /// File extension to count, with or without the leading dot
    #[arg(long, default_value = ".js", value_parser = parse_extension)]
    pub ext: String,

    /// Where to write the PNG chart
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Width of the chart in pixels
    #[arg(long, default_value_t = 960)]
    pub width: u32,

    /// Height of the chart in pixels
    #[arg(long, default_value_t = 384)]
    pub height: u32,

    /// Which commits to measure
    #[arg(long, value_enum, default_value_t = Scope::All)]
    pub scope: Scope,

    /// How lines are counted at each commit
    #[arg(long, value_enum, default_value_t = CounterKind::Native)]
    pub counter: CounterKind,

    /// Skip files ignored by .gitignore (native counter only)
    #[arg(long)]
    pub respect_gitignore: bool,

    /// TrueType font used for the chart title and labels
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Do not show a progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every commit reachable from any reference, like `git rev-list --all`
    All,
    /// Only the history of the checked out commit
    Head,
}

#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum CounterKind {
    /// Walk the folder and count newlines in-process
    Native,
    /// Run `find | xargs wc -l | sort -nr` and read its total
    Shell,
}

/// Accepts `js` as well as `.js`, always returning the dotted form.
pub fn parse_extension(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return Err("extension must not be empty".to_string());
    }
    if trimmed.contains('/') {
        return Err(format!("extension {:?} must not contain a path separator", raw));
    }
    Ok(format!(".{}", trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_normalized() {
        assert_eq!(parse_extension("js").unwrap(), ".js");
        assert_eq!(parse_extension(".js").unwrap(), ".js");
        assert_eq!(parse_extension(" .tsx ").unwrap(), ".tsx");
        assert_eq!(parse_extension("d.ts").unwrap(), ".d.ts");
    }

    #[test]
    fn bad_extensions_are_rejected() {
        assert!(parse_extension("").is_err());
        assert!(parse_extension(".").is_err());
        assert!(parse_extension("a/b").is_err());
    }

    #[test]
    fn defaults_match_the_original_tool() {
        let args = Args::try_parse_from(["loc-history"]).unwrap();
        assert_eq!(args.folder, None);
        assert_eq!(args.ext, ".js");
        assert_eq!(args.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!((args.width, args.height), (960, 384));
        assert_eq!(args.scope, Scope::All);
        assert_eq!(args.counter, CounterKind::Native);
        assert!(!args.respect_gitignore);
    }

    #[test]
    fn flags_are_parsed() {
        let args = Args::try_parse_from([
            "loc-history",
            "--folder",
            "src",
            "--ext",
            "rs",
            "--counter",
            "shell",
            "--scope",
            "head",
            "-q",
        ])
        .unwrap();
        assert_eq!(args.folder, Some(PathBuf::from("src")));
        assert_eq!(args.ext, ".rs");
        assert_eq!(args.counter, CounterKind::Shell);
        assert_eq!(args.scope, Scope::Head);
        assert!(args.quiet);
    }
}
