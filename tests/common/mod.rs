// Shared fixtures for integration tests
#![allow(dead_code)]

use git2::{Oid, Repository, Signature};
use loc_history::cli::{Args, CounterKind, Scope, DEFAULT_OUTPUT};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary git repository without commits
pub fn create_test_repo() -> (TempDir, PathBuf, Repository) {
    let dir = TempDir::new().unwrap();
    let repo_path = dir.path().canonicalize().unwrap();
    let repo = Repository::init(&repo_path).unwrap();

    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    (dir, repo_path, repo)
}

/// Write files into the working tree, stage them and commit on HEAD
pub fn add_commit(repo: &Repository, files: &[(&str, &str)], message: &str) -> Oid {
    let sig = Signature::now("Test User", "test@example.com").unwrap();
    let mut index = repo.index().unwrap();

    for (path, content) in files {
        let full_path = repo.workdir().unwrap().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full_path, content).unwrap();
        index.add_path(Path::new(path)).unwrap();
    }

    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

/// `n` newline-terminated lines
pub fn lines(n: usize) -> String {
    (0..n).map(|i| format!("console.log({});\n", i)).collect()
}

pub fn current_branch(repo_path: &Path) -> Option<String> {
    let repo = Repository::open(repo_path).unwrap();
    let head = repo.head().unwrap();
    if head.is_branch() {
        head.shorthand().map(String::from)
    } else {
        None
    }
}

pub fn head_id(repo_path: &Path) -> Oid {
    let repo = Repository::open(repo_path).unwrap();
    let id = repo.head().unwrap().peel_to_commit().unwrap().id();
    id
}

/// Arguments as the CLI would build them, writing the chart into `out_dir`
pub fn args_for(folder: &Path, out_dir: &Path) -> Args {
    Args {
        folder: Some(folder.to_path_buf()),
        ext: ".js".to_string(),
        output: out_dir.join(DEFAULT_OUTPUT),
        width: 320,
        height: 128,
        scope: Scope::All,
        counter: CounterKind::Native,
        respect_gitignore: false,
        font: None,
        quiet: true,
    }
}

/// Delete a tracked file from the working tree and index and commit on HEAD
pub fn remove_commit(repo: &Repository, path: &str, message: &str) -> Oid {
    let sig = Signature::now("Test User", "test@example.com").unwrap();

    let full_path = repo.workdir().unwrap().join(path);
    if full_path.exists() {
        std::fs::remove_file(&full_path).unwrap();
    }

    let mut index = repo.index().unwrap();
    index.remove_path(Path::new(path)).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let parent = repo.head().unwrap().peel_to_commit().unwrap();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent])
        .unwrap()
}
