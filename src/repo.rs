// src/repo.rs

use crate::cli::Scope;
use crate::error::{Error, Result};
use crate::model::OriginalHead;
use git2::build::CheckoutBuilder;
use git2::{ErrorCode, Oid, Repository, Sort, Status, StatusOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The repository whose working tree gets moved through history
pub struct Workspace {
    repo: Repository,
    workdir: PathBuf,
}

impl Workspace {
    /// Opens the repository containing `folder`
    pub fn discover(folder: &Path) -> Result<Self> {
        let repo = match Repository::discover(folder) {
            Ok(repo) => repo,
            Err(e) if e.code() == ErrorCode::NotFound => {
                return Err(Error::NotARepository(folder.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };
        let workdir = match repo.workdir() {
            Some(dir) => dir.to_path_buf(),
            None => return Err(Error::BareRepository(repo.path().to_path_buf())),
        };
        Ok(Self { repo, workdir })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Fails if a tracked file differs from HEAD, in the index or on disk.
    /// Untracked and ignored files are fine.
    pub fn ensure_clean(&self) -> Result<()> {
        self.head_commit()?;

        let mut opts = StatusOptions::new();
        opts.include_untracked(false)
            .include_ignored(false)
            .exclude_submodules(true);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        let paths: Vec<String> = statuses
            .iter()
            .filter(|entry| entry.status() != Status::CURRENT && !entry.status().is_ignored())
            .map(|entry| entry.path().unwrap_or("<non-utf8 path>").to_string())
            .collect();

        if paths.is_empty() {
            Ok(())
        } else {
            Err(Error::DirtyWorkingTree { paths })
        }
    }

    pub fn original_head(&self) -> Result<OriginalHead> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == ErrorCode::UnbornBranch => return Err(Error::NoCommits),
            Err(e) => return Err(e.into()),
        };

        if head.is_branch() {
            let reference = head.name().unwrap_or_default().to_string();
            let name = head.shorthand().unwrap_or(&reference).to_string();
            if !reference.is_empty() {
                return Ok(OriginalHead::Branch { name, reference });
            }
        }

        let commit = head.peel_to_commit()?;
        Ok(OriginalHead::Detached(commit.id()))
    }

    /// Commit ids, oldest first, parents always before their children
    pub fn commits(&self, scope: Scope) -> Result<Vec<Oid>> {
        self.walk(scope).map_err(Error::CommitEnumeration)
    }

    fn walk(&self, scope: Scope) -> std::result::Result<Vec<Oid>, git2::Error> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_head()?;
        if scope == Scope::All {
            for reference in self.repo.references()? {
                let reference = reference?;
                // Tags on trees or blobs have no history to walk
                if let Ok(commit) = reference.peel_to_commit() {
                    revwalk.push(commit.id())?;
                }
            }
        }

        let mut commits = revwalk.collect::<std::result::Result<Vec<_>, _>>()?;
        commits.reverse();
        Ok(commits)
    }

    pub fn commit_time(&self, oid: Oid) -> Result<i64> {
        Ok(self.repo.find_commit(oid)?.time().seconds())
    }

    /// Moves the working tree to `oid` and detaches HEAD there.
    /// Refuses to overwrite anything not committed.
    pub fn checkout(&self, oid: Oid) -> Result<()> {
        let commit = self.repo.find_commit(oid)?;
        self.repo
            .checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().safe()))?;
        self.repo.set_head_detached(oid)?;
        debug!(commit = %oid, "checked out");
        Ok(())
    }

    pub fn restore(&self, head: &OriginalHead) -> Result<()> {
        self.try_restore(head).map_err(|source| Error::Restore {
            target: head.checkout_target(),
            source,
        })
    }

    fn try_restore(&self, head: &OriginalHead) -> std::result::Result<(), git2::Error> {
        match head {
            OriginalHead::Branch { reference, .. } => {
                let commit = self.repo.find_reference(reference)?.peel_to_commit()?;
                self.repo
                    .checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().safe()))?;
                self.repo.set_head(reference)?;
            }
            OriginalHead::Detached(oid) => {
                let commit = self.repo.find_commit(*oid)?;
                self.repo
                    .checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().safe()))?;
                self.repo.set_head_detached(*oid)?;
            }
        }
        Ok(())
    }

    fn head_commit(&self) -> Result<Oid> {
        match self.repo.head() {
            Ok(head) => Ok(head.peel_to_commit()?.id()),
            Err(e) if e.code() == ErrorCode::UnbornBranch => Err(Error::NoCommits),
            Err(e) => Err(e.into()),
        }
    }
}
