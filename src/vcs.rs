// src/vcs.rs

use crate::model::{CommitMeta, CommitRecord, FileDiff};
use git2::Oid;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VcsError {
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("cannot apply {commit}: {reason}")]
    Conflict { commit: Oid, reason: String },

    #[error("not found: {0}")]
    NotFound(String),
}

pub type VcsResult<T> = Result<T, VcsError>;

/// Everything the compaction engine needs from a version-control backend.
///
/// Staging is stateful: `create_branch` resets the staged tree to the
/// branch base, `stage` accumulates changes on top of it and `commit`
/// turns the accumulated tree into a new commit on the branch.
pub trait VersionControl {
    /// Commits reachable from `tip`, oldest first. Merge commits are
    /// reported as-is; rejecting them is the walker's job.
    fn history(&self, tip: &str) -> VcsResult<Vec<CommitRecord>>;

    /// Change list of `commit` against its single parent.
    fn diff(&self, commit: &CommitRecord) -> VcsResult<Vec<FileDiff>>;

    fn branch_exists(&self, name: &str) -> VcsResult<bool>;

    /// Points `name` at an existing commit, verbatim.
    fn create_branch(&mut self, name: &str, at: Oid) -> VcsResult<()>;

    fn delete_branch(&mut self, name: &str) -> VcsResult<()>;

    fn rename_branch(&mut self, from: &str, to: &str, force: bool) -> VcsResult<()>;

    /// Applies the change `commit` made to its parent onto the staged tree.
    fn stage(&mut self, commit: Oid) -> VcsResult<()>;

    /// Commits the staged tree on top of `branch`.
    fn commit(&mut self, branch: &str, meta: &CommitMeta) -> VcsResult<Oid>;

    /// Whether the head of `branch` has the same tree as `commit`.
    fn same_tree(&self, branch: &str, commit: Oid) -> VcsResult<bool>;
}
