// src/error.rs

//! Error taxonomy of a compaction run and the exit code for each kind.
//!
//! Analysis-phase errors (`UnsupportedHistory`, `EmptyHistory`,
//! `TargetExists`, `Vcs`) happen before anything is written. Replay-phase
//! errors leave the partially built branch in place and say how far the
//! replay got.

use crate::vcs::VcsError;
use git2::Oid;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompactError {
    #[error("commit {commit} has {parents} parents; only linear history can be compacted")]
    UnsupportedHistory { commit: Oid, parents: usize },

    #[error("history has {commits} commit(s); at least two are needed to compact")]
    EmptyHistory { commits: usize },

    #[error("branch '{0}' already exists (use --force to replace it)")]
    TargetExists(String),

    #[error(
        "replay conflict at checkpoint {checkpoint} while staging {commit}; \
         branch '{branch}' left with {completed} completed checkpoint(s): {source}"
    )]
    ReplayConflict {
        branch: String,
        checkpoint: usize,
        commit: Oid,
        completed: usize,
        #[source]
        source: VcsError,
    },

    #[error(
        "{operation} failed at checkpoint {checkpoint} on source commit {commit}; \
         branch '{branch}' left with {completed} completed checkpoint(s): {source}"
    )]
    Replay {
        branch: String,
        operation: &'static str,
        checkpoint: usize,
        commit: Oid,
        completed: usize,
        #[source]
        source: VcsError,
    },

    #[error("rebuilt branch '{branch}' does not match the tree of {expected}")]
    ContentMismatch { branch: String, expected: Oid },

    #[error(transparent)]
    Vcs(#[from] VcsError),
}

impl CompactError {
    /// Process exit status; 2 is left to clap for usage errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            CompactError::Vcs(_) => 1,
            CompactError::UnsupportedHistory { .. } => 3,
            CompactError::EmptyHistory { .. } => 4,
            CompactError::ReplayConflict { .. } => 5,
            CompactError::Replay { .. } => 6,
            CompactError::TargetExists(_) => 7,
            CompactError::ContentMismatch { .. } => 8,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompactError>;
