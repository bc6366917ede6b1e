// src/walker.rs

use crate::error::{CompactError, Result};
use crate::model::CommitRecord;
use crate::vcs::VersionControl;
use tracing::debug;

/// Oldest-first linear history ending at `tip`.
///
/// Fails on the first merge commit, and when there are fewer than two
/// commits to work with.
pub fn walk<V: VersionControl + ?Sized>(vcs: &V, tip: &str) -> Result<Vec<CommitRecord>> {
    let records = vcs.history(tip)?;

    if let Some(merge) = records.iter().find(|r| r.parent_count > 1) {
        return Err(CompactError::UnsupportedHistory {
            commit: merge.id,
            parents: merge.parent_count,
        });
    }
    if records.len() < 2 {
        return Err(CompactError::EmptyHistory { commits: records.len() });
    }

    debug!(tip, commits = records.len(), "walked history");
    Ok(records)
}
