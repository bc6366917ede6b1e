// src/rebuilder.rs

use crate::error::{CompactError, Result};
use crate::model::{short, CommitMeta, CommitRecord, Plan, PlanTarget};
use crate::vcs::{VcsError, VersionControl};
use git2::Oid;
use indicatif::ProgressBar;
use std::collections::HashMap;
use tracing::{debug, info};

/// Outcome of a successful replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildReport {
    pub branch: String,
    pub base: Oid,
    /// New checkpoint commits, oldest first (base not included)
    pub checkpoints: Vec<Oid>,
}

/// Replays `plan` onto a new branch `branch` created at the plan's root.
///
/// Each boundary commits whatever is staged using the metadata of the plan
/// entry just before the boundary. Any failure stops immediately and the
/// branch is left as far as it got.
pub fn rebuild<V: VersionControl + ?Sized>(
    vcs: &mut V,
    plan: &Plan,
    records: &[CommitRecord],
    branch: &str,
    message: Option<&str>,
) -> Result<RebuildReport> {
    let Some(base) = plan.root() else {
        return Err(CompactError::EmptyHistory { commits: 0 });
    };

    let bar = ProgressBar::new(plan.entries.len().saturating_sub(1) as u64);
    bar.set_message("Replaying commits");

    match replay(vcs, plan, records, branch, message, base, &bar) {
        Ok(checkpoints) => {
            bar.finish_with_message("Replay complete");
            Ok(RebuildReport {
                branch: branch.to_string(),
                base,
                checkpoints,
            })
        }
        Err(e) => {
            bar.abandon();
            Err(e)
        }
    }
}

fn replay<V: VersionControl + ?Sized>(
    vcs: &mut V,
    plan: &Plan,
    records: &[CommitRecord],
    branch: &str,
    message: Option<&str>,
    base: Oid,
    bar: &ProgressBar,
) -> Result<Vec<Oid>> {
    let by_id: HashMap<Oid, &CommitRecord> = records.iter().map(|r| (r.id, r)).collect();
    let fail = |operation: &'static str, commit: Oid, done: usize, source: VcsError| {
        CompactError::Replay {
            branch: branch.to_string(),
            operation,
            checkpoint: done + 1,
            commit,
            completed: done,
            source,
        }
    };

    vcs.create_branch(branch, base)
        .map_err(|e| fail("create branch", base, 0, e))?;
    info!(branch, base = %short(base), "created branch at root commit");

    let mut checkpoints = Vec::new();
    let mut last = base;
    for entry in plan.entries.iter().skip(1) {
        if entry.is_boundary {
            let record = by_id.get(&last).ok_or_else(|| {
                fail("commit", last, checkpoints.len(), VcsError::NotFound(last.to_string()))
            })?;
            let mut meta = CommitMeta::from(*record);
            if let Some(message) = message {
                meta.message = message.to_string();
            }
            let id = vcs
                .commit(branch, &meta)
                .map_err(|e| fail("commit", last, checkpoints.len(), e))?;
            debug!(checkpoint = %short(id), from = %short(last), "finalized checkpoint");
            checkpoints.push(id);
        }

        let current = match entry.target {
            PlanTarget::Commit(id) => id,
            PlanTarget::End => break,
        };
        vcs.stage(current).map_err(|source| match source {
            VcsError::Conflict { .. } => CompactError::ReplayConflict {
                branch: branch.to_string(),
                checkpoint: checkpoints.len() + 1,
                commit: current,
                completed: checkpoints.len(),
                source,
            },
            other => fail("stage", current, checkpoints.len(), other),
        })?;
        last = current;
        bar.inc(1);
    }
    Ok(checkpoints)
}
