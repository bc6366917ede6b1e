// src/compactor.rs

use crate::analyzer::{analyze, Analysis};
use crate::error::{CompactError, Result};
use crate::rebuilder::rebuild;
use crate::vcs::VersionControl;
use git2::Oid;
use tracing::{info, warn};

/// Inputs of one compaction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactOptions {
    /// Revision whose history is compacted
    pub source: String,
    /// Branch that receives the compacted history
    pub target: String,
    /// Message for every checkpoint instead of the representative's own
    pub message: Option<String>,
    /// Replace an existing target branch
    pub force: bool,
}

impl CompactOptions {
    /// Name the history is built under until it is complete
    pub fn work_branch(&self) -> String {
        format!("{}-compact-wip", self.target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactReport {
    pub branch: String,
    pub head: Oid,
    pub original_commits: usize,
    /// Commits on the new branch, base included
    pub output_commits: usize,
}

/// Analyzes then rebuilds. Nothing is written unless analysis succeeds.
pub fn run<V: VersionControl + ?Sized>(vcs: &mut V, options: &CompactOptions) -> Result<CompactReport> {
    let analysis = analyze(vcs, &options.source)?;
    execute(vcs, &analysis, options)
}

/// Replays a finished analysis under the work branch, checks the result
/// against the source head and publishes it under the target name.
pub fn execute<V: VersionControl + ?Sized>(
    vcs: &mut V,
    analysis: &Analysis,
    options: &CompactOptions,
) -> Result<CompactReport> {
    let Some(source_head) = analysis.head().map(|r| r.id) else {
        return Err(CompactError::EmptyHistory { commits: 0 });
    };
    let work = options.work_branch();

    if vcs.branch_exists(&options.target)? && !options.force {
        return Err(CompactError::TargetExists(options.target.clone()));
    }
    if vcs.branch_exists(&work)? {
        if !options.force {
            return Err(CompactError::TargetExists(work));
        }
        warn!(branch = %work, "deleting stale work branch");
        vcs.delete_branch(&work)?;
    }

    let report = rebuild(vcs, &analysis.plan, &analysis.records, &work, options.message.as_deref())
        .inspect_err(|e| warn!(branch = %work, error = %e, "leaving partially rebuilt branch"))?;
    let completed = report.checkpoints.len();
    info!(branch = %report.branch, checkpoints = completed, "replay finished");
    let after_replay = |operation: &'static str, source| CompactError::Replay {
        branch: work.clone(),
        operation,
        checkpoint: completed,
        commit: source_head,
        completed,
        source,
    };

    if !vcs.same_tree(&work, source_head).map_err(|e| after_replay("verify", e))? {
        warn!(branch = %work, "rebuilt tree differs from source head");
        return Err(CompactError::ContentMismatch { branch: work.clone(), expected: source_head });
    }

    vcs.rename_branch(&work, &options.target, options.force)
        .map_err(|e| after_replay("publish", e))?;
    info!(branch = %options.target, "published compacted history");

    Ok(CompactReport {
        branch: options.target.clone(),
        head: report.checkpoints.last().copied().unwrap_or(report.base),
        original_commits: analysis.records.len(),
        output_commits: completed + 1,
    })
}
