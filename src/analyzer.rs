// src/analyzer.rs

use crate::classifier::classify;
use crate::error::Result;
use crate::model::{Classification, CommitRecord, Plan};
use crate::planner;
use crate::vcs::VersionControl;
use crate::walker;
use indicatif::ProgressBar;
use tracing::{debug, info};

/// Everything learned about the source history before anything is written
#[derive(Debug, Clone)]
pub struct Analysis {
    pub records: Vec<CommitRecord>,
    pub classes: Vec<Classification>,
    pub plan: Plan,
}

impl Analysis {
    pub fn start_time(&self) -> i64 {
        self.records.first().map_or(0, |r| r.authored_at.seconds)
    }

    pub fn end_time(&self) -> i64 {
        self.records.last().map_or(0, |r| r.authored_at.seconds)
    }

    pub fn head(&self) -> Option<&CommitRecord> {
        self.records.last()
    }
}

/// Walks, classifies and plans the history ending at `tip`. Read-only.
pub fn analyze<V: VersionControl + ?Sized>(vcs: &V, tip: &str) -> Result<Analysis> {
    // 1. Collect the linear history, oldest first
    let records = walker::walk(vcs, tip)?;
    info!(tip, commits = records.len(), "analyzing history");

    let bar = ProgressBar::new(records.len() as u64);
    bar.set_message("Classifying commits");

    // 2. Classify every commit against its parent
    let mut classes = Vec::with_capacity(records.len());
    for record in &records {
        let class = if record.parent_count == 0 {
            classify(record, &[])
        } else {
            let files = vcs.diff(record)?;
            classify(record, &files)
        };
        debug!(commit = %record.short_id(), %class, "classified");
        classes.push(class);
        bar.inc(1);
    }
    bar.finish_with_message("Classification complete");

    // 3. Fold into a plan
    let classified: Vec<_> = records.iter().map(|r| r.id).zip(classes.iter().copied()).collect();
    let plan = planner::plan(&classified);
    info!(
        commits = records.len(),
        output = plan.output_commits(),
        "planned compaction"
    );

    Ok(Analysis { records, classes, plan })
}
