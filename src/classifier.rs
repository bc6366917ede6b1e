// src/classifier.rs

use crate::model::{Classification, CommitRecord, FileDiff, FileStatus, LineKind};
use tracing::trace;

/// Classifies a commit from its change list against its parent.
///
/// A single removed line anywhere makes the whole commit `Mixed`, however
/// many lines it adds elsewhere.
pub fn classify(record: &CommitRecord, files: &[FileDiff]) -> Classification {
    if record.parent_count == 0 {
        return Classification::Initial;
    }

    let mut added = false;
    for file in files {
        if file.binary {
            // No line information; a new binary file only adds.
            if file.status == FileStatus::Added {
                added = true;
                continue;
            }
            return Classification::Mixed;
        }
        for hunk in &file.hunks {
            for line in &hunk.lines {
                match line {
                    LineKind::Removal => {
                        trace!(path = %file.path, hunk = %hunk.header, "removed line");
                        return Classification::Mixed;
                    }
                    LineKind::Addition => added = true,
                    LineKind::Context => {}
                }
            }
        }
    }

    if added {
        Classification::AddOnly
    } else {
        Classification::Empty
    }
}
