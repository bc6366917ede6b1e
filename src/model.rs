// src/model.rs

use git2::Oid;
use std::fmt;

/// A point in time as git stores it: seconds since the epoch plus the
/// author's UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub seconds: i64,
    pub offset_minutes: i32,
}

/// Name and email of an author or committer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// Immutable description of one source commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub id: Oid,
    pub parent_count: usize,
    pub message: String,
    pub author: Identity,
    pub committer: Identity,
    pub authored_at: Timestamp,
    pub committed_at: Timestamp,
}

impl CommitRecord {
    /// Abbreviated hash for display
    pub fn short_id(&self) -> String {
        short(self.id)
    }
}

pub fn short(id: Oid) -> String {
    let mut hex = id.to_string();
    hex.truncate(8);
    hex
}

/// Author, committer and timestamps copied onto a checkpoint commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMeta {
    /// Commit the metadata was taken from
    pub source: Oid,
    pub message: String,
    pub author: Identity,
    pub committer: Identity,
    pub authored_at: Timestamp,
    pub committed_at: Timestamp,
}

impl From<&CommitRecord> for CommitMeta {
    fn from(record: &CommitRecord) -> Self {
        Self {
            source: record.id,
            message: record.message.clone(),
            author: record.author.clone(),
            committer: record.committer.clone(),
            authored_at: record.authored_at,
            committed_at: record.committed_at,
        }
    }
}

/// What a single line of a hunk does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Context,
    Addition,
    Removal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub header: String,
    pub lines: Vec<LineKind>,
}

/// How a file changed between a commit and its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Deleted,
    Modified,
    Renamed,
    Other,
}

/// Per-file change list of a commit against its parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: String,
    pub status: FileStatus,
    pub binary: bool,
    pub hunks: Vec<Hunk>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Root commit, nothing to diff against
    Initial,
    Empty,
    AddOnly,
    Mixed,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Classification::Initial => "initial",
            Classification::Empty => "empty",
            Classification::AddOnly => "add-only",
            Classification::Mixed => "mixed",
        };
        f.write_str(label)
    }
}

/// Classification of the most recently planned commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerState {
    Add,
    Del,
    Empty,
}

/// Position in the plan: a source commit or the terminal sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanTarget {
    Commit(Oid),
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanEntry {
    pub target: PlanTarget,
    /// The entry before this one must be committed before this one is staged
    pub is_boundary: bool,
}

/// A run of source commits collapsed into one checkpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub members: Vec<Oid>,
    /// Commit whose metadata the checkpoint carries
    pub representative: Oid,
}

/// Ordered plan: root first, terminal sentinel last
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub entries: Vec<PlanEntry>,
}

impl Plan {
    pub fn root(&self) -> Option<Oid> {
        match self.entries.first()?.target {
            PlanTarget::Commit(id) => Some(id),
            PlanTarget::End => None,
        }
    }

    /// Groups the plan the same way the rebuilder replays it.
    pub fn segments(&self) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut staged = Vec::new();
        let mut last = match self.root() {
            Some(root) => root,
            None => return segments,
        };

        for entry in self.entries.iter().skip(1) {
            if entry.is_boundary {
                segments.push(Segment {
                    members: std::mem::take(&mut staged),
                    representative: last,
                });
            }
            match entry.target {
                PlanTarget::Commit(id) => {
                    staged.push(id);
                    last = id;
                }
                PlanTarget::End => break,
            }
        }
        segments
    }

    /// Number of commits the rebuilt branch will contain, root included
    pub fn output_commits(&self) -> usize {
        self.segments().len() + 1
    }
}
