// src/fake.rs

//! In-memory `VersionControl` for exercising the engine without a repository.

use crate::model::{
    CommitMeta, CommitRecord, FileDiff, FileStatus, Hunk, Identity, LineKind, Timestamp,
};
use crate::vcs::{VcsError, VcsResult, VersionControl};
use git2::Oid;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

pub type Tree = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct FakeCommit {
    pub record: CommitRecord,
    pub parent: Option<Oid>,
    pub tree: Tree,
}

#[derive(Debug, Default)]
pub struct FakeRepo {
    pub commits: HashMap<Oid, FakeCommit>,
    /// Source history in creation order
    pub log: Vec<Oid>,
    pub branches: HashMap<String, Oid>,
    pub staged: Tree,
    /// Number of commit-creating calls made through the port
    pub writes: usize,
    pub conflict_on: HashSet<Oid>,
    /// Path that `stage` silently leaves out
    pub drop_path: Option<String>,
    /// Checkpoint commits allowed before `commit` starts failing
    pub commit_limit: Option<usize>,
    next_id: u64,
}

impl FakeRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// First commit; `files` maps paths to full file contents.
    pub fn root(&mut self, files: &[(&str, &str)]) -> Oid {
        self.push(0, files)
    }

    /// Commit on top of the last one; an empty content deletes the file.
    pub fn append(&mut self, changes: &[(&str, &str)]) -> Oid {
        self.push(1, changes)
    }

    pub fn merge_commit(&mut self, changes: &[(&str, &str)]) -> Oid {
        self.push(2, changes)
    }

    pub fn tree_of(&self, id: Oid) -> &Tree {
        &self.commits[&id].tree
    }

    /// Commits on `branch`, oldest first
    pub fn branch_log(&self, branch: &str) -> Vec<&FakeCommit> {
        let mut out = Vec::new();
        let mut cursor = self.branches.get(branch).copied();
        while let Some(id) = cursor {
            let commit = &self.commits[&id];
            out.push(commit);
            cursor = commit.parent;
        }
        out.reverse();
        out
    }

    fn fresh_id(&mut self) -> Oid {
        self.next_id += 1;
        let mut bytes = [0u8; 20];
        bytes[12..20].copy_from_slice(&self.next_id.to_be_bytes());
        Oid::from_bytes(&bytes).unwrap()
    }

    fn push(&mut self, parent_count: usize, changes: &[(&str, &str)]) -> Oid {
        let parent = self.log.last().copied();
        let mut tree = parent.map(|p| self.commits[&p].tree.clone()).unwrap_or_default();
        for (path, content) in changes {
            if content.is_empty() {
                tree.remove(*path);
            } else {
                tree.insert(path.to_string(), content.to_string());
            }
        }

        let id = self.fresh_id();
        let n = self.log.len() as i64;
        let record = CommitRecord {
            id,
            parent_count,
            message: format!("commit {n}\n"),
            author: Identity { name: format!("author{n}"), email: format!("a{n}@example.com") },
            committer: Identity { name: format!("committer{n}"), email: format!("c{n}@example.com") },
            authored_at: Timestamp { seconds: 1_700_000_000 + n * 60, offset_minutes: 60 },
            committed_at: Timestamp { seconds: 1_700_000_030 + n * 60, offset_minutes: -120 },
        };
        self.commits.insert(id, FakeCommit { record, parent, tree });
        self.log.push(id);
        self.branches.insert("main".into(), id);
        id
    }

    fn parent_tree(&self, id: Oid) -> Tree {
        self.commits[&id]
            .parent
            .map(|p| self.commits[&p].tree.clone())
            .unwrap_or_default()
    }
}

fn file_diff(path: &str, old: Option<&String>, new: Option<&String>) -> FileDiff {
    let old_lines: Vec<&str> = old.map(|s| s.lines().collect()).unwrap_or_default();
    let new_lines: Vec<&str> = new.map(|s| s.lines().collect()).unwrap_or_default();

    let mut lines = Vec::new();
    for line in &old_lines {
        lines.push(if new_lines.contains(line) { LineKind::Context } else { LineKind::Removal });
    }
    for line in &new_lines {
        if !old_lines.contains(line) {
            lines.push(LineKind::Addition);
        }
    }

    let status = match (old, new) {
        (None, Some(_)) => FileStatus::Added,
        (Some(_), None) => FileStatus::Deleted,
        _ => FileStatus::Modified,
    };
    FileDiff {
        path: path.into(),
        status,
        binary: false,
        hunks: vec![Hunk { header: "@@".into(), lines }],
    }
}

impl VersionControl for FakeRepo {
    fn history(&self, tip: &str) -> VcsResult<Vec<CommitRecord>> {
        let head = self
            .branches
            .get(tip)
            .ok_or_else(|| VcsError::NotFound(tip.to_string()))?;
        let end = self.log.iter().position(|id| id == head).unwrap_or(0);
        Ok(self.log[..=end].iter().map(|id| self.commits[id].record.clone()).collect())
    }

    fn diff(&self, commit: &CommitRecord) -> VcsResult<Vec<FileDiff>> {
        let old = self.parent_tree(commit.id);
        let new = &self.commits[&commit.id].tree;
        let paths: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
        Ok(paths
            .into_iter()
            .filter(|p| old.get(*p) != new.get(*p))
            .map(|p| file_diff(p, old.get(p), new.get(p)))
            .collect())
    }

    fn branch_exists(&self, name: &str) -> VcsResult<bool> {
        Ok(self.branches.contains_key(name))
    }

    fn create_branch(&mut self, name: &str, at: Oid) -> VcsResult<()> {
        if self.branches.contains_key(name) {
            return Err(git2::Error::from_str(&format!("branch '{name}' already exists")).into());
        }
        let tree = self
            .commits
            .get(&at)
            .ok_or_else(|| VcsError::NotFound(at.to_string()))?
            .tree
            .clone();
        self.writes += 1;
        self.branches.insert(name.to_string(), at);
        self.staged = tree;
        Ok(())
    }

    fn delete_branch(&mut self, name: &str) -> VcsResult<()> {
        self.writes += 1;
        self.branches
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| VcsError::NotFound(name.to_string()))
    }

    fn rename_branch(&mut self, from: &str, to: &str, force: bool) -> VcsResult<()> {
        if !force && self.branches.contains_key(to) {
            return Err(VcsError::NotFound(format!("{to} already exists")));
        }
        let id = self
            .branches
            .remove(from)
            .ok_or_else(|| VcsError::NotFound(from.to_string()))?;
        self.writes += 1;
        self.branches.insert(to.to_string(), id);
        Ok(())
    }

    fn stage(&mut self, commit: Oid) -> VcsResult<()> {
        if self.conflict_on.contains(&commit) {
            return Err(VcsError::Conflict { commit, reason: "injected conflict".into() });
        }
        let old = self.parent_tree(commit);
        let new = self.commits[&commit].tree.clone();
        let paths: BTreeSet<String> = old.keys().chain(new.keys()).cloned().collect();
        for path in paths {
            if old.get(&path) == new.get(&path) || self.drop_path.as_ref() == Some(&path) {
                continue;
            }
            if self.staged.get(&path) != old.get(&path) {
                return Err(VcsError::Conflict { commit, reason: format!("{path} diverged") });
            }
            match new.get(&path) {
                Some(content) => self.staged.insert(path, content.clone()),
                None => self.staged.remove(&path),
            };
        }
        Ok(())
    }

    fn commit(&mut self, branch: &str, meta: &CommitMeta) -> VcsResult<Oid> {
        if let Some(limit) = self.commit_limit.as_mut() {
            if *limit == 0 {
                return Err(VcsError::NotFound("object database unavailable".into()));
            }
            *limit -= 1;
        }
        let parent = *self
            .branches
            .get(branch)
            .ok_or_else(|| VcsError::NotFound(branch.to_string()))?;
        let id = self.fresh_id();
        let record = CommitRecord {
            id,
            parent_count: 1,
            message: meta.message.clone(),
            author: meta.author.clone(),
            committer: meta.committer.clone(),
            authored_at: meta.authored_at,
            committed_at: meta.committed_at,
        };
        let tree = self.staged.clone();
        self.commits.insert(id, FakeCommit { record, parent: Some(parent), tree });
        self.branches.insert(branch.to_string(), id);
        self.writes += 1;
        Ok(id)
    }

    fn same_tree(&self, branch: &str, commit: Oid) -> VcsResult<bool> {
        let head = self
            .branches
            .get(branch)
            .ok_or_else(|| VcsError::NotFound(branch.to_string()))?;
        Ok(self.commits[head].tree == self.commits[&commit].tree)
    }
}
