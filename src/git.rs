// src/git.rs

use crate::model::{
    CommitMeta, CommitRecord, FileDiff, FileStatus, Hunk, Identity, LineKind, Timestamp,
};
use crate::vcs::{VcsError, VcsResult, VersionControl};
use git2::{
    BranchType, Commit, Delta, Diff, DiffLineType, DiffOptions, ErrorCode, Oid, Patch,
    Repository, Signature, Sort, Time,
};
use std::path::Path;
use tracing::trace;

/// `VersionControl` backed by a libgit2 repository.
///
/// Changes are staged into trees in the object database, so neither the
/// working tree nor the repository index is touched.
pub struct GitEngine {
    repo: Repository,
    /// Tree accumulated since the last branch creation
    staged: Option<Oid>,
}

impl GitEngine {
    pub fn open(path: &Path) -> VcsResult<Self> {
        Ok(Self::new(Repository::open(path)?))
    }

    pub fn new(repo: Repository) -> Self {
        Self { repo, staged: None }
    }

    #[cfg(test)]
    pub fn repository(&self) -> &Repository {
        &self.repo
    }
}

fn identity(sig: &Signature<'_>) -> Identity {
    Identity {
        name: String::from_utf8_lossy(sig.name_bytes()).into_owned(),
        email: String::from_utf8_lossy(sig.email_bytes()).into_owned(),
    }
}

fn timestamp(time: Time) -> Timestamp {
    Timestamp {
        seconds: time.seconds(),
        offset_minutes: time.offset_minutes(),
    }
}

fn record(commit: &Commit<'_>) -> CommitRecord {
    let author = commit.author();
    let committer = commit.committer();
    CommitRecord {
        id: commit.id(),
        parent_count: commit.parent_count(),
        message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
        author: identity(&author),
        committer: identity(&committer),
        authored_at: timestamp(author.when()),
        committed_at: timestamp(commit.time()),
    }
}

/// Diff of a commit against its first parent, or against nothing for a root.
fn commit_diff<'r>(
    repo: &'r Repository,
    id: Oid,
    opts: &mut DiffOptions,
) -> Result<Diff<'r>, git2::Error> {
    let commit = repo.find_commit(id)?;
    let parent_tree = if commit.parent_count() == 0 {
        None
    } else {
        Some(commit.parent(0)?.tree()?)
    };
    let tree = commit.tree()?;
    repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(opts))
}

fn file_status(status: Delta) -> FileStatus {
    match status {
        Delta::Added => FileStatus::Added,
        Delta::Deleted => FileStatus::Deleted,
        Delta::Modified => FileStatus::Modified,
        Delta::Renamed => FileStatus::Renamed,
        _ => FileStatus::Other,
    }
}

fn collect_hunks(patch: &Patch<'_>) -> Result<Vec<Hunk>, git2::Error> {
    let mut hunks = Vec::with_capacity(patch.num_hunks());
    for hunk_idx in 0..patch.num_hunks() {
        let (hunk, line_count) = patch.hunk(hunk_idx)?;
        let mut lines = Vec::with_capacity(line_count);
        for line_idx in 0..line_count {
            let line = patch.line_in_hunk(hunk_idx, line_idx)?;
            lines.push(match line.origin_value() {
                DiffLineType::Addition => LineKind::Addition,
                DiffLineType::Deletion => LineKind::Removal,
                _ => LineKind::Context,
            });
        }
        hunks.push(Hunk {
            header: String::from_utf8_lossy(hunk.header()).trim_end().to_string(),
            lines,
        });
    }
    Ok(hunks)
}

impl VersionControl for GitEngine {
    fn history(&self, tip: &str) -> VcsResult<Vec<CommitRecord>> {
        let tip = self.repo.revparse_single(tip)?.peel_to_commit()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(tip.id())?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;

        let mut records = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            records.push(record(&commit));
        }
        Ok(records)
    }

    fn diff(&self, commit: &CommitRecord) -> VcsResult<Vec<FileDiff>> {
        let mut opts = DiffOptions::new();
        opts.ignore_filemode(true);
        let diff = commit_diff(&self.repo, commit.id, &mut opts)?;

        let mut files = Vec::with_capacity(diff.deltas().len());
        for idx in 0..diff.deltas().len() {
            // Loading the patch also settles binary detection for the delta.
            let patch = Patch::from_diff(&diff, idx)?;
            let Some(delta) = diff.get_delta(idx) else {
                continue;
            };
            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();

            let (binary, hunks) = match patch {
                Some(patch) => (patch.delta().flags().is_binary(), collect_hunks(&patch)?),
                None => (true, Vec::new()),
            };
            trace!(commit = %commit.short_id(), path = %path, binary, hunks = hunks.len(), "file diff");
            files.push(FileDiff {
                path,
                status: file_status(delta.status()),
                binary,
                hunks,
            });
        }
        Ok(files)
    }

    fn branch_exists(&self, name: &str) -> VcsResult<bool> {
        match self.repo.find_branch(name, BranchType::Local) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn create_branch(&mut self, name: &str, at: Oid) -> VcsResult<()> {
        let commit = self.repo.find_commit(at)?;
        self.repo.branch(name, &commit, false)?;
        self.staged = Some(commit.tree_id());
        Ok(())
    }

    fn delete_branch(&mut self, name: &str) -> VcsResult<()> {
        let mut branch = self.repo.find_branch(name, BranchType::Local)?;
        branch.delete()?;
        Ok(())
    }

    fn rename_branch(&mut self, from: &str, to: &str, force: bool) -> VcsResult<()> {
        let mut branch = self.repo.find_branch(from, BranchType::Local)?;
        branch.rename(to, force)?;
        Ok(())
    }

    fn stage(&mut self, commit: Oid) -> VcsResult<()> {
        let base = self
            .staged
            .ok_or_else(|| VcsError::NotFound("staging area (no branch created)".into()))?;
        let mut opts = DiffOptions::new();
        opts.show_binary(true);
        let diff = commit_diff(&self.repo, commit, &mut opts)?;
        let base_tree = self.repo.find_tree(base)?;

        let mut index = self
            .repo
            .apply_to_tree(&base_tree, &diff, None)
            .map_err(|e| VcsError::Conflict { commit, reason: e.message().to_string() })?;
        if index.has_conflicts() {
            return Err(VcsError::Conflict { commit, reason: "index has conflicts".into() });
        }
        self.staged = Some(index.write_tree_to(&self.repo)?);
        Ok(())
    }

    fn commit(&mut self, branch: &str, meta: &CommitMeta) -> VcsResult<Oid> {
        let tree_id = self
            .staged
            .ok_or_else(|| VcsError::NotFound("staging area (no branch created)".into()))?;
        let tree = self.repo.find_tree(tree_id)?;
        let refname = format!("refs/heads/{branch}");
        let parent = self.repo.find_reference(&refname)?.peel_to_commit()?;

        // Signatures are copied raw so names that are not UTF-8 survive.
        let source = self.repo.find_commit(meta.source)?;
        let author = source.author().to_owned();
        let committer = source.committer().to_owned();
        let id = self.repo.commit(
            Some(&refname),
            &author,
            &committer,
            &meta.message,
            &tree,
            &[&parent],
        )?;
        Ok(id)
    }

    fn same_tree(&self, branch: &str, commit: Oid) -> VcsResult<bool> {
        let head = self
            .repo
            .find_branch(branch, BranchType::Local)?
            .get()
            .peel_to_commit()?;
        let other = self.repo.find_commit(commit)?;
        Ok(head.tree_id() == other.tree_id())
    }
}
