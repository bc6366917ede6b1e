// src/cli.rs

use crate::compactor::CompactOptions;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the git repository to compact
    #[arg(short, long, env = "GIT_COMPACT_REPO", default_value = ".")]
    pub repo: PathBuf,

    /// Revision whose history is compacted
    #[arg(short, long, default_value = "HEAD")]
    pub branch: String,

    /// Name of the branch that receives the compacted history
    #[arg(short, long, env = "GIT_COMPACT_TARGET")]
    pub target: String,

    /// Message for every checkpoint (default: the message of the commit whose metadata it carries)
    #[arg(short, long)]
    pub message: Option<String>,

    /// Replace the target branch if it already exists
    #[arg(long)]
    pub force: bool,

    /// Print the plan without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Log level or filter directive (e.g. "trace", "git_compact=debug")
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl Args {
    pub fn options(&self) -> CompactOptions {
        CompactOptions {
            source: self.branch.clone(),
            target: self.target.clone(),
            message: self.message.clone(),
            force: self.force,
        }
    }
}
