// src/main.rs

mod analyzer;
mod classifier;
mod cli;
mod compactor;
mod error;
#[cfg(test)]
mod fake;
mod git;
mod logging;
mod model;
mod planner;
mod rebuilder;
mod vcs;
mod walker;

use analyzer::Analysis;
use chrono::DateTime;
use clap::Parser;
use cli::Args;
use git::GitEngine;
use model::{short, PlanTarget};
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = logging::init_tracing(args.verbose, args.log_level.as_deref(), args.log_json) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(args: &Args) -> error::Result<()> {
    let start_time = Instant::now();
    let mut engine = GitEngine::open(&args.repo)?;
    println!("Analyzing repository at: {}", args.repo.display());

    let analysis = analyzer::analyze(&engine, &args.branch)?;
    println!(
        "Analysis finished in {:.2?}. {} commits compact into {}.",
        start_time.elapsed(),
        analysis.records.len(),
        analysis.plan.output_commits()
    );
    println!(
        "History spans from {} to {}.",
        rfc2822(analysis.start_time()),
        rfc2822(analysis.end_time())
    );

    if args.dry_run {
        print_plan(&analysis);
        return Ok(());
    }

    let options = args.options();
    let report = compactor::execute(&mut engine, &analysis, &options)?;
    println!(
        "Wrote branch '{}' at {}: {} original commits, {} after compaction.",
        report.branch,
        short(report.head),
        report.original_commits,
        report.output_commits
    );
    println!("Total time: {:.2?}", start_time.elapsed());
    Ok(())
}

fn rfc2822(seconds: i64) -> String {
    DateTime::from_timestamp(seconds, 0).map_or_else(|| seconds.to_string(), |t| t.to_rfc2822())
}

fn print_plan(analysis: &Analysis) {
    let mut checkpoint = 0;
    let entries = analysis.plan.entries.iter().skip(1);
    for ((record, class), entry) in analysis.records.iter().zip(&analysis.classes).skip(1).zip(entries) {
        if entry.is_boundary {
            checkpoint += 1;
        }
        debug_assert_eq!(entry.target, PlanTarget::Commit(record.id));
        println!(
            "{}  {:<8}  checkpoint {:>3}{}  {}",
            record.short_id(),
            class.to_string(),
            checkpoint + 1,
            if entry.is_boundary { " (new)" } else { "" },
            record.message.lines().next().unwrap_or("")
        );
    }

    for (i, segment) in analysis.plan.segments().iter().enumerate() {
        println!(
            "checkpoint {:>3}: {} commit(s), metadata from {}",
            i + 1,
            segment.members.len(),
            short(segment.representative)
        );
    }
}
