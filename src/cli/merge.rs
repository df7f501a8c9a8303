//! Merge command - one-shot merge from the terminal

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, cross};
use anstream::println;
use dialoguer::Confirm;
use merge_bot::error::{Error, Result};
use merge_bot::merge::MergePlan;
use merge_bot::types::{MergeReport, MergeRequest};
use std::path::Path;

/// Options for the merge command
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Show the plan without touching any working copy
    pub dry_run: bool,
    /// Preview the plan and prompt for confirmation before executing
    pub confirm: bool,
    /// Print the report as JSON instead of text
    pub json: bool,
}

/// Run the merge command
pub async fn run_merge(
    config_path: Option<&Path>,
    request: MergeRequest,
    options: MergeOptions,
) -> Result<()> {
    let ctx = CommandContext::new(config_path)?;

    // Pre-flight validation happens here, before anything is touched
    let plan = ctx.orchestrator.plan(&request)?;

    if options.dry_run {
        report_dry_run(&plan);
        return Ok(());
    }

    if options.confirm {
        report_dry_run(&plan);
        if !Confirm::new()
            .with_prompt("Proceed with merge?")
            .default(false)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
        {
            println!("{}", "Aborted".muted());
            return Ok(());
        }
        println!();
    }

    let progress = CliProgress::spinner();
    let result = ctx.orchestrator.execute(&request, &progress).await;
    progress.finish();

    match result {
        Ok(report) if options.json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| Error::Internal(format!("Failed to serialize report: {e}")))?;
            println!("{json}");
            Ok(())
        }
        Ok(report) => {
            print_merge_summary(&report);
            Ok(())
        }
        Err(e) => {
            if let Some(step) = e.step() {
                println!("{} Failed at {}", cross(), step.to_string().emphasis());
            }
            Err(e)
        }
    }
}

/// Print what the merge would do
fn report_dry_run(plan: &MergePlan) {
    println!("{}:", "Merge plan".emphasis());
    println!();
    println!("  {} {}", "Project:".muted(), plan.project.accent());
    println!(
        "  {} {} {} {}",
        "Merge:".muted(),
        plan.source_ref().accent(),
        "→".muted(),
        plan.target_branch.accent()
    );
    println!("  {} {}", "Working copy:".muted(), plan.project_root.display());
    println!("  {} {}", "Committer:".muted(), plan.committer);
    println!(
        "  {} {}",
        "Signing:".muted(),
        plan.signing_key.as_deref().unwrap_or("disabled")
    );
    println!("  {}", "Message:".muted());
    for line in plan.commit_message.lines() {
        println!("    {line}");
    }
    println!();
}

/// Print merge summary
fn print_merge_summary(report: &MergeReport) {
    if report.already_merged {
        println!(
            "{} {} was already merged into {}",
            check(),
            report.source_branch.accent(),
            report.target_branch.accent()
        );
    } else {
        println!(
            "{} Merged {} into {} for {}",
            check(),
            report.source_branch.accent(),
            report.target_branch.accent(),
            report.project.emphasis()
        );
    }
    println!("   {} {}", "Commit:".muted(), report.commit);
    println!("   {} {}", "Author:".muted(), report.author);
    println!("   {} {}", "Authorized by:".muted(), report.authorized_by);

    for warning in &report.warnings {
        println!("{} {}", "⚠".warn(), warning.warn());
    }
}
