//! The `merge` chat command

use super::{Card, CardColor, ChatMessage, CommandHandler};
use crate::error::Error;
use crate::merge::MergeOrchestrator;
use crate::progress::NoProgress;
use crate::types::{MergeReport, MergeRequest};
use async_trait::async_trait;
use clap::Parser;
use std::sync::Arc;

/// Arguments of `merge --branch-name <name> --project-name <name>`
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "merge", no_binary_name = true, disable_help_flag = true)]
pub struct MergeArgs {
    /// Branch to merge
    #[arg(long = "branch-name")]
    pub branch_name: String,
    /// Project to merge in (case-insensitive)
    #[arg(long = "project-name", value_parser = lowercase)]
    pub project_name: String,
}

fn lowercase(value: &str) -> Result<String, String> {
    Ok(value.to_lowercase())
}

impl MergeArgs {
    /// Parse chat arguments
    pub fn parse_args(args: &[String]) -> Result<Self, String> {
        Self::try_parse_from(args).map_err(|e| e.render().to_string().trim().to_string())
    }
}

/// Handler for the `merge` command
pub struct MergeCommand {
    orchestrator: Arc<MergeOrchestrator>,
}

impl MergeCommand {
    /// Create the handler around a shared orchestrator
    pub const fn new(orchestrator: Arc<MergeOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

#[async_trait]
impl CommandHandler for MergeCommand {
    fn description(&self) -> &str {
        "Merge a branch into the target branch: merge --branch-name <name> --project-name <name>"
    }

    async fn handle(&self, message: &ChatMessage, args: &[String]) -> Card {
        let args = match MergeArgs::parse_args(args) {
            Ok(args) => args,
            Err(usage) => return Card::failure().body(usage),
        };

        let request = MergeRequest::new(
            args.project_name,
            args.branch_name,
            message.sender.display_name(),
        );
        match self.orchestrator.execute(&request, &NoProgress).await {
            Ok(report) => success_card(&report),
            Err(err) => failure_card(&request, &err),
        }
    }
}

/// Card announcing a completed merge
pub fn success_card(report: &MergeReport) -> Card {
    let pretext = if report.already_merged {
        format!(
            "{} was already merged into {} for {}; nothing to push.",
            report.source_branch, report.target_branch, report.project
        )
    } else {
        format!("I was able to complete the {} merge for you.", report.project)
    };

    let mut card = Card::success()
        .pretext(pretext)
        .field("Receiver Branch", &report.target_branch)
        .field("Giver Branch", &report.source_branch)
        .field("Commit", report.short_commit())
        .field("Authorized By", &report.authorized_by);

    if !report.is_clean() {
        card = card.color(CardColor::Yellow).body(report.warnings.join("\n"));
    }
    card
}

/// Card explaining why a merge did not happen
pub fn failure_card(request: &MergeRequest, err: &Error) -> Card {
    let mut card = Card::failure()
        .pretext(format!("I could not complete the {} merge.", request.project_name))
        .body(err.to_string())
        .field("Project", &request.project_name)
        .field("Branch", &request.branch_name);
    if let Some(step) = err.step() {
        card = card.field("Step", step.to_string());
    }
    card
}
