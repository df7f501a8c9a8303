//! CLI command implementations

pub mod chat;
pub mod config;
pub mod context;
pub mod merge;
pub mod setup;
pub mod style;

use async_trait::async_trait;
use indicatif::ProgressBar;
use merge_bot::progress::ProgressCallback;
use merge_bot::types::MergeStep;
use std::time::Duration;
use style::{Stylize, spinner_style};

/// Spinner-driven progress for interactive merges
pub struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    /// Start a spinner
    pub fn spinner() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    /// Stop the spinner and clear its line
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_step(&self, step: MergeStep, project: &str) {
        let message = match step {
            MergeStep::Validate => "Validating request...".to_string(),
            MergeStep::Prepare => format!("Preparing working copy for {}...", project.emphasis()),
            MergeStep::Fetch => "Fetching...".to_string(),
            MergeStep::Checkout => "Checking out...".to_string(),
            MergeStep::Merge => "Merging...".to_string(),
            MergeStep::Commit => "Committing...".to_string(),
            MergeStep::Push => "Pushing...".to_string(),
            MergeStep::DeleteBranch => "Deleting source branch...".to_string(),
        };
        self.spinner.set_message(message);
    }

    async fn on_message(&self, message: &str) {
        self.spinner.println(message.muted());
    }
}
