//! Core types for merge-bot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A request to merge one branch into the target branch of a project
///
/// Created per chat command and discarded after processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    /// Configured project name (case-insensitive)
    pub project_name: String,
    /// Branch to merge from
    pub branch_name: String,
    /// Full name of the chat user who authorized the merge
    pub invoking_user_full_name: String,
}

impl MergeRequest {
    /// Create a new merge request
    pub fn new(
        project_name: impl Into<String>,
        branch_name: impl Into<String>,
        invoking_user_full_name: impl Into<String>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            branch_name: branch_name.into(),
            invoking_user_full_name: invoking_user_full_name.into(),
        }
    }
}

/// A git identity (name and email)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
}

impl Identity {
    /// Create a new identity
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Steps of the merge procedure, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStep {
    /// Pre-flight checks against configuration
    Validate,
    /// Ensure the local working copy exists
    Prepare,
    /// Fetch remote refs
    Fetch,
    /// Check out the target branch and resolve the source branch
    Checkout,
    /// Merge the source branch without committing
    Merge,
    /// Create (and sign) the merge commit
    Commit,
    /// Push the target branch
    Push,
    /// Delete the source branch locally and on the remote
    DeleteBranch,
}

impl std::fmt::Display for MergeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validate => write!(f, "validate"),
            Self::Prepare => write!(f, "prepare working copy"),
            Self::Fetch => write!(f, "fetch"),
            Self::Checkout => write!(f, "checkout"),
            Self::Merge => write!(f, "merge"),
            Self::Commit => write!(f, "commit"),
            Self::Push => write!(f, "push"),
            Self::DeleteBranch => write!(f, "delete branch"),
        }
    }
}

/// Outcome of a successful merge
///
/// Warnings hold best-effort failures (branch deletion) that happened
/// after the merge itself was pushed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeReport {
    /// Project name
    pub project: String,
    /// Branch that was merged
    pub source_branch: String,
    /// Branch that received the merge
    pub target_branch: String,
    /// Commit id now at the tip of the target branch
    pub commit: String,
    /// Author of the last commit on the source branch
    pub author: Identity,
    /// Full name of the user who authorized the merge
    pub authorized_by: String,
    /// True when the source branch was already contained in the target
    /// and nothing was committed or pushed
    pub already_merged: bool,
    /// Non-fatal problems, rendered as messages
    pub warnings: Vec<String>,
    /// When the procedure finished
    pub completed_at: DateTime<Utc>,
}

impl MergeReport {
    /// Check if the merge finished without warnings
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Abbreviated commit id for display
    #[must_use]
    pub fn short_commit(&self) -> &str {
        self.commit.get(..10).unwrap_or(&self.commit)
    }
}
