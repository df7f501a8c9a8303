//! Merge planning - pure functions for validating requests
//!
//! This module turns a `MergeRequest` into a `MergePlan` using only the
//! configuration. No I/O happens here; every pre-flight rejection comes
//! from `create_merge_plan`, before a single git command runs.

use crate::config::BotConfig;
use crate::error::{Error, Result};
use crate::types::{Identity, MergeRequest, MergeStep};
use crate::validate::is_valid_branch_name;
use std::path::PathBuf;

/// Everything needed to carry out one merge
///
/// Created by `create_merge_plan()` (pure) and carried out by
/// `execute_plan()` (effectful).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    /// Normalized project name
    pub project: String,
    /// Remote URL to clone from
    pub repo_url: String,
    /// Local working copy
    pub project_root: PathBuf,
    /// Remote name
    pub remote: String,
    /// Branch being merged
    pub source_branch: String,
    /// Branch receiving the merge
    pub target_branch: String,
    /// Full name of the user who authorized the merge
    pub authorized_by: String,
    /// Bot identity used as committer
    pub committer: Identity,
    /// GPG key to sign with, if signing is configured
    pub signing_key: Option<String>,
    /// Merge commit message
    pub commit_message: String,
}

impl MergePlan {
    /// Remote-tracking name of the source branch (e.g. `origin/feature`)
    pub fn source_ref(&self) -> String {
        format!("{}/{}", self.remote, self.source_branch)
    }

    /// Steps that will run, in order
    pub const fn steps() -> [MergeStep; 7] {
        [
            MergeStep::Prepare,
            MergeStep::Fetch,
            MergeStep::Checkout,
            MergeStep::Merge,
            MergeStep::Commit,
            MergeStep::Push,
            MergeStep::DeleteBranch,
        ]
    }

    /// Whether the merge commit will be signed
    pub const fn is_signed(&self) -> bool {
        self.signing_key.is_some()
    }
}

impl std::fmt::Display for MergePlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "merge {} into {} for {} (authorized by {}",
            self.source_ref(),
            self.target_branch,
            self.project,
            self.authorized_by
        )?;
        if self.is_signed() {
            write!(f, ", signed")?;
        }
        write!(f, ")")
    }
}

/// Fill in a merge commit message template
///
/// Supported placeholders: `{branch}`, `{target}`, `{project}`, `{user}`.
pub fn render_commit_message(
    template: &str,
    branch: &str,
    target: &str,
    project: &str,
    user: &str,
) -> String {
    let message = template
        .replace("{branch}", branch)
        .replace("{target}", target)
        .replace("{project}", project)
        .replace("{user}", user);
    if template.contains("{user}") {
        message
    } else {
        // the authorizing user is always recorded
        format!("{message}\n\nMerge authorized by {user} via chat.")
    }
}

/// Create a merge plan (PURE - no I/O, easily testable)
///
/// Checks, in order:
/// 1. the branch is not forbidden (the target branch always is)
/// 2. the project is configured
/// 3. the branch name is safe to pass to git
/// 4. the invoking user has a name to record
pub fn create_merge_plan(config: &BotConfig, request: &MergeRequest) -> Result<MergePlan> {
    let branch = request.branch_name.trim();
    if config.is_forbidden(branch) {
        return Err(Error::ForbiddenBranch {
            branch: branch.to_string(),
            forbidden: config.forbidden_names(),
        });
    }

    let project_name = request.project_name.trim().to_lowercase();
    let Some(project) = config.project(&project_name) else {
        return Err(Error::UnknownProject(project_name));
    };

    if !is_valid_branch_name(branch) {
        return Err(Error::InvalidBranchName(request.branch_name.clone()));
    }

    let authorized_by = request.invoking_user_full_name.trim();
    if authorized_by.is_empty() {
        return Err(Error::InvalidRequest(
            "the invoking user's full name is empty".to_string(),
        ));
    }

    let commit_message = render_commit_message(
        config.commit_template(),
        branch,
        &config.target_branch,
        &project_name,
        authorized_by,
    );

    Ok(MergePlan {
        project_root: config.project_root(&project_name),
        project: project_name,
        repo_url: project.repo_url.clone(),
        remote: config.remote.clone(),
        source_branch: branch.to_string(),
        target_branch: config.target_branch.clone(),
        authorized_by: authorized_by.to_string(),
        committer: config.identity.clone(),
        signing_key: config.signing.as_ref().map(|s| s.key.clone()),
        commit_message,
    })
}
