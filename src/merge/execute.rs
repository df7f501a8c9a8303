//! Merge execution - effectful operations
//!
//! This module contains the effectful code that actually performs a merge.
//! It takes a `MergePlan` (created by the pure planning functions) and runs
//! the git commands against the project's working copy. The caller is
//! responsible for holding the project's lock.

use crate::error::{Error, GitCommandError, Result};
use crate::git::{GitRunner, ProjectRepo};
use crate::merge::plan::MergePlan;
use crate::progress::ProgressCallback;
use crate::types::{Identity, MergeReport, MergeStep};
use chrono::Utc;
use tracing::{info, warn};

/// Execute the merge plan (EFFECTFUL)
///
/// Stops at the first hard failure. A failed merge or commit is aborted so
/// the working copy is left on a clean target branch; nothing is pushed
/// unless a merge commit was created. Branch deletion failures become
/// warnings on the returned report.
pub async fn execute_plan(
    plan: &MergePlan,
    git: &dyn GitRunner,
    progress: &dyn ProgressCallback,
) -> Result<MergeReport> {
    let repo = ProjectRepo::new(git, &plan.project_root, &plan.remote);
    let project = plan.project.as_str();
    let branch = plan.source_branch.as_str();
    let target = plan.target_branch.as_str();

    progress.on_step(MergeStep::Prepare, project).await;
    ensure_working_copy(&repo, plan).await?;

    progress.on_step(MergeStep::Fetch, project).await;
    repo.fetch().await.map_err(|source| Error::Fetch {
        project: project.to_string(),
        source,
    })?;

    progress.on_step(MergeStep::Checkout, project).await;
    discard_leftovers(&repo, project, progress)
        .await
        .map_err(|source| Error::Checkout {
            project: project.to_string(),
            branch: target.to_string(),
            source,
        })?;
    repo.checkout_from_remote(target)
        .await
        .map_err(|source| Error::Checkout {
            project: project.to_string(),
            branch: target.to_string(),
            source,
        })?;

    let source_ref = repo.remote_ref(branch);
    let checkout_error = |source: GitCommandError| Error::Checkout {
        project: project.to_string(),
        branch: branch.to_string(),
        source,
    };
    repo.resolve(&source_ref.full_name())
        .await
        .map_err(|mut source| {
            source.output = format!("branch {branch} does not exist on {}", plan.remote);
            checkout_error(source)
        })?;
    let author = repo
        .last_commit_author(&source_ref.full_name())
        .await
        .map_err(checkout_error)?;

    progress.on_step(MergeStep::Merge, project).await;
    if let Err(source) = repo
        .merge_no_commit(&source_ref.full_name(), &plan.committer)
        .await
    {
        abort_merge(&repo, project).await;
        return Err(Error::MergeConflict {
            project: project.to_string(),
            branch: branch.to_string(),
            target: target.to_string(),
            source,
        });
    }

    if !repo.merge_in_progress().await {
        // nothing to merge: the branch is already part of the target
        let commit = repo.head().await.map_err(|e| Error::Internal(e.to_string()))?;
        info!(project, branch, commit = %commit, "branch already merged; nothing to push");
        progress
            .on_message(&format!("{branch} is already merged into {target}"))
            .await;
        let warnings = delete_source_branch(&repo, plan, progress).await;
        return Ok(report(plan, commit, author, true, warnings));
    }

    progress.on_step(MergeStep::Commit, project).await;
    if let Err(source) = repo
        .commit_merge(
            &plan.commit_message,
            &author,
            &plan.committer,
            plan.signing_key.as_deref(),
        )
        .await
    {
        abort_merge(&repo, project).await;
        return Err(if plan.is_signed() {
            Error::Signing {
                project: project.to_string(),
                branch: branch.to_string(),
                source,
            }
        } else {
            Error::Commit {
                project: project.to_string(),
                branch: branch.to_string(),
                source,
            }
        });
    }
    let commit = repo.head().await.map_err(|e| Error::Internal(e.to_string()))?;
    info!(project, branch, commit = %commit, signed = plan.is_signed(), "created merge commit");

    progress.on_step(MergeStep::Push, project).await;
    repo.push(target).await.map_err(|source| Error::Push {
        project: project.to_string(),
        branch: branch.to_string(),
        target: target.to_string(),
        commit: commit.clone(),
        source,
    })?;
    info!(project, target, commit = %commit, "pushed merge");

    let warnings = delete_source_branch(&repo, plan, progress).await;
    Ok(report(plan, commit, author, false, warnings))
}

async fn ensure_working_copy(repo: &ProjectRepo<'_>, plan: &MergePlan) -> Result<()> {
    if repo.is_cloned() {
        return Ok(());
    }
    if let Some(parent) = plan.project_root.parent() {
        std::fs::create_dir_all(parent)?;
    }
    info!(project = %plan.project, url = %plan.repo_url, "cloning working copy");
    repo.clone_from(&plan.repo_url)
        .await
        .map_err(|source| Error::WorkingCopy {
            project: plan.project.clone(),
            source,
        })
}

/// Clear whatever an interrupted run left in the working copy
///
/// A killed merge leaves `MERGE_HEAD` and a conflicted index behind, which
/// would make every later checkout fail.
async fn discard_leftovers(
    repo: &ProjectRepo<'_>,
    project: &str,
    progress: &dyn ProgressCallback,
) -> std::result::Result<(), GitCommandError> {
    if repo.merge_in_progress().await {
        warn!(project, "discarding unfinished merge left in the working copy");
        progress
            .on_message("discarding an unfinished merge from a previous run")
            .await;
    }
    repo.reset_hard().await
}

async fn abort_merge(repo: &ProjectRepo<'_>, project: &str) {
    if !repo.merge_in_progress().await {
        return;
    }
    if let Err(e) = repo.abort_merge().await {
        warn!(project, error = %e, "failed to abort merge");
    }
}

/// Best-effort removal of the source branch; failures come back as warnings
async fn delete_source_branch(
    repo: &ProjectRepo<'_>,
    plan: &MergePlan,
    progress: &dyn ProgressCallback,
) -> Vec<String> {
    let project = plan.project.as_str();
    let branch = plan.source_branch.as_str();
    let mut warnings = Vec::new();

    progress.on_step(MergeStep::DeleteBranch, project).await;
    if let Err(source) = repo.delete_remote_branch(branch).await {
        let err = Error::BranchDeletion {
            project: project.to_string(),
            branch: branch.to_string(),
            location: "remote",
            source,
        };
        warn!(project, branch, error = %err, "remote branch deletion failed");
        warnings.push(err.to_string());
    }

    if repo.local_branch_exists(branch).await {
        if let Err(source) = repo.delete_local_branch(branch).await {
            let err = Error::BranchDeletion {
                project: project.to_string(),
                branch: branch.to_string(),
                location: "local",
                source,
            };
            warn!(project, branch, error = %err, "local branch deletion failed");
            warnings.push(err.to_string());
        }
    }

    for warning in &warnings {
        progress.on_message(warning).await;
    }
    warnings
}

fn report(
    plan: &MergePlan,
    commit: String,
    author: Identity,
    already_merged: bool,
    warnings: Vec<String>,
) -> MergeReport {
    MergeReport {
        project: plan.project.clone(),
        source_branch: plan.source_branch.clone(),
        target_branch: plan.target_branch.clone(),
        commit,
        author,
        authorized_by: plan.authorized_by.clone(),
        already_merged,
        warnings,
        completed_at: Utc::now(),
    }
}
