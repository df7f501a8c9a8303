//! Error types for merge-bot

use crate::types::MergeStep;
use thiserror::Error;

/// A `git` invocation that exited unsuccessfully (or could not be spawned)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("`git {command}` failed{}: {output}", exit_suffix(.code))]
pub struct GitCommandError {
    /// The git arguments, joined with spaces
    pub command: String,
    /// Exit code, if the process ran to completion
    pub code: Option<i32>,
    /// Combined stdout/stderr, trimmed
    pub output: String,
}

#[allow(clippy::ref_option)]
fn exit_suffix(code: &Option<i32>) -> String {
    code.map_or_else(String::new, |c| format!(" (exit {c})"))
}

fn join(branches: &[String]) -> String {
    branches.join(", ")
}

/// Error type for merge-bot operations
#[derive(Error, Debug)]
pub enum Error {
    /// Source branch is on the deny list
    #[error("{branch} is not a valid branch choice: {} are forbidden choices for --branch-name", join(.forbidden))]
    ForbiddenBranch {
        /// Requested source branch
        branch: String,
        /// Every branch that may not be merged
        forbidden: Vec<String>,
    },

    /// Project is not configured
    #[error("unknown project '{0}'")]
    UnknownProject(String),

    /// Branch name would not be a safe argument to git
    #[error("'{0}' is not a valid branch name")]
    InvalidBranchName(String),

    /// Request is malformed in some other way
    #[error("invalid merge request: {0}")]
    InvalidRequest(String),

    /// Local working copy could not be created
    #[error("could not prepare the working copy for {project}: {source}")]
    WorkingCopy {
        /// Project name
        project: String,
        /// Underlying git failure
        source: GitCommandError,
    },

    /// Fetching from the remote failed
    #[error("fetch failed for {project}: {source}")]
    Fetch {
        /// Project name
        project: String,
        /// Underlying git failure
        source: GitCommandError,
    },

    /// A branch could not be checked out or does not exist
    #[error("could not check out {branch} in {project}: {source}")]
    Checkout {
        /// Project name
        project: String,
        /// Branch that could not be resolved
        branch: String,
        /// Underlying git failure
        source: GitCommandError,
    },

    /// Merge could not be completed automatically; it was aborted
    #[error("{branch} does not merge cleanly into {target} for {project}; the merge was aborted: {source}")]
    MergeConflict {
        /// Project name
        project: String,
        /// Source branch
        branch: String,
        /// Target branch
        target: String,
        /// Underlying git failure
        source: GitCommandError,
    },

    /// Signing the merge commit failed; nothing was committed
    #[error("could not sign the merge of {branch} for {project}; nothing was committed: {source}")]
    Signing {
        /// Project name
        project: String,
        /// Source branch
        branch: String,
        /// Underlying git failure
        source: GitCommandError,
    },

    /// Creating the (unsigned) merge commit failed; nothing was committed
    #[error("could not commit the merge of {branch} for {project}: {source}")]
    Commit {
        /// Project name
        project: String,
        /// Source branch
        branch: String,
        /// Underlying git failure
        source: GitCommandError,
    },

    /// Pushing the target branch failed; the local branch is ahead of the remote
    #[error("push of {target} for {project} failed; local {target} is ahead of the remote at {commit}: {source}")]
    Push {
        /// Project name
        project: String,
        /// Source branch that was merged
        branch: String,
        /// Target branch that was not pushed
        target: String,
        /// Local merge commit that was not pushed
        commit: String,
        /// Underlying git failure
        source: GitCommandError,
    },

    /// Source branch could not be deleted after a successful merge
    #[error("could not delete {location} branch {branch} for {project}: {source}")]
    BranchDeletion {
        /// Project name
        project: String,
        /// Branch that survived
        branch: String,
        /// `"remote"` or `"local"`
        location: &'static str,
        /// Underlying git failure
        source: GitCommandError,
    },

    /// Configuration missing or invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// The merge procedure step this error belongs to
    ///
    /// Configuration and internal errors have no step.
    pub const fn step(&self) -> Option<MergeStep> {
        match self {
            Self::ForbiddenBranch { .. }
            | Self::UnknownProject(_)
            | Self::InvalidBranchName(_)
            | Self::InvalidRequest(_) => Some(MergeStep::Validate),
            Self::WorkingCopy { .. } => Some(MergeStep::Prepare),
            Self::Fetch { .. } => Some(MergeStep::Fetch),
            Self::Checkout { .. } => Some(MergeStep::Checkout),
            Self::MergeConflict { .. } => Some(MergeStep::Merge),
            Self::Signing { .. } | Self::Commit { .. } => Some(MergeStep::Commit),
            Self::Push { .. } => Some(MergeStep::Push),
            Self::BranchDeletion { .. } => Some(MergeStep::DeleteBranch),
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => None,
        }
    }

    /// Whether the error was raised before any git command ran
    pub const fn is_preflight(&self) -> bool {
        matches!(self.step(), Some(MergeStep::Validate))
    }
}

/// Result type alias for merge-bot operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn git_error() -> GitCommandError {
        GitCommandError {
            command: "push origin develop".to_string(),
            code: Some(1),
            output: "rejected".to_string(),
        }
    }

    #[test]
    fn test_git_command_error_display_includes_exit_code() {
        assert_eq!(
            git_error().to_string(),
            "`git push origin develop` failed (exit 1): rejected"
        );
    }

    #[test]
    fn test_git_command_error_display_without_exit_code() {
        let err = GitCommandError {
            code: None,
            ..git_error()
        };
        assert_eq!(err.to_string(), "`git push origin develop` failed: rejected");
    }

    #[test]
    fn test_forbidden_branch_lists_deny_list() {
        let err = Error::ForbiddenBranch {
            branch: "master".to_string(),
            forbidden: vec!["master".to_string(), "develop".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "master is not a valid branch choice: master, develop are forbidden choices for --branch-name"
        );
        assert!(err.is_preflight());
    }

    #[test]
    fn test_push_error_reports_local_commit() {
        let err = Error::Push {
            project: "foo".to_string(),
            branch: "bar".to_string(),
            target: "develop".to_string(),
            commit: "abc123".to_string(),
            source: git_error(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ahead of the remote at abc123"));
        assert_eq!(err.step(), Some(MergeStep::Push));
        assert!(!err.is_preflight());
    }

    #[test]
    fn test_config_error_has_no_step() {
        assert_eq!(Error::Config("missing".to_string()).step(), None);
    }
}
