//! Bot configuration
//!
//! Loaded once at startup and immutable afterwards. The orchestrator takes
//! a `BotConfig` at construction; nothing reads configuration globally.

mod storage;

pub use storage::{
    REPOS_ROOT_ENV, config_template, default_config_path, load_config, parse_config,
    save_config,
};

use crate::error::{Error, Result};
use crate::types::Identity;
use crate::validate::is_valid_branch_name;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Branch every merge lands on unless configured otherwise
pub const DEFAULT_TARGET_BRANCH: &str = "develop";

/// Remote every project is cloned from
pub const DEFAULT_REMOTE: &str = "origin";

/// Merge commit message used when no template is configured
pub const DEFAULT_COMMIT_TEMPLATE: &str =
    "Merge branch '{branch}' into {target}\n\nMerge authorized by {user} via chat.";

/// A configured project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Remote repository URL (anything `git clone` accepts)
    pub repo_url: String,
    /// GitHub organization owning the repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_org: Option<String>,
}

/// GPG signing settings for merge commits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Key id passed to `git commit -S`
    pub key: String,
}

/// Branches that may never be merged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForbiddenBranches(BTreeSet<String>);

impl ForbiddenBranches {
    /// Check if a branch is on the deny list
    pub fn contains(&self, branch: &str) -> bool {
        self.0.contains(branch)
    }

    /// Sorted branch names
    pub fn names(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }

    /// Check if the deny list is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ForbiddenBranches {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Complete bot configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Directory holding one working copy per project
    pub repos_root: PathBuf,
    /// Branches that may never be used as a merge source
    #[serde(default)]
    pub forbidden_branches: ForbiddenBranches,
    /// Destination of every merge
    #[serde(default = "default_target_branch")]
    pub target_branch: String,
    /// Remote name used for fetch and push
    #[serde(default = "default_remote")]
    pub remote: String,
    /// Committer identity of the bot
    pub identity: Identity,
    /// Signing settings; merge commits are unsigned when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing: Option<SigningConfig>,
    /// Merge commit message template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_template: Option<String>,
    /// Projects by name
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectConfig>,
}

fn default_target_branch() -> String {
    DEFAULT_TARGET_BRANCH.to_string()
}

fn default_remote() -> String {
    DEFAULT_REMOTE.to_string()
}

impl BotConfig {
    /// Look up a project by name (case-insensitive)
    pub fn project(&self, name: &str) -> Option<&ProjectConfig> {
        self.projects.get(&name.to_lowercase())
    }

    /// Local working copy path for a project
    pub fn project_root(&self, name: &str) -> PathBuf {
        self.repos_root.join(name.to_lowercase())
    }

    /// Check if a branch may not be used as a merge source
    ///
    /// The target branch is always forbidden, listed or not.
    pub fn is_forbidden(&self, branch: &str) -> bool {
        branch == self.target_branch || self.forbidden_branches.contains(branch)
    }

    /// Every forbidden branch, including the target branch
    pub fn forbidden_names(&self) -> Vec<String> {
        let mut names = self.forbidden_branches.names();
        if !names.contains(&self.target_branch) {
            names.push(self.target_branch.clone());
        }
        names
    }

    /// Merge commit message template in effect
    pub fn commit_template(&self) -> &str {
        self.commit_template
            .as_deref()
            .unwrap_or(DEFAULT_COMMIT_TEMPLATE)
    }

    /// Validate the configuration and normalize project names to lower case
    pub fn validate(mut self) -> Result<Self> {
        if self.projects.is_empty() {
            return Err(Error::Config(
                "your configuration must include a projects table with at least one project configured"
                    .to_string(),
            ));
        }

        let mut normalized = BTreeMap::new();
        for (name, project) in std::mem::take(&mut self.projects) {
            let key = name.trim().to_lowercase();
            if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
                return Err(Error::Config(format!("invalid project name '{name}'")));
            }
            if project.repo_url.trim().is_empty() {
                return Err(Error::Config(format!("project '{name}' has an empty repo_url")));
            }
            if normalized.insert(key, project).is_some() {
                return Err(Error::Config(format!(
                    "project '{name}' is configured more than once (names are case-insensitive)"
                )));
            }
        }
        self.projects = normalized;

        if !is_valid_branch_name(&self.target_branch) {
            return Err(Error::Config(format!(
                "target_branch '{}' is not a valid branch name",
                self.target_branch
            )));
        }
        if self.remote.trim().is_empty() || self.remote.starts_with('-') {
            return Err(Error::Config(format!("invalid remote '{}'", self.remote)));
        }
        if self.identity.name.trim().is_empty() || self.identity.email.trim().is_empty() {
            return Err(Error::Config(
                "identity.name and identity.email must both be set".to_string(),
            ));
        }
        if let Some(signing) = &self.signing {
            if signing.key.trim().is_empty() || signing.key.starts_with('-') {
                return Err(Error::Config(format!(
                    "invalid signing key '{}'",
                    signing.key
                )));
            }
        }
        if self.repos_root.as_os_str().is_empty() {
            return Err(Error::Config("repos_root must be set".to_string()));
        }

        Ok(self)
    }

    /// Replace the repos root (used for the `REPOS_ROOT` override)
    #[must_use]
    pub fn with_repos_root(mut self, repos_root: impl AsRef<Path>) -> Self {
        self.repos_root = repos_root.as_ref().to_path_buf();
        self
    }
}
