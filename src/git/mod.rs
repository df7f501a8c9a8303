//! Git access
//!
//! Every git operation goes through the [`GitRunner`] trait so the merge
//! procedure can run against the real executable or a recording mock.

mod repo;
mod system;

pub use repo::{ProjectRepo, RemoteRef};
pub use system::SystemGit;

use crate::error::GitCommandError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// One git command line to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInvocation {
    /// Working directory (`None` runs in the process cwd)
    pub cwd: Option<PathBuf>,
    /// Arguments after `git`
    pub args: Vec<String>,
    /// Extra environment variables
    pub envs: Vec<(String, String)>,
}

impl GitInvocation {
    /// Build an invocation running in `cwd`
    pub fn new<I, S>(cwd: &Path, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cwd: Some(cwd.to_path_buf()),
            args: args.into_iter().map(Into::into).collect(),
            envs: Vec::new(),
        }
    }

    /// Add an environment variable
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Look up an environment variable set on this invocation
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.envs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Arguments joined for logs and error messages
    pub fn display_args(&self) -> String {
        self.args.join(" ")
    }

    /// Check if the arguments start with the given prefix
    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        self.args.len() >= prefix.len() && self.args.iter().zip(prefix).all(|(a, p)| a == p)
    }

    /// The git subcommand, skipping leading `-c key=value` pairs
    pub fn subcommand(&self) -> Option<&str> {
        let mut args = self.args.iter();
        while let Some(arg) = args.next() {
            if arg == "-c" {
                args.next();
                continue;
            }
            return Some(arg.as_str());
        }
        None
    }
}

/// Runs git commands
///
/// Implementations return trimmed stdout on success. A non-zero exit is a
/// [`GitCommandError`] carrying the combined output.
#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Run one git command to completion
    async fn run(&self, invocation: GitInvocation) -> Result<String, GitCommandError>;
}
