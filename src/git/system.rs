//! `GitRunner` backed by the `git` executable

use super::{GitInvocation, GitRunner};
use crate::error::GitCommandError;
use async_trait::async_trait;
use std::ffi::OsString;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Spawns the system `git`
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: OsString,
}

impl SystemGit {
    /// Use `git` from `PATH`
    pub fn new() -> Self {
        Self {
            program: OsString::from("git"),
        }
    }

    /// Use a specific git executable
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitRunner for SystemGit {
    async fn run(&self, invocation: GitInvocation) -> Result<String, GitCommandError> {
        let command_line = invocation.display_args();
        debug!(cwd = ?invocation.cwd, command = %command_line, "running git");

        let mut cmd = Command::new(&self.program);
        cmd.args(&invocation.args)
            // never block on a credential prompt
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &invocation.envs {
            cmd.env(key, value);
        }

        let output = cmd.output().await.map_err(|e| GitCommandError {
            command: command_line.clone(),
            code: None,
            output: format!("failed to run git: {e}"),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let combined = [stdout.as_str(), stderr.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        debug!(command = %command_line, code = ?output.status.code(), "git failed");

        Err(GitCommandError {
            command: command_line,
            code: output.status.code(),
            output: combined,
        })
    }
}
