//! Real git repositories for end-to-end tests
//!
//! A bare repository plays the remote; a seed clone is used to create
//! branches and commits on it, the way a developer would.

use merge_bot::config::{BotConfig, ProjectConfig};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Check if a usable `git` is on PATH
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|o| o.status.success())
}

/// A bare remote with `develop` checked out as HEAD, plus a seed clone
pub struct GitFixture {
    pub temp: TempDir,
    pub remote: PathBuf,
    pub seed: PathBuf,
    pub repos_root: PathBuf,
}

impl GitFixture {
    /// Create the remote with one commit on `develop`
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let remote = temp.path().join("remote.git");
        let seed = temp.path().join("seed");
        let repos_root = temp.path().join("repos");

        run_git(temp.path(), &["init", "-q", "--bare", path_str(&remote)]);
        run_git(&remote, &["symbolic-ref", "HEAD", "refs/heads/develop"]);

        run_git(temp.path(), &["init", "-q", path_str(&seed)]);
        run_git(&seed, &["symbolic-ref", "HEAD", "refs/heads/develop"]);
        run_git(&seed, &["remote", "add", "origin", path_str(&remote)]);

        let fixture = Self {
            temp,
            remote,
            seed,
            repos_root,
        };
        fixture.commit("README.md", "hello\n", ("Seed", "seed@example.com"), "initial");
        fixture.seed_git(&["push", "-q", "origin", "develop"]);
        fixture
    }

    /// Run git in the seed clone
    pub fn seed_git(&self, args: &[&str]) -> String {
        run_git(&self.seed, args)
    }

    /// Run git against the bare remote
    pub fn remote_git(&self, args: &[&str]) -> String {
        run_git(&self.remote, args)
    }

    /// Commit id of a branch on the remote, if it exists
    pub fn remote_branch(&self, branch: &str) -> Option<String> {
        let spec = format!("refs/heads/{branch}");
        let output = Command::new("git")
            .current_dir(&self.remote)
            .args(["rev-parse", "--verify", "--quiet", spec.as_str()])
            .output()
            .unwrap();
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Write a file and commit it on the current seed branch
    pub fn commit(&self, file: &str, content: &str, author: (&str, &str), message: &str) {
        std::fs::write(self.seed.join(file), content).unwrap();
        self.seed_git(&["add", file]);
        let name = format!("user.name={}", author.0);
        let email = format!("user.email={}", author.1);
        self.seed_git(&[
            "-c",
            name.as_str(),
            "-c",
            email.as_str(),
            "-c",
            "commit.gpgsign=false",
            "commit",
            "-q",
            "-m",
            message,
        ]);
    }

    /// Branch off develop, commit one file as `author`, and push it
    pub fn push_branch(&self, branch: &str, file: &str, content: &str, author: (&str, &str)) {
        self.seed_git(&["checkout", "-q", "-B", branch, "develop"]);
        self.commit(file, content, author, &format!("work on {branch}"));
        self.seed_git(&["push", "-q", "origin", branch]);
        self.seed_git(&["checkout", "-q", "develop"]);
    }

    /// Commit one file on develop and push it
    pub fn push_develop(&self, file: &str, content: &str) {
        self.seed_git(&["checkout", "-q", "develop"]);
        self.commit(file, content, ("Seed", "seed@example.com"), "develop moves on");
        self.seed_git(&["push", "-q", "origin", "develop"]);
    }

    /// Configuration with a single project `foo` pointing at the remote
    pub fn config(&self) -> BotConfig {
        let mut config = super::test_config(&self.repos_root);
        config.projects.clear();
        config.projects.insert(
            "foo".to_string(),
            ProjectConfig {
                repo_url: path_str(&self.remote).to_string(),
                github_org: None,
            },
        );
        config
    }

    /// Run git in the bot's working copy, reporting success instead of asserting
    pub fn try_working_git(&self, args: &[&str]) -> bool {
        Command::new("git")
            .current_dir(self.working_copy())
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .is_ok_and(|o| o.status.success())
    }

    /// The bot's working copy of `foo`
    pub fn working_copy(&self) -> PathBuf {
        self.repos_root.join("foo")
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
