//! Shared test fixtures

#![allow(dead_code)]

mod git_fixture;
mod mock_git;

pub use git_fixture::{GitFixture, git_available};
pub use mock_git::{HEAD_SHA, MockGit};

use async_trait::async_trait;
use merge_bot::config::{BotConfig, ProjectConfig, SigningConfig};
use merge_bot::merge::MergeOrchestrator;
use merge_bot::progress::ProgressCallback;
use merge_bot::types::{Identity, MergeRequest, MergeStep};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Bot identity used by every test configuration
pub fn bot_identity() -> Identity {
    Identity::new("Merge Bot", "merge-bot@example.com")
}

/// Configuration with projects `foo` and `baz`, unsigned
pub fn test_config(repos_root: &Path) -> BotConfig {
    let mut projects = BTreeMap::new();
    for name in ["foo", "baz"] {
        projects.insert(
            name.to_string(),
            ProjectConfig {
                repo_url: format!("git@github.com:netquity/{name}.git"),
                github_org: Some("netquity".to_string()),
            },
        );
    }
    BotConfig {
        repos_root: repos_root.to_path_buf(),
        forbidden_branches: ["master", "develop"].into_iter().collect(),
        target_branch: "develop".to_string(),
        remote: "origin".to_string(),
        identity: bot_identity(),
        signing: None,
        commit_template: None,
        projects,
    }
}

/// Same as [`test_config`] with a signing key
pub fn signed_config(repos_root: &Path) -> BotConfig {
    BotConfig {
        signing: Some(SigningConfig {
            key: "ABCDEF0123456789".to_string(),
        }),
        ..test_config(repos_root)
    }
}

/// Pretend a project has already been cloned
pub fn fake_clone(repos_root: &Path, project: &str) {
    std::fs::create_dir_all(repos_root.join(project).join(".git")).unwrap();
}

/// Orchestrator over a config and a shared mock
pub fn orchestrator(config: BotConfig, git: &Arc<MockGit>) -> MergeOrchestrator {
    MergeOrchestrator::new(Arc::new(config), git.clone())
}

/// The canonical request: merge `bar` into develop of `foo`
pub fn request(branch: &str) -> MergeRequest {
    MergeRequest::new("foo", branch, "Jane Doe")
}

/// Progress callback that remembers what it was told
#[derive(Default)]
pub struct RecordingProgress {
    steps: Mutex<Vec<MergeStep>>,
    messages: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn steps(&self) -> Vec<MergeStep> {
        self.steps.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressCallback for RecordingProgress {
    async fn on_step(&self, step: MergeStep, _project: &str) {
        self.steps.lock().unwrap().push(step);
    }

    async fn on_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
