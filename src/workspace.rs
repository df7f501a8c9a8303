//! Working copies under `repos_root`

use crate::config::BotConfig;
use crate::error::{Error, Result};
use crate::git::{GitRunner, ProjectRepo};
use std::fs;
use tracing::{debug, info};

/// Clone every configured project that has no working copy yet
///
/// Creates `repos_root` if needed. Returns the names of the projects that
/// were cloned; existing working copies are left alone.
pub async fn setup_repos(config: &BotConfig, git: &dyn GitRunner) -> Result<Vec<String>> {
    fs::create_dir_all(&config.repos_root).map_err(|e| {
        Error::Config(format!(
            "cannot create repos_root {}: {e}",
            config.repos_root.display()
        ))
    })?;

    let mut cloned = Vec::new();
    for (name, project) in &config.projects {
        let repo = ProjectRepo::new(git, config.project_root(name), &config.remote);
        if repo.is_cloned() {
            debug!(project = %name, "working copy already present");
            continue;
        }

        info!(project = %name, url = %project.repo_url, "cloning working copy");
        repo.clone_from(&project.repo_url)
            .await
            .map_err(|source| Error::WorkingCopy {
                project: name.clone(),
                source,
            })?;
        cloned.push(name.clone());
    }

    Ok(cloned)
}
