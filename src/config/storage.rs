//! Reading and writing the TOML configuration file.

use super::{BotConfig, DEFAULT_REMOTE, DEFAULT_TARGET_BRANCH, ProjectConfig};
use crate::error::{Error, Result};
use crate::types::Identity;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `repos_root`
pub const REPOS_ROOT_ENV: &str = "REPOS_ROOT";

/// Directory name for merge-bot within the user config dir.
const CONFIG_DIR: &str = "merge-bot";

/// Filename for the configuration.
const CONFIG_FILE: &str = "config.toml";

/// Default configuration path (`<config dir>/merge-bot/config.toml`).
///
/// Returns `None` on platforms without a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<BotConfig> {
    let config: BotConfig =
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse: {e}")))?;
    config.validate()
}

/// Load configuration from disk.
///
/// `REPOS_ROOT` in the environment takes precedence over the file.
pub fn load_config(path: &Path) -> Result<BotConfig> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "merge-bot is not configured: {} does not exist (run `mergebot config template`)",
            path.display()
        )));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    let mut config = parse_config(&content)
        .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;

    if let Some(root) = std::env::var_os(REPOS_ROOT_ENV).filter(|v| !v.is_empty()) {
        tracing::debug!(repos_root = ?root, "repos root overridden from environment");
        config = config.with_repos_root(PathBuf::from(root));
    }

    Ok(config)
}

/// Save configuration to disk.
///
/// Creates the parent directory if it doesn't exist.
pub fn save_config(path: &Path, config: &BotConfig) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)
                .map_err(|e| Error::Config(format!("failed to create {}: {e}", dir.display())))?;
        }
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("failed to serialize configuration: {e}")))?;

    let content_with_header = format!("# merge-bot configuration\n\n{content}");

    fs::write(path, content_with_header)
        .map_err(|e| Error::Config(format!("failed to write {}: {e}", path.display())))?;

    Ok(())
}

/// Example configuration with every supported key.
pub fn config_template() -> BotConfig {
    BotConfig {
        repos_root: PathBuf::from("/home/web/repos/"),
        forbidden_branches: ["master", "develop"].into_iter().collect(),
        target_branch: DEFAULT_TARGET_BRANCH.to_string(),
        remote: DEFAULT_REMOTE.to_string(),
        identity: Identity::new("Merge Bot", "merge-bot@example.com"),
        signing: None,
        commit_template: None,
        projects: BTreeMap::from([(
            "some-project".to_string(),
            ProjectConfig {
                repo_url: "git@github.com:netquity/some-project.git".to_string(),
                github_org: Some("netquity".to_string()),
            },
        )]),
    }
}
