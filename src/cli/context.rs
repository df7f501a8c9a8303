//! Shared command context for CLI commands
//!
//! Loads the configuration once and builds the orchestrator every command
//! works through.

use merge_bot::config::{BotConfig, default_config_path, load_config};
use merge_bot::error::{Error, Result};
use merge_bot::git::{GitRunner, SystemGit};
use merge_bot::merge::MergeOrchestrator;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared context for CLI commands
pub struct CommandContext {
    /// Where the configuration came from
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: Arc<BotConfig>,
    /// Git runner shared by every operation
    pub git: Arc<dyn GitRunner>,
    /// Orchestrator over `config` and `git`
    pub orchestrator: Arc<MergeOrchestrator>,
}

impl CommandContext {
    /// Load configuration and build the orchestrator
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config_path = resolve_config_path(config_path)?;
        let config = Arc::new(load_config(&config_path)?);
        let git: Arc<dyn GitRunner> = Arc::new(SystemGit::new());
        let orchestrator = Arc::new(MergeOrchestrator::new(
            Arc::clone(&config),
            Arc::clone(&git),
        ));

        Ok(Self {
            config_path,
            config,
            git,
            orchestrator,
        })
    }
}

/// Explicit path, else the default location
pub fn resolve_config_path(config_path: Option<&Path>) -> Result<PathBuf> {
    config_path
        .map(Path::to_path_buf)
        .or_else(default_config_path)
        .ok_or_else(|| {
            Error::Config("no configuration directory on this platform; pass --config".to_string())
        })
}
