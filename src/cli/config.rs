//! Config command - print a template or check a configuration

use crate::cli::context::resolve_config_path;
use crate::cli::style::{Stylize, check};
use anstream::println;
use merge_bot::config::{config_template, load_config, save_config};
use merge_bot::error::{Error, Result};
use std::path::Path;

/// Print the configuration template, or write it to `output`
pub fn run_template(output: Option<&Path>) -> Result<()> {
    let template = config_template();
    if let Some(path) = output {
        if path.exists() {
            return Err(Error::Config(format!(
                "{} already exists; refusing to overwrite",
                path.display()
            )));
        }
        save_config(path, &template)?;
        println!("{} Wrote {}", check(), path.display());
        return Ok(());
    }

    let content = toml::to_string_pretty(&template)
        .map_err(|e| Error::Config(format!("failed to serialize template: {e}")))?;
    println!("{content}");
    Ok(())
}

/// Load and validate the configuration, then summarize it
pub fn run_check(config_path: Option<&Path>) -> Result<()> {
    let path = resolve_config_path(config_path)?;
    let config = load_config(&path)?;

    println!("{} {} is valid", check(), path.display().to_string().emphasis());
    println!("   {} {}", "Repos root:".muted(), config.repos_root.display());
    println!("   {} {}", "Target branch:".muted(), config.target_branch.accent());
    println!(
        "   {} {}",
        "Forbidden:".muted(),
        config.forbidden_names().join(", ")
    );
    println!("   {} {}", "Committer:".muted(), config.identity);
    println!(
        "   {} {}",
        "Signing:".muted(),
        config
            .signing
            .as_ref()
            .map_or("disabled", |s| s.key.as_str())
    );
    for (name, project) in &config.projects {
        println!("   {} {} {}", "Project:".muted(), name.accent(), project.repo_url.muted());
    }
    Ok(())
}
