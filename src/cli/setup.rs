//! Setup command - clone configured projects

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::println;
use merge_bot::error::Result;
use merge_bot::workspace::setup_repos;
use std::path::Path;

/// Run the setup command
pub async fn run_setup(config_path: Option<&Path>) -> Result<()> {
    let ctx = CommandContext::new(config_path)?;
    let cloned = setup_repos(&ctx.config, ctx.git.as_ref()).await?;

    if cloned.is_empty() {
        println!(
            "{}",
            format!(
                "All {} project(s) already cloned under {}",
                ctx.config.projects.len(),
                ctx.config.repos_root.display()
            )
            .muted()
        );
    } else {
        for name in &cloned {
            println!("{} Cloned {}", check(), name.accent());
        }
    }
    Ok(())
}
