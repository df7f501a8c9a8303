//! Chat command - a line-oriented chat adapter over stdin/stdout
//!
//! Each input line is one message from the configured user. Replies are
//! printed as rendered cards. Useful for driving the bot from a terminal
//! or wiring it behind a simple relay.

use crate::cli::context::CommandContext;
use crate::cli::style::Stylize;
use anstream::println;
use merge_bot::chat::{ChatMessage, ChatUser, CommandRegistry, MergeCommand};
use merge_bot::error::Result;
use merge_bot::workspace::setup_repos;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Options for the chat command
#[derive(Debug, Clone)]
pub struct ChatOptions {
    /// Chat handle of the person typing
    pub username: String,
    /// Full name recorded in merge commits
    pub full_name: Option<String>,
    /// Command prefix
    pub prefix: String,
}

/// Build the registry with every bot command
pub fn build_registry(ctx: &CommandContext, prefix: &str) -> CommandRegistry {
    let mut registry = CommandRegistry::new(prefix);
    registry.register_command("merge", Arc::new(MergeCommand::new(Arc::clone(&ctx.orchestrator))));
    registry
}

/// Run the chat loop until stdin closes
pub async fn run_chat(config_path: Option<&Path>, options: ChatOptions) -> Result<()> {
    let ctx = CommandContext::new(config_path)?;
    info!(config = %ctx.config_path.display(), projects = ctx.config.projects.len(), "chat starting");

    // activation: make sure every project has a working copy
    match setup_repos(&ctx.config, ctx.git.as_ref()).await {
        Ok(cloned) if !cloned.is_empty() => info!(?cloned, "cloned working copies"),
        Ok(_) => {}
        Err(e) => warn!(error = %e, "could not prepare every working copy"),
    }

    let registry = build_registry(&ctx, &options.prefix);
    let sender = ChatUser {
        username: options.username,
        full_name: options.full_name,
    };
    println!(
        "{}",
        format!(
            "Listening as {} (type {}help, Ctrl-D to quit)",
            sender.display_name(),
            options.prefix
        )
        .muted()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let message = ChatMessage::new(sender.clone(), line);
        if let Some(card) = registry.dispatch(&message).await {
            println!("{}", card.render());
        }
    }
    Ok(())
}
