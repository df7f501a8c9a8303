//! Chat command surface
//!
//! The chat host owns transport, authentication and rendering. This module
//! only needs a narrow seam: handlers registered by name, and a dispatcher
//! turning an addressed message into a [`Card`] reply.

mod card;
mod merge_command;

pub use card::{Card, CardColor};
pub use merge_command::{MergeArgs, MergeCommand, failure_card, success_card};

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Default prefix marking a message as a bot command
pub const DEFAULT_PREFIX: &str = "!";

/// The person who sent a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUser {
    /// Handle in the chat system
    pub username: String,
    /// Display name, if the host knows it
    pub full_name: Option<String>,
}

impl ChatUser {
    /// Create a user with a full name
    pub fn new(username: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            full_name: Some(full_name.into()),
        }
    }

    /// Name to record in audit trails (full name, else username)
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }
}

/// An incoming chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Sender
    pub sender: ChatUser,
    /// Raw text
    pub body: String,
}

impl ChatMessage {
    /// Create a new message
    pub fn new(sender: ChatUser, body: impl Into<String>) -> Self {
        Self {
            sender,
            body: body.into(),
        }
    }
}

/// A bot command
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// One-line description for `help`
    fn description(&self) -> &str;

    /// Handle an invocation; `args` excludes the command name
    async fn handle(&self, message: &ChatMessage, args: &[String]) -> Card;
}

/// Commands known to the bot, by name
pub struct CommandRegistry {
    prefix: String,
    commands: BTreeMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    /// Create a registry answering to messages starting with `prefix`
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            commands: BTreeMap::new(),
        }
    }

    /// Register a handler, replacing any previous one with the same name
    pub fn register_command(&mut self, name: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        let name = name.into().to_lowercase();
        debug!(command = %name, "registered chat command");
        self.commands.insert(name, handler);
    }

    /// Registered command names, sorted
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    /// Split an addressed message into command name and arguments
    ///
    /// Returns `None` when the message isn't meant for the bot.
    pub fn parse(&self, body: &str) -> Option<(String, Vec<String>)> {
        let rest = body.trim_start().strip_prefix(self.prefix.as_str())?;
        let mut words = rest.split_whitespace();
        let name = words.next()?.to_lowercase();
        Some((name, words.map(String::from).collect()))
    }

    /// Route a message to its handler
    ///
    /// `None` for messages without the prefix; a help card for `help`; a
    /// red card for unknown commands.
    pub async fn dispatch(&self, message: &ChatMessage) -> Option<Card> {
        let (name, args) = self.parse(&message.body)?;
        debug!(command = %name, user = %message.sender.username, "dispatching chat command");

        if name == "help" {
            return Some(self.help_card());
        }

        let Some(handler) = self.commands.get(&name) else {
            return Some(Card::failure().body(format!(
                "Unknown command '{name}'. Try {}help.",
                self.prefix
            )));
        };
        Some(handler.handle(message, &args).await)
    }

    fn help_card(&self) -> Card {
        self.commands.iter().fold(
            Card::success().pretext("Available commands:"),
            |card, (name, handler)| {
                card.field(format!("{}{name}", self.prefix), handler.description())
            },
        )
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl CommandHandler for Echo {
        fn description(&self) -> &str {
            "Repeat the arguments"
        }

        async fn handle(&self, message: &ChatMessage, args: &[String]) -> Card {
            Card::success()
                .body(args.join(" "))
                .field("User", message.sender.display_name())
        }
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::default();
        registry.register_command("Echo", Arc::new(Echo));
        registry
    }

    fn message(body: &str) -> ChatMessage {
        ChatMessage::new(ChatUser::new("jdoe", "Jane Doe"), body)
    }

    #[tokio::test]
    async fn test_dispatch_routes_to_handler() {
        let card = registry().dispatch(&message("!echo  hello   world")).await.unwrap();
        assert_eq!(card.body.as_deref(), Some("hello world"));
        assert_eq!(card.field_value("User"), Some("Jane Doe"));
    }

    #[tokio::test]
    async fn test_dispatch_ignores_unprefixed_messages() {
        assert!(registry().dispatch(&message("echo hello")).await.is_none());
        assert!(registry().dispatch(&message("!")).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_command_gets_red_card() {
        let card = registry().dispatch(&message("!deploy prod")).await.unwrap();
        assert_eq!(card.color, CardColor::Red);
        assert!(card.body.unwrap().contains("Unknown command 'deploy'"));
    }

    #[tokio::test]
    async fn test_help_lists_commands() {
        let card = registry().dispatch(&message("!help")).await.unwrap();
        assert_eq!(card.field_value("!echo"), Some("Repeat the arguments"));
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let user = ChatUser {
            username: "jdoe".to_string(),
            full_name: Some("  ".to_string()),
        };
        assert_eq!(user.display_name(), "jdoe");
        assert_eq!(registry().command_names(), vec!["echo"]);
    }
}
