//! merge-bot - merge branches into develop from chat
//!
//! An authorized chat user asks for a branch of a configured project to be
//! merged; the bot fetches, merges with `--no-ff`, records who authorized
//! it, signs, pushes, and deletes the source branch.
//!
//! The pieces:
//! - [`config`] - immutable configuration (projects, deny list, identity)
//! - [`merge`] - planning (pure) and execution (git) of one merge
//! - [`git`] - the `GitRunner` seam and working-copy operations
//! - [`locks`] - one merge in flight per project
//! - [`chat`] - command registry and the `merge` chat command

pub mod chat;
pub mod config;
pub mod error;
pub mod git;
pub mod locks;
pub mod merge;
pub mod progress;
pub mod types;
pub mod validate;
pub mod workspace;
