//! Merge engine
//!
//! Two-phase pattern:
//! 1. Plan - validate the request into a `MergePlan` (pure, testable)
//! 2. Execute - run git against the working copy (effectful)
//!
//! `MergeOrchestrator` ties both together behind the per-project lock.

mod execute;
mod orchestrator;
mod plan;

pub use execute::execute_plan;
pub use orchestrator::{MergeOrchestrator, MergeResult};
pub use plan::{MergePlan, create_merge_plan, render_commit_message};
