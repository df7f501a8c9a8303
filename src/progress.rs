//! Progress reporting for long-running merges

use crate::types::MergeStep;
use async_trait::async_trait;

/// Receives progress while a merge runs
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// A step of the merge procedure is starting
    async fn on_step(&self, step: MergeStep, project: &str);

    /// Free-form status or warning message
    async fn on_message(&self, message: &str);
}

/// Discards all progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

#[async_trait]
impl ProgressCallback for NoProgress {
    async fn on_step(&self, _step: MergeStep, _project: &str) {}

    async fn on_message(&self, _message: &str) {}
}
