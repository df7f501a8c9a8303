//! Entry point for carrying out merge requests

use crate::config::BotConfig;
use crate::error::Result;
use crate::git::GitRunner;
use crate::locks::ProjectLocks;
use crate::merge::execute::execute_plan;
use crate::merge::plan::{MergePlan, create_merge_plan};
use crate::progress::ProgressCallback;
use crate::types::{MergeReport, MergeRequest};
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

/// Outcome of one merge request
pub type MergeResult = Result<MergeReport>;

/// Validates merge requests and carries them out, one per project at a time
pub struct MergeOrchestrator {
    config: Arc<BotConfig>,
    git: Arc<dyn GitRunner>,
    locks: ProjectLocks,
}

impl MergeOrchestrator {
    /// Create an orchestrator over an immutable configuration
    pub fn new(config: Arc<BotConfig>, git: Arc<dyn GitRunner>) -> Self {
        Self {
            config,
            git,
            locks: ProjectLocks::new(),
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Git runner in use
    pub fn git(&self) -> &dyn GitRunner {
        self.git.as_ref()
    }

    /// Validate a request without touching any working copy
    pub fn plan(&self, request: &MergeRequest) -> Result<MergePlan> {
        create_merge_plan(&self.config, request)
    }

    /// Validate and carry out a merge request
    ///
    /// Pre-flight failures return before any git command runs. Otherwise
    /// the project's lock is held until the procedure finishes, on every
    /// exit path.
    pub async fn execute(
        &self,
        request: &MergeRequest,
        progress: &dyn ProgressCallback,
    ) -> MergeResult {
        let plan = match self.plan(request) {
            Ok(plan) => plan,
            Err(e) => {
                warn!(
                    project = %request.project_name,
                    branch = %request.branch_name,
                    error = %e,
                    "merge request rejected"
                );
                return Err(e);
            }
        };

        let span = info_span!("merge", project = %plan.project, branch = %plan.source_branch);
        async {
            let _guard = self.locks.acquire(&plan.project).await;
            info!(authorized_by = %plan.authorized_by, "starting merge");
            let result = execute_plan(&plan, self.git.as_ref(), progress).await;
            match &result {
                Ok(report) => info!(commit = %report.commit, warnings = report.warnings.len(), "merge finished"),
                Err(e) => warn!(error = %e, step = ?e.step(), "merge failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}
