//! Per-step failure policy for the provisioning pipeline
//!
//! The pipeline is strictly sequential; what differs between steps is what a
//! failure means. Core steps (scaffold, template application, manifest edits)
//! abort the run. Finishing steps (prebuild, pods, git, dependency install)
//! only warn, since the operator can rerun them by hand.

use anyhow::Result;
use colored::Colorize;
use std::future::Future;

/// What a step failure does to the rest of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// The error aborts the run
    Fatal,
    /// The error is reported and the run continues
    Warn,
}

/// Outcome of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    /// The step failed but its policy allowed the run to continue
    Failed,
}

impl StepStatus {
    pub fn completed(self) -> bool {
        self == StepStatus::Completed
    }
}

/// Run one pipeline step under its failure policy.
///
/// With `FailureMode::Fatal` the error is propagated (annotated with the step
/// name); with `FailureMode::Warn` it is printed and `StepStatus::Failed` is
/// returned so the caller can suggest a manual fix.
pub async fn run_step<F, Fut>(name: &str, mode: FailureMode, step: F) -> Result<StepStatus>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    match step().await {
        Ok(()) => Ok(StepStatus::Completed),
        Err(err) => match mode {
            FailureMode::Fatal => Err(err.context(format!("step '{}' failed", name))),
            FailureMode::Warn => {
                eprintln!("{} {}: {:#}", "Warning:".yellow(), name, err);
                Ok(StepStatus::Failed)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fatal_step_propagates_error() {
        let result = run_step("scaffold", FailureMode::Fatal, || async {
            anyhow::bail!("boom")
        })
        .await;
        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("step 'scaffold' failed"));
    }

    #[tokio::test]
    async fn test_warn_step_continues() {
        let status = run_step("prebuild", FailureMode::Warn, || async {
            anyhow::bail!("boom")
        })
        .await
        .unwrap();
        assert_eq!(status, StepStatus::Failed);
        assert!(!status.completed());
    }

    #[tokio::test]
    async fn test_successful_step() {
        let status = run_step("clean", FailureMode::Fatal, || async { Ok(()) })
            .await
            .unwrap();
        assert!(status.completed());
    }
}
