//! Git history reset for generated projects
//!
//! The scaffolder leaves its own history behind; the new project starts
//! from a single synthesized commit instead.

use crate::exec::{run_streamed_with_timeout, CommandSpec};
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

/// Individual git invocations are quick; anything longer means a hung
/// credential helper or hook.
const GIT_STEP_TIMEOUT: Duration = Duration::from_secs(30);

/// The message for the project's first commit
pub fn commit_message(app_name: &str, template_name: &str, product_display: &str) -> String {
    format!(
        "Initial commit — {} scaffolded with {} ({})",
        app_name, product_display, template_name
    )
}

/// Discard any history the scaffolder created and start a fresh repository
/// with a single commit covering the whole project.
pub async fn reset_history(project_dir: &Path, message: &str) -> Result<()> {
    let git_dir = project_dir.join(".git");
    if tokio::fs::metadata(&git_dir).await.is_ok() {
        tokio::fs::remove_dir_all(&git_dir)
            .await
            .with_context(|| format!("Failed to remove {}", git_dir.display()))?;
    }

    let steps = [
        CommandSpec::new("git", &["init"]),
        CommandSpec::new("git", &["add", "-A"]),
        CommandSpec::new("git", &["commit", "-m", message]),
    ];

    for spec in &steps {
        run_streamed_with_timeout(spec, Some(project_dir), GIT_STEP_TIMEOUT).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_message() {
        let message = commit_message("My App", "default", "Expo Forge");
        assert_eq!(
            message,
            "Initial commit — My App scaffolded with Expo Forge (default)"
        );
    }
}
