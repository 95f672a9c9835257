//! Dependency group installation
//!
//! Products declare fixed groups of packages to install once the project
//! exists; each group is one package-manager invocation.

use crate::exec::{run_streamed, CommandSpec};
use anyhow::Result;
use std::path::Path;

/// One named package-manager invocation
#[derive(Debug, Clone)]
pub struct DependencyGroup {
    /// Label used in progress and warning messages
    pub label: &'static str,
    pub program: &'static str,
    pub args: Vec<String>,
}

impl DependencyGroup {
    pub fn new(label: &'static str, program: &'static str, args: &[&str]) -> Self {
        Self {
            label,
            program,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn command(&self) -> CommandSpec {
        CommandSpec {
            program: self.program.to_string(),
            args: self.args.clone(),
        }
    }
}

/// Install one dependency group inside the project directory
pub async fn install_group(project_dir: &Path, group: &DependencyGroup) -> Result<()> {
    run_streamed(&group.command(), Some(project_dir)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_command_line() {
        let group = DependencyGroup::new(
            "developer tooling",
            "npm",
            &["install", "--save-dev", "prettier"],
        );
        assert_eq!(group.command().display(), "npm install --save-dev prettier");
    }
}
