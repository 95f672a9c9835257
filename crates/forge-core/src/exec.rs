//! Streaming execution of external commands
//!
//! Every provisioning step that shells out (scaffolder, prebuild, git,
//! package manager) goes through here so that child output is echoed
//! consistently and nonzero exit codes become errors.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// An external command line: program plus arguments
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Build a spec from a program and its arguments
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// The command line as the user would type it
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Run a command, streaming its stdout/stderr line by line.
/// Fails when the command cannot be spawned or exits nonzero.
pub async fn run_streamed(spec: &CommandSpec, cwd: Option<&Path>) -> Result<()> {
    println!();
    println!("{} {}", "Running:".dimmed(), spec.display().yellow());
    println!();

    let mut cmd = TokioCommand::new(&spec.program);
    cmd.args(&spec.args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let mut child = cmd
        .spawn()
        .with_context(|| format!("Failed to start `{}`", spec.display()))?;

    let stdout = child.stdout.take().expect("stdout was piped");
    let stderr = child.stderr.take().expect("stderr was piped");

    let mut stdout_reader = BufReader::new(stdout).lines();
    let mut stderr_reader = BufReader::new(stderr).lines();

    let mut stdout_done = false;
    let mut stderr_done = false;

    while !(stdout_done && stderr_done) {
        tokio::select! {
            line = stdout_reader.next_line(), if !stdout_done => {
                match line {
                    Ok(Some(line)) => println!("  {}", line),
                    Ok(None) | Err(_) => stdout_done = true,
                }
            }
            line = stderr_reader.next_line(), if !stderr_done => {
                match line {
                    Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                    Ok(None) | Err(_) => stderr_done = true,
                }
            }
        }
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("Failed to wait for `{}`", spec.display()))?;

    println!();
    if status.success() {
        Ok(())
    } else {
        anyhow::bail!(
            "`{}` failed with exit code {}",
            spec.display(),
            status.code().unwrap_or(-1)
        );
    }
}

/// Run a command with an upper bound on its runtime.
/// The child is killed when the limit elapses (kill_on_drop).
pub async fn run_streamed_with_timeout(
    spec: &CommandSpec,
    cwd: Option<&Path>,
    limit: Duration,
) -> Result<()> {
    match timeout(limit, run_streamed(spec, cwd)).await {
        Ok(result) => result,
        Err(_) => anyhow::bail!(
            "`{}` timed out after {} seconds",
            spec.display(),
            limit.as_secs()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_program_and_args() {
        let spec = CommandSpec::new("npx", &["--yes", "create-expo-app@latest", "MyApp"]);
        assert_eq!(spec.display(), "npx --yes create-expo-app@latest MyApp");
    }

    #[test]
    fn test_display_bare_program() {
        let spec = CommandSpec::new("git", &[]);
        assert_eq!(spec.display(), "git");
    }
}
