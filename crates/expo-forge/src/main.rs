//! Expo Forge - provisioning CLI for pre-configured Expo mobile apps

use anyhow::Result;
use clap::{Parser, Subcommand};
use forge_core::exec::CommandSpec;
use forge_core::project::DependencyGroup;
use forge_core::tui::CreateArgs;
use forge_core::StarterConfig;
use std::path::{Path, PathBuf};

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Expo Forge product configuration
#[derive(Clone)]
pub struct ExpoForgeConfig;

impl StarterConfig for ExpoForgeConfig {
    fn name(&self) -> &'static str {
        "expo-forge"
    }

    fn display_name(&self) -> &'static str {
        "Expo Forge"
    }

    fn default_template_url(&self) -> &'static str {
        "https://raw.githubusercontent.com/expo-forge/expo-forge/main/templates"
    }

    fn template_url_env(&self) -> &'static str {
        "EXPO_FORGE_TEMPLATE_URL"
    }

    fn docs_url(&self) -> &'static str {
        "https://docs.expo.dev"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install expo-forge --force"
    }

    fn scaffold_command(&self, app_name: &str) -> CommandSpec {
        CommandSpec::new("npx", &["--yes", "create-expo-app@latest", app_name])
    }

    fn dependency_groups(&self) -> Vec<DependencyGroup> {
        vec![
            DependencyGroup::new(
                "navigation and deep linking",
                "npx",
                &[
                    "expo",
                    "install",
                    "expo-linking",
                    "react-native-screens",
                    "react-native-safe-area-context",
                ],
            ),
            DependencyGroup::new(
                "device storage",
                "npx",
                &[
                    "expo",
                    "install",
                    "expo-secure-store",
                    "@react-native-async-storage/async-storage",
                ],
            ),
            DependencyGroup::new(
                "developer tooling",
                "npm",
                &[
                    "install",
                    "--save-dev",
                    "prettier",
                    "eslint",
                    "eslint-config-expo",
                ],
            ),
        ]
    }

    fn next_steps(&self, dir: &Path, prebuilt: bool) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        steps.push("npx expo start".to_string());

        if !prebuilt {
            steps.push("npx expo prebuild (when you need the native ios/android projects)".to_string());
        }

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "expo-forge")]
#[command(about = "CLI for provisioning pre-configured Expo mobile app projects")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    /// Name of the application to create (starts with a letter, 3-50 characters)
    pub app_name: Option<String>,

    /// Reverse-DNS package identifier (e.g. com.acme.myapp); prompted when omitted
    pub package_id: Option<String>,

    /// Template name to use
    #[arg(short, long)]
    pub template: Option<String>,

    /// Local directory to use for templates instead of fetching from remote (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Deep-link scheme (3-20 lowercase letters, digits, hyphens); prompted when omitted
    #[arg(long)]
    pub scheme: Option<String>,

    /// Universal-link domain (e.g. links.example.com)
    #[arg(long)]
    pub domain: Option<String>,

    /// Skip native directory generation (expo prebuild)
    #[arg(long)]
    pub skip_prebuild: bool,

    /// Skip dependency group installation
    #[arg(long)]
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build zip files for all templates in the template directory (for development use)
    BuildZips(BuildZipsArgs),
}

#[derive(Parser, Debug)]
pub struct BuildZipsArgs {
    /// Local directory containing templates to build zips from (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

impl Args {
    fn into_create_args(self) -> Result<CreateArgs> {
        let Some(app_name) = self.app_name else {
            anyhow::bail!("Missing required <APP_NAME>. Usage: expo-forge <APP_NAME> [PACKAGE_ID]");
        };

        Ok(CreateArgs {
            app_name,
            package_id: self.package_id,
            template: self.template,
            template_dir: self.template_dir,
            scheme: self.scheme,
            domain: self.domain,
            skip_prebuild: self.skip_prebuild,
            skip_install: self.skip_install,
            yes: self.yes,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let mut args = Args::parse();
    let config = ExpoForgeConfig;

    match args.command.take() {
        Some(Command::BuildZips(build_args)) => {
            forge_core::templates::build_zips(config.display_name(), &build_args.template_dir).await
        }
        None => {
            let create_args = args.into_create_args()?;
            let result = forge_core::run(&config, create_args, CLI_VERSION).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold_command_line() {
        let spec = ExpoForgeConfig.scaffold_command("MyApp");
        assert_eq!(spec.display(), "npx --yes create-expo-app@latest MyApp");
    }

    #[test]
    fn test_three_dependency_groups() {
        let groups = ExpoForgeConfig.dependency_groups();
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|g| !g.args.is_empty()));
    }
}
