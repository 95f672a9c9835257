//! Product configuration trait for starter CLIs
//!
//! This trait defines the interface a product binary implements to configure
//! the provisioning behavior for its specific framework and starter kit.

use crate::exec::CommandSpec;
use crate::project::install::DependencyGroup;
use std::path::Path;

/// Configuration trait for different starter products
///
/// Each product implements this trait to define:
/// - Product identity (name, display name)
/// - Template source URLs
/// - The scaffolder invocation
/// - The fixed dependency groups installed after provisioning
/// - Documentation links and post-setup instructions
pub trait StarterConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Default URL for fetching templates
    fn default_template_url(&self) -> &'static str;

    /// Environment variable name for overriding template URL
    fn template_url_env(&self) -> &'static str;

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;

    /// The external scaffolder invocation that generates the base project
    fn scaffold_command(&self, app_name: &str) -> CommandSpec;

    /// The fixed dependency groups installed once the project exists
    fn dependency_groups(&self) -> Vec<DependencyGroup>;

    /// Generate the "next steps" instructions after provisioning.
    /// `prebuilt` reports whether native directories were generated.
    fn next_steps(&self, dir: &Path, prebuilt: bool) -> Vec<String>;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
