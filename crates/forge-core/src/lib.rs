//! Forge Core - Shared library for Expo project provisioning
//!
//! This library provides the core functionality for scaffolding and customizing
//! Expo (React Native) application projects. It is designed to be used by CLI
//! binaries (e.g., `expo-forge`) that share the same provisioning pipeline but
//! carry their own product configuration.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Validators, template fetching/applying,
//!   manifest editing, toolchain detection, command execution
//! - **Layer 2: Workflow Orchestration** - `StarterConfig` trait plus the
//!   per-step failure policy in `pipeline`
//! - **Layer 3: CLI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompt flow
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use forge_core::{templates, validate, StarterConfig};
//!
//! // Define your product config
//! #[derive(Clone)]
//! struct MyConfig;
//! impl StarterConfig for MyConfig {
//!     fn name(&self) -> &'static str { "myapp-forge" }
//!     // ... implement other methods
//! }
//!
//! // Use the low-level APIs
//! assert!(validate::is_valid_package_id("com.acme.myapp"));
//! let fetcher = templates::TemplateFetcher::from_config(&MyConfig)?;
//! let manifest = fetcher.fetch_root_manifest().await?;
//! ```

pub mod error;
pub mod exec;
pub mod pipeline;
pub mod product;
pub mod project;
pub mod runtime;
pub mod templates;
pub mod validate;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use exec::CommandSpec;
pub use product::StarterConfig;
pub use runtime::{check_toolchain, ToolInfo};
pub use templates::{copy_overlay, RootManifest, TemplateFetcher, TemplateManifest, TemplateSource};

#[cfg(feature = "tui")]
pub use tui::run;
