//! Customization of the generated project
//!
//! This module provides:
//! - package.json overlay merging
//! - app.json (Expo manifest) identity, identifier, and deep-link editing
//! - Git history reset
//! - Dependency group installation

pub mod app_json;
pub mod git;
pub mod install;
pub mod package_json;

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use tokio::fs;

pub use install::DependencyGroup;

/// Read and parse a JSON document from the project directory
pub async fn load_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Write a JSON document back, pretty-printed with a trailing newline
pub async fn save_json(path: &Path, value: &Value) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    content.push('\n');
    fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
