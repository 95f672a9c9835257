//! Applying a template to a freshly scaffolded project
//!
//! Two operations, in order: delete the scaffolder's example content
//! (`clean`), then write the template's override files on top.

use crate::templates::fetcher::TemplateFetcher;
use crate::templates::manifest::TemplateManifest;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// Delete the scaffolder-generated paths the template declares in `clean`.
/// Missing paths are skipped; everything else is removed recursively.
/// Returns the paths that were actually deleted.
pub async fn clean_project(project_dir: &Path, manifest: &TemplateManifest) -> Result<Vec<String>> {
    manifest.validate_paths()?;

    let mut removed = Vec::new();
    for entry in &manifest.clean {
        let target = project_dir.join(entry);
        let metadata = match fs::metadata(&target).await {
            Ok(m) => m,
            Err(_) => continue, // already absent
        };

        if metadata.is_dir() {
            fs::remove_dir_all(&target)
                .await
                .with_context(|| format!("Failed to remove directory {}", target.display()))?;
        } else {
            fs::remove_file(&target)
                .await
                .with_context(|| format!("Failed to remove file {}", target.display()))?;
        }
        removed.push(entry.clone());
    }

    Ok(removed)
}

/// Copy the template's override files into the project directory.
/// The package overlay file is consumed elsewhere and never copied.
/// Returns the copied paths.
pub async fn copy_overlay(
    fetcher: &mut TemplateFetcher,
    template_name: &str,
    manifest: &TemplateManifest,
    project_dir: &Path,
) -> Result<Vec<String>> {
    manifest.validate_paths()?;

    fs::create_dir_all(project_dir)
        .await
        .context("Failed to create project directory")?;

    let mut copied = Vec::new();
    for file_path in manifest.overlay_targets() {
        let target_path = project_dir.join(file_path);
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = fetcher.fetch_file_bytes(template_name, file_path).await?;
        fs::write(&target_path, &content)
            .await
            .with_context(|| format!("Failed to write file: {}", target_path.display()))?;

        copied.push(file_path.to_string());
    }

    Ok(copied)
}

/// Load and parse the template's package.json overlay, if it declares one
pub async fn fetch_package_overlay(
    fetcher: &mut TemplateFetcher,
    template_name: &str,
    manifest: &TemplateManifest,
) -> Result<Option<serde_json::Value>> {
    let Some(overlay_name) = &manifest.package_overlay else {
        return Ok(None);
    };

    let bytes = fetcher.fetch_file_bytes(template_name, overlay_name).await?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("Overlay '{}' is not valid JSON", overlay_name))?;
    Ok(Some(value))
}
