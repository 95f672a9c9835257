//! Template manifest types and parsing

use crate::error::TemplateError;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// Root template manifest (templates/template.yaml)
/// Lists available template directories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootManifest {
    /// List of template directory names
    pub templates: Vec<String>,
}

/// Per-template manifest (templates/<name>/template.yaml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Display name of the template
    pub name: String,

    /// Description of what the template provides
    pub description: String,

    /// Semver version for CLI compatibility checking
    pub version: String,

    /// Scaffolder-generated paths to delete before the overlay is applied
    #[serde(default)]
    pub clean: Vec<String>,

    /// Files to copy into the project. When empty for a local template,
    /// the template directory is walked and every file is included.
    #[serde(default)]
    pub files: Vec<String>,

    /// JSON file merged into the project's package.json. The overlay file
    /// itself is never copied into the project.
    #[serde(default)]
    pub package_overlay: Option<String>,
}

impl TemplateManifest {
    /// Reject `clean`/`files` entries that could escape the project directory
    pub fn validate_paths(&self) -> Result<(), TemplateError> {
        for entry in self.clean.iter().chain(self.files.iter()) {
            if !is_safe_relative_path(entry) {
                return Err(TemplateError::UnsafePath(entry.clone()));
            }
        }
        if let Some(overlay) = &self.package_overlay {
            if !is_safe_relative_path(overlay) {
                return Err(TemplateError::UnsafePath(overlay.clone()));
            }
        }
        Ok(())
    }

    /// The files to copy into the project: everything in `files` except the
    /// package overlay, which is consumed rather than installed.
    pub fn overlay_targets(&self) -> Vec<&str> {
        self.files
            .iter()
            .map(String::as_str)
            .filter(|f| Some(*f) != self.package_overlay.as_deref())
            .collect()
    }
}

/// A path is safe when it is relative and contains only normal components
/// (no `..`, no root, no prefix).
pub fn is_safe_relative_path(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST_YAML: &str = r#"
name: Default
description: Expo starter
version: 0.1.0
clean:
  - app
  - assets/images
files:
  - app/_layout.tsx
  - app/index.tsx
  - package.overlay.json
package_overlay: package.overlay.json
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest: TemplateManifest = serde_yaml::from_str(MANIFEST_YAML).unwrap();
        assert_eq!(manifest.name, "Default");
        assert_eq!(manifest.clean, vec!["app", "assets/images"]);
        assert_eq!(manifest.package_overlay.as_deref(), Some("package.overlay.json"));
    }

    #[test]
    fn test_parse_manifest_defaults() {
        let manifest: TemplateManifest =
            serde_yaml::from_str("name: X\ndescription: Y\nversion: 0.1.0\n").unwrap();
        assert!(manifest.clean.is_empty());
        assert!(manifest.files.is_empty());
        assert!(manifest.package_overlay.is_none());
    }

    #[test]
    fn test_overlay_targets_excludes_package_overlay() {
        let manifest: TemplateManifest = serde_yaml::from_str(MANIFEST_YAML).unwrap();
        let targets = manifest.overlay_targets();
        assert_eq!(targets, vec!["app/_layout.tsx", "app/index.tsx"]);
    }

    #[test]
    fn test_safe_relative_paths() {
        assert!(is_safe_relative_path("app/index.tsx"));
        assert!(is_safe_relative_path("./README.md"));
        assert!(!is_safe_relative_path(""));
        assert!(!is_safe_relative_path("/etc/passwd"));
        assert!(!is_safe_relative_path("../outside"));
        assert!(!is_safe_relative_path("app/../../outside"));
    }

    #[test]
    fn test_validate_paths_rejects_traversal() {
        let mut manifest: TemplateManifest = serde_yaml::from_str(MANIFEST_YAML).unwrap();
        manifest.clean.push("../sibling".to_string());
        assert!(manifest.validate_paths().is_err());
    }

    #[test]
    fn test_parse_root_manifest() {
        let root: RootManifest = serde_yaml::from_str("templates:\n  - default\n").unwrap();
        assert_eq!(root.templates, vec!["default"]);
    }
}
