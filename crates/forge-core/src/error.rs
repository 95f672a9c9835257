//! Structured errors for manifest editing and template handling

use thiserror::Error;

/// Errors produced while editing the generated project's JSON manifests
/// (`app.json`, `package.json`)
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The document root is not a JSON object
    #[error("expected a JSON object at the top level")]
    NotAnObject,

    /// `app.json` has no `expo` object to edit
    #[error("app.json is missing the \"expo\" root object")]
    MissingExpoRoot,
}

/// Errors produced while resolving template contents
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A `files` or `clean` entry escapes the project directory
    #[error("template path '{0}' must be relative and must not contain '..'")]
    UnsafePath(String),

    /// A file named in the manifest is absent from the fetched template
    #[error("file '{file}' not found in template '{template}'")]
    MissingFile { template: String, file: String },
}
