//! External toolchain detection
//!
//! This module probes the tools the provisioning pipeline delegates to
//! (Node.js/npm, git, CocoaPods) before any of them are invoked.

pub mod check;

pub use check::{
    check_cocoapods, check_git, check_node, check_npm, check_toolchain, is_available,
    missing_required, ToolInfo,
};

/// Where to send the operator when Node.js is missing
pub const NODE_DOWNLOAD_URL: &str = "https://nodejs.org/en/download";
