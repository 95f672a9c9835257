//! Toolchain detection for Node.js, npm, git, and CocoaPods

use std::process::Command;

/// Detection result for one external tool
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: &'static str,
    pub binary: &'static str,
    pub version: Option<String>,
    pub available: bool,
    /// Required tools abort the run when missing; advisory tools only
    /// degrade later steps (git reset, pod install).
    pub required: bool,
}

fn probe(name: &'static str, binary: &'static str, required: bool) -> ToolInfo {
    if which::which(binary).is_err() {
        return ToolInfo {
            name,
            binary,
            version: None,
            available: false,
            required,
        };
    }

    let version = Command::new(binary)
        .arg("--version")
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .filter(|v| !v.is_empty());

    ToolInfo {
        name,
        binary,
        version,
        available: true,
        required,
    }
}

/// Check if Node.js is available
pub fn check_node() -> ToolInfo {
    probe("Node.js", "node", true)
}

/// Check if npm (and therefore npx) is available
pub fn check_npm() -> ToolInfo {
    probe("npm", "npm", true)
}

/// Check if git is available
pub fn check_git() -> ToolInfo {
    probe("git", "git", false)
}

/// Check if CocoaPods is available (only meaningful on macOS)
pub fn check_cocoapods() -> ToolInfo {
    probe("CocoaPods", "pod", false)
}

/// Probe the whole toolchain: Node.js and npm are required, git is advisory,
/// and CocoaPods is probed only on macOS.
pub fn check_toolchain() -> Vec<ToolInfo> {
    let mut results = vec![check_node(), check_npm(), check_git()];
    if cfg!(target_os = "macos") {
        results.push(check_cocoapods());
    }
    results
}

/// The subset of tools that are required but missing
pub fn missing_required(tools: &[ToolInfo]) -> Vec<&ToolInfo> {
    tools.iter().filter(|t| t.required && !t.available).collect()
}

/// Whether a tool is present in a probe result set
pub fn is_available(tools: &[ToolInfo], binary: &str) -> bool {
    tools.iter().any(|t| t.binary == binary && t.available)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(binary: &'static str, available: bool, required: bool) -> ToolInfo {
        ToolInfo {
            name: binary,
            binary,
            version: None,
            available,
            required,
        }
    }

    #[test]
    fn test_missing_required_ignores_advisory_tools() {
        let tools = vec![
            tool("node", true, true),
            tool("npm", false, true),
            tool("git", false, false),
        ];
        let missing = missing_required(&tools);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].binary, "npm");
    }

    #[test]
    fn test_is_available() {
        let tools = vec![tool("git", true, false), tool("pod", false, false)];
        assert!(is_available(&tools, "git"));
        assert!(!is_available(&tools, "pod"));
        assert!(!is_available(&tools, "node"));
    }
}
