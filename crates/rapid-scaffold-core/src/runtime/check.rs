//! Detection of the external tools a run depends on

use crate::runtime::bootstrap::PackageManager;
use anyhow::Result;
use std::process::Command;

/// Tool detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

/// Run `<binary> --version` and report what came back
pub fn check_tool(binary: &str, name: &'static str) -> RuntimeInfo {
    let output = Command::new(binary).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name,
            version: None,
            available: false,
        },
    }
}

pub fn check_git() -> RuntimeInfo {
    check_tool("git", "git")
}

pub fn check_node() -> RuntimeInfo {
    check_tool("node", "Node.js")
}

pub fn check_package_manager(pm: PackageManager) -> RuntimeInfo {
    check_tool(pm.binary(), pm.binary())
}

/// Check everything a run needs. `git` only matters for git sources; the
/// package manager (and Node.js under it) only when dependencies get
/// installed.
pub fn check_prerequisites(
    needs_git: bool,
    package_manager: Option<PackageManager>,
) -> Result<Vec<RuntimeInfo>> {
    let mut results = Vec::new();
    let mut missing = Vec::new();

    if needs_git {
        let git = check_git();
        if git.available {
            results.push(git);
        } else {
            missing.push("git (install from https://git-scm.com/downloads)".to_string());
        }
    }

    if let Some(pm) = package_manager {
        if pm.needs_node() {
            let node = check_node();
            if node.available {
                results.push(node);
            } else {
                missing.push("Node.js (install from https://nodejs.org)".to_string());
            }
        }

        let manager = check_package_manager(pm);
        if manager.available {
            results.push(manager);
        } else {
            missing.push(format!("{} (install from {})", pm.binary(), pm.docs_url()));
        }
    }

    if !missing.is_empty() {
        anyhow::bail!(
            "Missing required tools:\n{}",
            missing
                .iter()
                .map(|m| format!("  - {}", m))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_binary_unavailable() {
        let info = check_tool("rapid-fe-definitely-not-installed", "nothing");
        assert!(!info.available);
        assert!(info.version.is_none());
    }

    #[test]
    fn test_no_requirements_is_ok() {
        let results = check_prerequisites(false, None).unwrap();
        assert!(results.is_empty());
    }
}
