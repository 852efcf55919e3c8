//! Dependency installation and dev-server launch
//!
//! The package manager is an opaque collaborator: its output goes straight to
//! the user's terminal and only the exit status is interpreted.

use crate::error::{ScaffoldError, ScaffoldResult};
use colored::Colorize;
use std::fmt;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::str::FromStr;
use tokio::process::Command;

/// Supported package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PackageManager {
    #[default]
    Pnpm,
    Npm,
    Yarn,
    Bun,
}

impl PackageManager {
    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Pnpm => "pnpm",
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    pub fn install_args(&self) -> &'static [&'static str] {
        &["install"]
    }

    pub fn dev_args(&self) -> &'static [&'static str] {
        &["run", "dev"]
    }

    /// Whether the package manager runs on top of Node.js
    pub fn needs_node(&self) -> bool {
        !matches!(self, PackageManager::Bun)
    }

    pub fn docs_url(&self) -> &'static str {
        match self {
            PackageManager::Pnpm => "https://pnpm.io/installation",
            PackageManager::Npm => "https://docs.npmjs.com/downloading-and-installing-node-js-and-npm",
            PackageManager::Yarn => "https://yarnpkg.com/getting-started/install",
            PackageManager::Bun => "https://bun.sh/docs/installation",
        }
    }

    /// Full command line, for display
    pub fn command_line(&self, args: &[&str]) -> String {
        std::iter::once(self.binary())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.binary())
    }
}

impl FromStr for PackageManager {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pnpm" => Ok(PackageManager::Pnpm),
            "npm" => Ok(PackageManager::Npm),
            "yarn" => Ok(PackageManager::Yarn),
            "bun" => Ok(PackageManager::Bun),
            other => Err(ScaffoldError::invalid_input(format!(
                "unknown package manager '{}'. Supported: pnpm, npm, yarn, bun",
                other
            ))),
        }
    }
}

/// Runs the install and dev steps inside a finished project
#[derive(Debug, Clone)]
pub struct BootstrapRunner {
    package_manager: PackageManager,
}

impl BootstrapRunner {
    pub fn new(package_manager: PackageManager) -> Self {
        Self { package_manager }
    }

    /// `<pm> install` in `dest`
    pub async fn install(&self, dest: &Path) -> ScaffoldResult<ExitStatus> {
        self.run(dest, self.package_manager.install_args()).await
    }

    /// `<pm> run dev` in `dest`; returns when the dev server exits
    pub async fn run_dev(&self, dest: &Path) -> ScaffoldResult<ExitStatus> {
        self.run(dest, self.package_manager.dev_args()).await
    }

    async fn run(&self, dest: &Path, args: &[&str]) -> ScaffoldResult<ExitStatus> {
        let command = self.package_manager.command_line(args);
        println!();
        println!("{} {}", "Running:".dimmed(), command.yellow());
        println!();

        tracing::info!(command = %command, cwd = %dest.display(), "running bootstrap step");
        let status = Command::new(self.package_manager.binary())
            .args(args)
            .current_dir(dest)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| ScaffoldError::Bootstrap {
                command: command.clone(),
                status: format!("failed to start: {}", e),
            })?;

        if status.success() {
            Ok(status)
        } else {
            Err(ScaffoldError::bootstrap_status(command, status))
        }
    }

    /// Open the package manager's installation docs in the default browser
    pub fn open_docs(&self) -> anyhow::Result<()> {
        println!(
            "{}",
            format!("Opening {} installation docs in your browser...", self.package_manager).cyan()
        );
        open::that(self.package_manager.docs_url())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_package_manager() {
        assert_eq!("pnpm".parse::<PackageManager>().unwrap(), PackageManager::Pnpm);
        assert_eq!(" NPM ".parse::<PackageManager>().unwrap(), PackageManager::Npm);
        assert!("pip".parse::<PackageManager>().is_err());
    }

    #[test]
    fn test_command_lines() {
        let pm = PackageManager::Pnpm;
        assert_eq!(pm.command_line(pm.install_args()), "pnpm install");
        assert_eq!(pm.command_line(pm.dev_args()), "pnpm run dev");
    }

    #[test]
    fn test_bun_does_not_need_node() {
        assert!(!PackageManager::Bun.needs_node());
        assert!(PackageManager::Yarn.needs_node());
    }

    #[tokio::test]
    async fn test_missing_binary_is_bootstrap_error() {
        let dir = tempfile::TempDir::new().unwrap();
        // a directory that does not exist makes spawning fail regardless of PATH
        let runner = BootstrapRunner::new(PackageManager::Pnpm);
        let err = runner.install(&dir.path().join("missing")).await.unwrap_err();
        assert!(matches!(err, ScaffoldError::Bootstrap { .. }));
        assert!(err.to_string().contains("pnpm install"));
    }
}
