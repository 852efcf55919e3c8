//! Product configuration trait for CLI binaries
//!
//! Each generator binary implements this trait to define its identity, the
//! template it scaffolds from and what it tells the user afterwards.

use crate::runtime::bootstrap::PackageManager;
use std::path::Path;

pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Default template reference (git URL, zip URL or directory)
    fn default_template_ref(&self) -> &'static str;

    /// Environment variable name for overriding the template reference
    fn template_ref_env(&self) -> &'static str;

    /// Environment variable name for overriding the package manager
    fn package_manager_env(&self) -> &'static str;

    fn default_package_manager(&self) -> PackageManager {
        PackageManager::Pnpm
    }

    /// Folder name suggested by the project name prompt
    fn default_project_name(&self) -> &'static str;

    /// Documentation link printed under the next steps
    fn docs_url(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path, package_manager: PackageManager, installed: bool)
        -> Vec<String>;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
