//! Template fetching, manifest parsing, and copying
//!
//! This module provides:
//! - Template fetching from git, zip archives or local directories
//! - The optional `scaffold.yaml` manifest and its rule-table overlay
//! - Filtered tree copying
//! - Version compatibility checking

pub mod copier;
pub mod fetcher;
pub mod manifest;
pub mod version;

use crate::error::ScaffoldResult;
use crate::scaffold::RuleSet;
use std::path::Path;

pub use copier::{copy_tree, CopyFilter, CopyStats};
pub use fetcher::{StagedTemplate, TemplateFetcher, TemplateSource};
pub use manifest::{ScaffoldManifest, MANIFEST_FILE};
pub use version::check_compatibility;

/// Rule table for a staged template, plus a version warning when the
/// template's manifest asks for a newer generator
pub fn load_rule_set(
    template_root: &Path,
    cli_version: &str,
    upgrade_command: &str,
) -> ScaffoldResult<(RuleSet, Option<String>)> {
    match ScaffoldManifest::load(template_root)? {
        Some(manifest) => {
            let warning = check_compatibility(cli_version, &manifest.version, upgrade_command);
            let rules = manifest.into_rule_set()?;
            tracing::info!(version = %rules.version, "using template scaffold manifest");
            Ok((rules, warning))
        }
        None => Ok((RuleSet::builtin(), None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_builtin_rules_without_manifest() {
        let dir = tempfile::TempDir::new().unwrap();
        let (rules, warning) = load_rule_set(dir.path(), "0.1.0", "upgrade").unwrap();
        assert_eq!(rules, RuleSet::builtin());
        assert!(warning.is_none());
    }

    #[test]
    fn test_manifest_newer_than_generator_warns() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "version: 9.0.0\n").unwrap();
        let (rules, warning) = load_rule_set(dir.path(), "0.1.0", "upgrade").unwrap();
        assert_eq!(rules.version, "9.0.0");
        assert!(warning.unwrap().contains("9.0.0"));
    }
}
