//! Declarative relocation rule table
//!
//! A [`RuleSet`] is everything the engine needs to know about a template's
//! shape: which variants exist, where their subtrees live, what gets moved
//! where, which skeleton paths are mandatory and which files never ship.
//! Adding a design system is a catalog row, not new control flow.

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::variant::{Variant, VariantCatalog};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Version of the built-in rule table
pub const BUILTIN_RULES_VERSION: &str = "1.0.0";

/// File name of the project manifest at the destination root
pub const ROOT_MANIFEST: &str = "package.json";

/// Conventional name of the installed-packages directory
pub const DEFAULT_DEPENDENCY_CACHE: &str = "node_modules";

/// Whether a rule moves a directory or a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    Directory,
    File,
}

/// One row of the relocation table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocationRule {
    /// Path relative to the active variant's folder
    pub source: String,

    /// Path relative to the project root
    pub dest: String,

    #[serde(default)]
    pub kind: EntryKind,
}

impl RelocationRule {
    pub fn directory(source: &str, dest: &str) -> Self {
        Self {
            source: source.to_string(),
            dest: dest.to_string(),
            kind: EntryKind::Directory,
        }
    }

    pub fn file(source: &str, dest: &str) -> Self {
        Self {
            source: source.to_string(),
            dest: dest.to_string(),
            kind: EntryKind::File,
        }
    }

    /// Short label used in reports and logs
    pub fn label(&self) -> String {
        format!("{} -> {}", self.source, self.dest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    /// Semver of the rule table
    pub version: String,
    pub catalog: VariantCatalog,
    /// Directory (relative to the template root) holding the variant folders
    pub variant_root: PathBuf,
    pub rules: Vec<RelocationRule>,
    /// Variant-relative path of the dependency manifest. It always lands at
    /// [`ROOT_MANIFEST`] in the project.
    pub manifest: String,
    /// Paths that must exist in the template before anything is touched
    pub skeleton: Vec<PathBuf>,
    /// Root-relative paths that never ship in a scaffolded project
    pub generator_files: Vec<PathBuf>,
    /// Root-relative directory kept across re-runs
    pub dependency_cache: String,
}

impl RuleSet {
    pub fn builtin() -> Self {
        Self {
            version: BUILTIN_RULES_VERSION.to_string(),
            catalog: VariantCatalog::builtin(),
            variant_root: PathBuf::from("src"),
            rules: vec![
                RelocationRule::directory("hook", "src/hooks"),
                RelocationRule::directory("components", "src/components/components"),
                RelocationRule::directory("pages", "src/components/pages"),
                RelocationRule::directory("shared-components", "src/components/shared-components"),
                RelocationRule::directory("Themes", "src/utils/Themes"),
                RelocationRule::file("App.tsx", "src/App.tsx"),
            ],
            manifest: "package.json".to_string(),
            skeleton: vec![PathBuf::from("src"), PathBuf::from("public")],
            generator_files: vec![PathBuf::from("index.js"), PathBuf::from("scaffold.yaml")],
            dependency_cache: DEFAULT_DEPENDENCY_CACHE.to_string(),
        }
    }

    /// Check every path in the table is relative and stays inside its root
    pub fn validate(&self) -> ScaffoldResult<()> {
        check_relative("variant_root", &self.variant_root)?;
        check_relative("manifest", Path::new(&self.manifest))?;
        check_relative("dependency_cache", Path::new(&self.dependency_cache))?;
        for rule in &self.rules {
            check_relative("rule source", Path::new(&rule.source))?;
            check_relative("rule dest", Path::new(&rule.dest))?;
        }
        for path in self.skeleton.iter().chain(&self.generator_files) {
            check_relative("skeleton/generator path", path)?;
        }
        Ok(())
    }

    /// Template-relative path of a variant's subtree
    pub fn variant_dir(&self, variant: &Variant) -> PathBuf {
        self.variant_root.join(&variant.folder)
    }

    /// Template-relative paths of every variant subtree
    pub fn all_variant_dirs(&self) -> Vec<PathBuf> {
        self.catalog
            .variants()
            .iter()
            .map(|v| self.variant_dir(v))
            .collect()
    }

    /// Rule copying the variant's manifest to the project root
    pub fn manifest_rule(&self) -> RelocationRule {
        RelocationRule::file(&self.manifest, ROOT_MANIFEST)
    }

    /// Paths the bulk skeleton copy must skip, relative to the template root
    pub fn skeleton_exclusions(&self) -> Vec<PathBuf> {
        let mut excluded = self.all_variant_dirs();
        excluded.push(PathBuf::from(ROOT_MANIFEST));
        excluded.extend(self.generator_files.iter().cloned());
        excluded
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_relative(what: &str, path: &Path) -> ScaffoldResult<()> {
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if path.as_os_str().is_empty() || escapes {
        return Err(ScaffoldError::invalid_input(format!(
            "{} '{}' must be a relative path inside the project",
            what,
            path.display()
        )));
    }
    Ok(())
}
