//! Optional `scaffold.yaml` manifest shipped at a template's root

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::scaffold::rules::{RelocationRule, RuleSet};
use crate::variant::{Variant, VariantCatalog};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up at the template root
pub const MANIFEST_FILE: &str = "scaffold.yaml";

/// Template-side description of its own shape
///
/// Every field except `version` is optional; missing fields fall back to the
/// built-in rule table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaffoldManifest {
    /// Minimum generator version the template was written for
    pub version: String,

    /// Directory holding the variant folders
    #[serde(default)]
    pub variant_root: Option<PathBuf>,

    #[serde(default)]
    pub variants: Option<Vec<Variant>>,

    #[serde(default)]
    pub rules: Option<Vec<RelocationRule>>,

    /// Variant-relative dependency manifest copied to the project root
    #[serde(default)]
    pub manifest: Option<String>,

    /// Paths that must exist in the template
    #[serde(default)]
    pub skeleton: Option<Vec<PathBuf>>,

    /// Root files that never ship in a generated project
    #[serde(default)]
    pub generator_files: Option<Vec<PathBuf>>,

    #[serde(default)]
    pub dependency_cache: Option<String>,
}

impl ScaffoldManifest {
    pub fn parse(content: &str) -> ScaffoldResult<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            ScaffoldError::invalid_input(format!("failed to parse {}: {}", MANIFEST_FILE, e))
        })
    }

    /// Read the manifest from a template root, if the template ships one
    pub fn load(template_root: &Path) -> ScaffoldResult<Option<Self>> {
        let path = template_root.join(MANIFEST_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path).map_err(|e| {
            ScaffoldError::invalid_input(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content).map(Some)
    }

    /// Overlay this manifest on the built-in rule table
    pub fn into_rule_set(self) -> ScaffoldResult<RuleSet> {
        let mut rules = RuleSet::builtin();
        rules.version = self.version;

        if let Some(root) = self.variant_root {
            rules.variant_root = root;
        }
        if let Some(variants) = self.variants {
            rules.catalog = VariantCatalog::new(variants)?;
        }
        if let Some(table) = self.rules {
            rules.rules = table;
        }
        if let Some(manifest) = self.manifest {
            rules.manifest = manifest;
        }
        if let Some(skeleton) = self.skeleton {
            rules.skeleton = skeleton;
        }
        if let Some(files) = self.generator_files {
            rules.generator_files = files;
        }
        if let Some(cache) = self.dependency_cache {
            rules.dependency_cache = cache;
        }

        let manifest_file = PathBuf::from(MANIFEST_FILE);
        if !rules.generator_files.contains(&manifest_file) {
            rules.generator_files.push(manifest_file);
        }

        rules.validate()?;
        Ok(rules)
    }
}
