//! Design-system variants and the closed catalog they are chosen from

use crate::error::{ScaffoldError, ScaffoldResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix shared by every variant subtree inside a template
pub const VARIANT_FOLDER_PREFIX: &str = "components-";

/// One design system the template ships a subtree for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Selection name (e.g. `material-ui`)
    pub name: String,

    /// Subtree name inside the variant root (e.g. `components-materialUi`)
    pub folder: String,

    /// Additional names accepted on the command line
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Human-readable name for prompts
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Variant {
    pub fn new(name: &str, folder: &str) -> Self {
        Self {
            name: name.to_string(),
            folder: folder.to_string(),
            aliases: Vec::new(),
            display_name: None,
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_display_name(mut self, display_name: &str) -> Self {
        self.display_name = Some(display_name.to_string());
        self
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Case-insensitive match against the name and aliases
    pub fn matches(&self, input: &str) -> bool {
        let input = input.trim();
        self.name.eq_ignore_ascii_case(input)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(input))
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The closed set of variants for one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantCatalog {
    variants: Vec<Variant>,
}

impl VariantCatalog {
    /// Build a catalog, rejecting empty sets and duplicate names or folders
    pub fn new(variants: Vec<Variant>) -> ScaffoldResult<Self> {
        if variants.is_empty() {
            return Err(ScaffoldError::invalid_input(
                "variant catalog must contain at least one design system",
            ));
        }

        for (i, variant) in variants.iter().enumerate() {
            if variant.name.trim().is_empty() || variant.folder.trim().is_empty() {
                return Err(ScaffoldError::invalid_input(
                    "variant name and folder must not be empty",
                ));
            }
            if variant.folder.contains('/') || variant.folder.contains('\\') {
                return Err(ScaffoldError::invalid_input(format!(
                    "variant folder '{}' must be a single path segment",
                    variant.folder
                )));
            }
            for other in &variants[i + 1..] {
                if other.name.eq_ignore_ascii_case(&variant.name) {
                    return Err(ScaffoldError::invalid_input(format!(
                        "duplicate variant name '{}'",
                        variant.name
                    )));
                }
                if other.folder == variant.folder {
                    return Err(ScaffoldError::invalid_input(format!(
                        "variants '{}' and '{}' share folder '{}'",
                        variant.name, other.name, variant.folder
                    )));
                }
            }
        }

        Ok(Self { variants })
    }

    /// Material UI, Ant Design and Tailwind
    pub fn builtin() -> Self {
        Self {
            variants: vec![
                Variant::new("material-ui", "components-materialUi")
                    .with_aliases(&["mui", "material"])
                    .with_display_name("Material UI"),
                Variant::new("antd", "components-antd")
                    .with_aliases(&["ant-design", "ant"])
                    .with_display_name("Ant Design"),
                Variant::new("tailwind", "components-tailwind")
                    .with_aliases(&["tw", "tailwindcss"])
                    .with_display_name("Tailwind CSS"),
            ],
        }
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn names(&self) -> Vec<&str> {
        self.variants.iter().map(|v| v.name.as_str()).collect()
    }

    /// Resolve user input to a catalog member
    pub fn parse(&self, input: &str) -> ScaffoldResult<&Variant> {
        self.variants.iter().find(|v| v.matches(input)).ok_or_else(|| {
            ScaffoldError::invalid_input(format!(
                "unknown variant '{}'. Available variants: {}",
                input.trim(),
                self.names().join(", ")
            ))
        })
    }

    /// Check that a variant value belongs to this catalog
    pub fn ensure_member(&self, variant: &Variant) -> ScaffoldResult<()> {
        if self.variants.iter().any(|v| v == variant) {
            Ok(())
        } else {
            Err(ScaffoldError::invalid_input(format!(
                "unknown variant '{}'. Available variants: {}",
                variant.name,
                self.names().join(", ")
            )))
        }
    }

    /// True when `segment` names any variant subtree of this catalog
    pub fn is_variant_folder(&self, segment: &str) -> bool {
        self.variants.iter().any(|v| v.folder == segment)
    }
}

impl Default for VariantCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
