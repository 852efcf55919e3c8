//! Rapid Scaffold Core - design-system frontend project scaffolding
//!
//! This library turns a canonical template tree holding one subtree per UI
//! design system (`components-<variant>`) into a project for exactly one of
//! them: it copies the shared skeleton, relocates the chosen variant's
//! subtrees into the canonical layout, prunes every other variant and hands
//! the result to the package manager.
//!
//! # Architecture
//!
//! - **Layer 1: Core Operations** - Path resolution, template fetching, the
//!   scaffold engine, tool detection and bootstrap steps
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait and
//!   `GeneratorSettings` for custom front ends
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use rapid_scaffold_core::{scaffold, ExistingDestPolicy, TemplateFetcher, TemplateSource};
//!
//! let fetcher = TemplateFetcher::new(TemplateSource::parse("https://github.com/mnisrei/test.git"), "rapid-fe");
//! let staged = fetcher.stage().await?;
//! let report = scaffold(staged.path(), "antd", &dest, ExistingDestPolicy::default())?;
//! for skipped in &report.soft_missing {
//!     eprintln!("skipped {}", skipped);
//! }
//! ```

pub mod config;
pub mod error;
pub mod product;
pub mod resolver;
pub mod runtime;
pub mod scaffold;
pub mod templates;
pub mod variant;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{GeneratorSettings, SettingsOverrides};
pub use error::{ScaffoldError, ScaffoldResult, Step};
pub use product::ProductConfig;
pub use resolver::resolve;
pub use runtime::{BootstrapRunner, PackageManager, RuntimeInfo};
pub use scaffold::{
    scaffold, ExistingDestPolicy, RelocationRule, RuleSet, ScaffoldPlan, ScaffoldReport,
    Scaffolder, SoftMissing,
};
pub use templates::{StagedTemplate, TemplateFetcher, TemplateSource};
pub use variant::{Variant, VariantCatalog};

#[cfg(feature = "tui")]
pub use tui::run;
