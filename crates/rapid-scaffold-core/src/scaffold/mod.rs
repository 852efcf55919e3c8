//! Scaffold engine: turns a staged template tree into a project layout
//!
//! This module provides:
//! - The declarative relocation rule table ([`RuleSet`])
//! - The existing-destination policy
//! - The ordered engine itself ([`Scaffolder`])
//! - Run reports and dry-run plans

pub mod engine;
pub mod policy;
pub mod report;
pub mod rules;

pub use engine::{scaffold, Scaffolder};
pub use policy::ExistingDestPolicy;
pub use report::{Relocated, ScaffoldPlan, ScaffoldReport, SoftMissing};
pub use rules::{EntryKind, RelocationRule, RuleSet};
