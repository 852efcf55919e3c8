//! What a scaffolding run did and what it skipped

use crate::templates::copier::CopyStats;
use std::fmt;
use std::path::PathBuf;

/// An optional template piece that was absent; the run continues without it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftMissing {
    /// Rule label, or the variant folder when the whole subtree is absent
    pub rule: String,
    /// Template path that was looked for
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for SoftMissing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.rule, self.path.display(), self.reason)
    }
}

/// One relocation rule that was applied (or would be, for a plan)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocated {
    pub rule: String,
    /// Destination path relative to the project root
    pub dest: PathBuf,
    pub files: usize,
}

/// Dry-run result: what `scaffold` would relocate and what it would skip
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldPlan {
    pub variant: String,
    pub relocations: Vec<Relocated>,
    pub soft_missing: Vec<SoftMissing>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub destination: PathBuf,
    pub variant: String,
    pub created: bool,
    pub cache_preserved: bool,
    pub skeleton: CopyStats,
    pub relocations: Vec<Relocated>,
    pub soft_missing: Vec<SoftMissing>,
    /// Destination paths deleted by the prune and cleanup steps
    pub removed: Vec<PathBuf>,
}

impl ScaffoldReport {
    pub fn new(destination: PathBuf, variant: &str) -> Self {
        Self {
            destination,
            variant: variant.to_string(),
            created: false,
            cache_preserved: false,
            skeleton: CopyStats::default(),
            relocations: Vec::new(),
            soft_missing: Vec::new(),
            removed: Vec::new(),
        }
    }

    pub fn total_files(&self) -> usize {
        self.skeleton.files + self.relocations.iter().map(|r| r.files).sum::<usize>()
    }

    pub fn has_warnings(&self) -> bool {
        !self.soft_missing.is_empty()
    }

    /// One line per skipped piece, for the end-of-run summary
    pub fn warning_lines(&self) -> Vec<String> {
        self.soft_missing.iter().map(|m| m.to_string()).collect()
    }
}
