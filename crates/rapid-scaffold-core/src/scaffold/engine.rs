//! The scaffold engine: skeleton copy, relocation and pruning
//!
//! Steps run strictly in order; each assumes the previous one's filesystem
//! state. Everything that can be rejected without touching the destination
//! (unknown variant, missing skeleton, destination conflicts) is checked in
//! [`Scaffolder::preflight`] before step 1.

use crate::error::{ScaffoldError, ScaffoldResult, Step};
use crate::resolver::normalize;
use crate::scaffold::policy::{self, ExistingDestPolicy};
use crate::scaffold::report::{Relocated, ScaffoldPlan, ScaffoldReport, SoftMissing};
use crate::scaffold::rules::{EntryKind, RelocationRule, RuleSet};
use crate::templates::copier::{self, CopyError, CopyFilter};
use crate::variant::Variant;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Result of looking up one rule's source in the template
enum RuleSource {
    Present { path: PathBuf, files: usize },
    Missing(SoftMissing),
}

#[derive(Debug, Clone)]
pub struct Scaffolder {
    rules: RuleSet,
}

impl Scaffolder {
    pub fn new(rules: RuleSet) -> ScaffoldResult<Self> {
        rules.validate()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Resolve a variant name against this engine's catalog
    pub fn variant(&self, name: &str) -> ScaffoldResult<&Variant> {
        self.rules.catalog.parse(name)
    }

    /// Compute what `scaffold` would do, without touching the destination.
    /// Fails exactly where the real run would fail before step 1.
    pub fn plan(
        &self,
        template: &Path,
        variant: &Variant,
        dest: &Path,
        existing: ExistingDestPolicy,
    ) -> ScaffoldResult<ScaffoldPlan> {
        self.preflight(template, variant, dest, existing)?;

        let mut plan = ScaffoldPlan {
            variant: variant.name.clone(),
            ..ScaffoldPlan::default()
        };

        let variant_dir = template.join(self.rules.variant_dir(variant));
        if !variant_dir.is_dir() {
            plan.soft_missing.push(self.missing_variant(variant));
            return Ok(plan);
        }

        let manifest = self.rules.manifest_rule();
        let steps = self
            .rules
            .rules
            .iter()
            .map(|rule| (rule, Step::Relocate))
            .chain(std::iter::once((&manifest, Step::CopyManifest)));
        for (rule, step) in steps {
            match self.inspect(&variant_dir, rule, step)? {
                RuleSource::Present { files, .. } => plan.relocations.push(Relocated {
                    rule: rule.label(),
                    dest: PathBuf::from(&rule.dest),
                    files,
                }),
                RuleSource::Missing(missing) => plan.soft_missing.push(missing),
            }
        }

        Ok(plan)
    }

    /// Assemble `dest` from `template` for the selected `variant`
    pub fn scaffold(
        &self,
        template: &Path,
        variant: &Variant,
        dest: &Path,
        existing: ExistingDestPolicy,
    ) -> ScaffoldResult<ScaffoldReport> {
        self.preflight(template, variant, dest, existing)?;

        let mut report = ScaffoldReport::new(dest.to_path_buf(), &variant.name);
        tracing::info!(
            variant = %variant.name,
            template = %template.display(),
            dest = %dest.display(),
            "scaffolding project"
        );

        // Step 1
        let prepared = policy::prepare_destination(dest, existing, &self.rules.dependency_cache)?;
        report.created = prepared.created;
        report.cache_preserved = prepared.cache_preserved;

        // Step 2
        report.skeleton = self.copy_skeleton(template, dest)?;
        tracing::info!(files = report.skeleton.files, "copied shared skeleton");

        // Step 3
        let variant_dir = template.join(self.rules.variant_dir(variant));
        let variant_present = variant_dir.is_dir();
        if !variant_present {
            let missing = self.missing_variant(variant);
            tracing::warn!(variant = %variant.name, path = %missing.path.display(), "variant subtree missing");
            report.soft_missing.push(missing);
        } else {
            for rule in &self.rules.rules {
                self.relocate(&variant_dir, rule, dest, Step::Relocate, &mut report)?;
            }
        }

        // Step 4
        if variant_present {
            let manifest = self.rules.manifest_rule();
            self.relocate(&variant_dir, &manifest, dest, Step::CopyManifest, &mut report)?;
        }

        // Step 5
        for path in self.variant_leftovers(dest)? {
            copier::remove_path(&path)
                .map_err(|e| ScaffoldError::relocation(Step::PruneVariants, &path, e))?;
            tracing::info!(path = %path.display(), "pruned variant folder");
            report.removed.push(path);
        }

        // Step 6
        for rel in &self.rules.generator_files {
            let path = dest.join(rel);
            let removed = copier::remove_path(&path)
                .map_err(|e| ScaffoldError::relocation(Step::RemoveGeneratorFiles, &path, e))?;
            if removed {
                tracing::info!(path = %path.display(), "removed generator file");
                report.removed.push(path);
            }
        }

        tracing::info!(
            files = report.total_files(),
            skipped = report.soft_missing.len(),
            "scaffold complete"
        );
        Ok(report)
    }

    /// Every check that must pass before the destination is touched
    pub fn preflight(
        &self,
        template: &Path,
        variant: &Variant,
        dest: &Path,
        existing: ExistingDestPolicy,
    ) -> ScaffoldResult<()> {
        self.check_inputs(template, variant)?;

        if overlaps(template, dest) {
            return Err(ScaffoldError::DestinationConflict {
                path: dest.to_path_buf(),
                reason: format!(
                    "destination overlaps the template tree at {}",
                    template.display()
                ),
            });
        }

        policy::check_destination(dest, existing)
    }

    fn check_inputs(&self, template: &Path, variant: &Variant) -> ScaffoldResult<()> {
        self.rules.catalog.ensure_member(variant)?;

        if !template.is_dir() {
            return Err(ScaffoldError::invalid_input(format!(
                "template tree not found at {}",
                template.display()
            )));
        }

        let missing: Vec<String> = self
            .rules
            .skeleton
            .iter()
            .filter(|rel| !template.join(rel).exists())
            .map(|rel| rel.display().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ScaffoldError::invalid_input(format!(
                "template at {} is missing its shared skeleton: {}",
                template.display(),
                missing.join(", ")
            )));
        }

        Ok(())
    }

    fn copy_skeleton(&self, template: &Path, dest: &Path) -> ScaffoldResult<copier::CopyStats> {
        let mut filter = CopyFilter::new()
            .exclude_paths(self.rules.skeleton_exclusions())
            .exclude_path(&self.rules.dependency_cache);
        for variant in self.rules.catalog.variants() {
            filter = filter.exclude_name(variant.folder.as_str());
        }

        copier::copy_tree(template, dest, &filter).map_err(|e| copy_failure(Step::CopySkeleton, e))
    }

    fn relocate(
        &self,
        variant_dir: &Path,
        rule: &RelocationRule,
        dest: &Path,
        step: Step,
        report: &mut ScaffoldReport,
    ) -> ScaffoldResult<()> {
        let source = match self.inspect(variant_dir, rule, step)? {
            RuleSource::Present { path, .. } => path,
            RuleSource::Missing(missing) => {
                tracing::warn!(rule = %missing.rule, reason = %missing.reason, "skipping relocation");
                report.soft_missing.push(missing);
                return Ok(());
            }
        };

        let target = dest.join(&rule.dest);
        let files = match rule.kind {
            EntryKind::Directory => {
                copier::copy_tree(&source, &target, &CopyFilter::new())
                    .map_err(|e| copy_failure(step, e))?
                    .files
            }
            EntryKind::File => {
                copier::copy_file(&source, &target).map_err(|e| copy_failure(step, e))?;
                1
            }
        };

        tracing::info!(rule = %rule.label(), files, "relocated");
        report.relocations.push(Relocated {
            rule: rule.label(),
            dest: PathBuf::from(&rule.dest),
            files,
        });
        Ok(())
    }

    fn inspect(
        &self,
        variant_dir: &Path,
        rule: &RelocationRule,
        step: Step,
    ) -> ScaffoldResult<RuleSource> {
        let path = variant_dir.join(&rule.source);

        let metadata = match path.metadata() {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(soft_missing(rule, path, "not present in template"));
            }
            Err(e) => return Err(ScaffoldError::relocation(step, &path, e)),
        };

        let source = match (rule.kind, metadata.is_dir()) {
            (EntryKind::Directory, true) => {
                let files = count_files(&path);
                RuleSource::Present { path, files }
            }
            (EntryKind::File, false) => RuleSource::Present { path, files: 1 },
            (EntryKind::Directory, false) => {
                soft_missing(rule, path, "expected a directory, found a file")
            }
            (EntryKind::File, true) => soft_missing(rule, path, "expected a file, found a directory"),
        };
        Ok(source)
    }

    fn missing_variant(&self, variant: &Variant) -> SoftMissing {
        SoftMissing {
            rule: variant.folder.clone(),
            path: self.rules.variant_dir(variant),
            reason: "variant subtree not present in template".to_string(),
        }
    }

    /// Destination entries named after any variant folder, outside the cache
    fn variant_leftovers(&self, dest: &Path) -> ScaffoldResult<Vec<PathBuf>> {
        let mut found = Vec::new();
        let mut walker = WalkDir::new(dest).min_depth(1).follow_links(false).into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry.map_err(|e| walk_failure(Step::PruneVariants, dest, e))?;
            let is_dir = entry.file_type().is_dir();
            let name = entry.file_name().to_string_lossy();

            if entry.depth() == 1 && name == self.rules.dependency_cache.as_str() {
                if is_dir {
                    walker.skip_current_dir();
                }
                continue;
            }

            if self.rules.catalog.is_variant_folder(&name) {
                found.push(entry.path().to_path_buf());
                if is_dir {
                    walker.skip_current_dir();
                }
            }
        }

        Ok(found)
    }
}

impl Default for Scaffolder {
    fn default() -> Self {
        Self {
            rules: RuleSet::builtin(),
        }
    }
}

/// Scaffold with the built-in rule table, resolving `variant` by name
pub fn scaffold(
    template: &Path,
    variant: &str,
    dest: &Path,
    existing: ExistingDestPolicy,
) -> ScaffoldResult<ScaffoldReport> {
    let scaffolder = Scaffolder::default();
    let variant = scaffolder.variant(variant)?.clone();
    scaffolder.scaffold(template, &variant, dest, existing)
}

/// Whether either tree contains the other, compared as absolute paths
fn overlaps(template: &Path, dest: &Path) -> bool {
    let absolute = |path: &Path| {
        let full = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        normalize(&full)
    };
    let template = absolute(template);
    let dest = absolute(dest);
    dest.starts_with(&template) || template.starts_with(&dest)
}

fn soft_missing(rule: &RelocationRule, path: PathBuf, reason: &str) -> RuleSource {
    RuleSource::Missing(SoftMissing {
        rule: rule.label(),
        path,
        reason: reason.to_string(),
    })
}

fn count_files(dir: &Path) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| !e.file_type().is_dir())
        .count()
}

fn copy_failure(step: Step, err: CopyError) -> ScaffoldError {
    ScaffoldError::relocation(step, err.path, err.source)
}

fn walk_failure(step: Step, fallback: &Path, err: walkdir::Error) -> ScaffoldError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| fallback.to_path_buf());
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
    ScaffoldError::relocation(step, path, source)
}
