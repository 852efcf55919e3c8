//! Handling of a destination directory that already exists

use crate::error::{ScaffoldError, ScaffoldResult, Step};
use crate::templates::copier::remove_path;
use std::fs;
use std::io;
use std::path::Path;

/// What to do when the destination already has content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExistingDestPolicy {
    /// Clear everything except the dependency cache
    #[default]
    PreserveCache,
    /// Clear everything, dependency cache included
    #[value(name = "clear")]
    ClearAll,
    /// Fail when the destination is not empty
    Refuse,
}

/// Result of preparing the destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Prepared {
    /// The destination did not exist and was created
    pub created: bool,
    /// Number of top-level entries removed
    pub cleared: usize,
    /// The dependency cache existed and was kept
    pub cache_preserved: bool,
}

/// Reject destinations the policy cannot handle, without touching anything
pub fn check_destination(dest: &Path, policy: ExistingDestPolicy) -> ScaffoldResult<()> {
    let metadata = match fs::metadata(dest) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(ScaffoldError::relocation(Step::PrepareDestination, dest, e)),
    };

    if !metadata.is_dir() {
        return Err(ScaffoldError::DestinationConflict {
            path: dest.to_path_buf(),
            reason: "path exists and is not a directory".to_string(),
        });
    }

    if policy == ExistingDestPolicy::Refuse && !is_empty_dir(dest)? {
        return Err(ScaffoldError::DestinationConflict {
            path: dest.to_path_buf(),
            reason: "directory already exists and is not empty".to_string(),
        });
    }

    Ok(())
}

/// Create or clear the destination according to `policy`
pub fn prepare_destination(
    dest: &Path,
    policy: ExistingDestPolicy,
    dependency_cache: &str,
) -> ScaffoldResult<Prepared> {
    check_destination(dest, policy)?;

    if !dest.exists() {
        fs::create_dir_all(dest)
            .map_err(|e| ScaffoldError::relocation(Step::PrepareDestination, dest, e))?;
        tracing::info!(path = %dest.display(), "created destination");
        return Ok(Prepared {
            created: true,
            ..Prepared::default()
        });
    }

    let mut prepared = Prepared::default();
    let entries =
        fs::read_dir(dest).map_err(|e| ScaffoldError::relocation(Step::PrepareDestination, dest, e))?;

    for entry in entries {
        let entry =
            entry.map_err(|e| ScaffoldError::relocation(Step::PrepareDestination, dest, e))?;
        let path = entry.path();

        if policy == ExistingDestPolicy::PreserveCache && entry.file_name() == dependency_cache {
            prepared.cache_preserved = true;
            continue;
        }

        remove_path(&path)
            .map_err(|e| ScaffoldError::relocation(Step::PrepareDestination, &path, e))?;
        prepared.cleared += 1;
    }

    tracing::info!(
        path = %dest.display(),
        cleared = prepared.cleared,
        cache_preserved = prepared.cache_preserved,
        "reset existing destination"
    );
    Ok(prepared)
}

fn is_empty_dir(dir: &Path) -> ScaffoldResult<bool> {
    let mut entries =
        fs::read_dir(dir).map_err(|e| ScaffoldError::relocation(Step::PrepareDestination, dir, e))?;
    Ok(entries.next().is_none())
}
