//! Filtered tree copying for staged templates

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Version-control metadata directory, never copied
pub const VCS_DIR: &str = ".git";

#[derive(Debug, Error)]
#[error("{}: {source}", path.display())]
pub struct CopyError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl CopyError {
    fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Counts of what a copy produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub dirs: usize,
}

/// Which template entries a copy skips
///
/// Paths are matched exactly against the entry's path relative to the copy
/// source; names are matched against every path segment. `.git` is always
/// skipped.
#[derive(Debug, Clone, Default)]
pub struct CopyFilter {
    excluded_paths: Vec<PathBuf>,
    excluded_names: Vec<String>,
}

impl CopyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclude_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.excluded_paths.push(path.into());
        self
    }

    pub fn exclude_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.excluded_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn exclude_name(mut self, name: impl Into<String>) -> Self {
        self.excluded_names.push(name.into());
        self
    }

    /// Decide whether a source-relative path is part of the copy
    pub fn should_include(&self, rel: &Path) -> bool {
        if rel.as_os_str().is_empty() {
            return true;
        }
        let named = rel.components().any(|c| {
            let segment = c.as_os_str();
            segment == VCS_DIR || self.excluded_names.iter().any(|n| segment == n.as_str())
        });
        !named && !self.excluded_paths.iter().any(|ex| rel == ex.as_path())
    }
}

/// Copy `src` into `dest`, skipping whatever `filter` rejects (and everything
/// below it).
///
/// Excluded subtrees are pruned during the walk so they never appear in
/// `dest`, not even transiently. Existing files in `dest` are overwritten and
/// existing directories are merged into.
pub fn copy_tree(src: &Path, dest: &Path, filter: &CopyFilter) -> Result<CopyStats, CopyError> {
    let mut stats = CopyStats::default();

    fs::create_dir_all(dest).map_err(|e| CopyError::new(dest, e))?;

    let walker = WalkDir::new(src)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| match entry.path().strip_prefix(src) {
            Ok(rel) => filter.should_include(rel),
            Err(_) => false,
        });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| src.to_path_buf());
            let source = e
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
            CopyError::new(path, source)
        })?;

        let rel = match entry.path().strip_prefix(src) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel,
            _ => continue,
        };
        let target = dest.join(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| CopyError::new(&target, e))?;
            stats.dirs += 1;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
            stats.files += 1;
        } else {
            copy_file(entry.path(), &target)?;
            stats.files += 1;
        }
        tracing::debug!(path = %rel.display(), "copied");
    }

    Ok(stats)
}

/// Copy one file, creating parent directories as needed
pub fn copy_file(src: &Path, dest: &Path) -> Result<(), CopyError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| CopyError::new(parent, e))?;
    }
    // never write through a link or into a directory left at the target
    if let Ok(existing) = dest.symlink_metadata() {
        if existing.is_dir() || existing.file_type().is_symlink() {
            remove_path(dest).map_err(|e| CopyError::new(dest, e))?;
        }
    }
    fs::copy(src, dest).map_err(|e| CopyError::new(dest, e))?;
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dest: &Path) -> Result<(), CopyError> {
    let link = fs::read_link(src).map_err(|e| CopyError::new(src, e))?;
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| CopyError::new(parent, e))?;
    }
    if dest.symlink_metadata().is_ok() {
        remove_path(dest).map_err(|e| CopyError::new(dest, e))?;
    }
    std::os::unix::fs::symlink(&link, dest).map_err(|e| CopyError::new(dest, e))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dest: &Path) -> Result<(), CopyError> {
    copy_file(src, dest)
}

/// Remove a file, symlink or directory tree. Returns false when nothing was there.
pub fn remove_path(path: &Path) -> io::Result<bool> {
    let metadata = match path.symlink_metadata() {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(true)
}
