//! Project name to destination path resolution

use crate::error::{ScaffoldError, ScaffoldResult};
use std::path::{Component, Path, PathBuf};

/// Turn a user-supplied project name into an absolute, normalized path.
///
/// Relative names are joined onto `cwd`. `.` and `..` are collapsed lexically;
/// existence is not checked here.
pub fn resolve(name_input: &str, cwd: &Path) -> ScaffoldResult<PathBuf> {
    let name = name_input.trim();
    if name.is_empty() {
        return Err(ScaffoldError::invalid_input("project name must not be empty"));
    }
    if name.contains('\0') {
        return Err(ScaffoldError::invalid_input(
            "project name must not contain NUL bytes",
        ));
    }

    let input = Path::new(name);
    let joined = if input.is_absolute() {
        input.to_path_buf()
    } else {
        cwd.join(input)
    };

    let normalized = normalize(&joined);
    if normalized.parent().is_none() {
        return Err(ScaffoldError::invalid_input(format!(
            "project name '{}' resolves to the filesystem root",
            name
        )));
    }

    Ok(normalized)
}

/// Lexical normalization; `..` at the root is dropped
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Last path component, used for display
pub fn project_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_name_joins_cwd() {
        let path = resolve("my-app", Path::new("/home/dev")).unwrap();
        assert_eq!(path, PathBuf::from("/home/dev/my-app"));
    }

    #[test]
    fn test_absolute_name_kept() {
        let path = resolve("/srv/site", Path::new("/home/dev")).unwrap();
        assert_eq!(path, PathBuf::from("/srv/site"));
    }

    #[test]
    fn test_dot_segments_collapsed() {
        let path = resolve("./apps/../web/./ui", Path::new("/home/dev")).unwrap();
        assert_eq!(path, PathBuf::from("/home/dev/web/ui"));
    }

    #[test]
    fn test_parent_of_root_is_root() {
        assert_eq!(normalize(Path::new("/../../tmp")), PathBuf::from("/tmp"));
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            resolve("   ", Path::new("/home/dev")),
            Err(ScaffoldError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_root_rejected() {
        assert!(resolve("../..", Path::new("/home")).is_err());
    }

    #[test]
    fn test_project_name() {
        assert_eq!(project_name(Path::new("/home/dev/my-app")), "my-app");
    }
}
