//! Template retrieval into a local staging directory
//!
//! Three sources produce the same thing, a history-less template tree:
//! - Git: shallow single-revision clone via the `git` binary
//! - Archive: zip snapshot downloaded over HTTP
//! - Local: a directory on disk (development use)
//!
//! Version-control metadata is stripped right after every fetch, before the
//! scaffold engine inspects the tree.

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::templates::copier::{self, CopyFilter, VCS_DIR};
use std::io::{self, Cursor};
use std::path::{Component, Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;
use tokio::process::Command;
use url::Url;
use zip::ZipArchive;

/// Template source - a git reference, a zip snapshot URL or a local directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Git(String),
    Archive(Url),
    Local(PathBuf),
}

impl TemplateSource {
    /// Classify a reference string: `http(s)://...zip` is an archive, an
    /// existing directory is local, anything else is handed to git.
    pub fn parse(reference: &str) -> Self {
        let reference = reference.trim();
        if let Ok(url) = Url::parse(reference) {
            let is_http = matches!(url.scheme(), "http" | "https");
            if is_http && url.path().ends_with(".zip") {
                return Self::Archive(url);
            }
        }
        let path = Path::new(reference);
        if path.is_dir() {
            return Self::Local(path.to_path_buf());
        }
        Self::Git(reference.to_string())
    }

    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }

    /// Display form used in errors and logs
    pub fn reference(&self) -> String {
        match self {
            Self::Git(r) => r.clone(),
            Self::Archive(url) => url.to_string(),
            Self::Local(path) => path.display().to_string(),
        }
    }
}

/// A fetched template tree living in a temporary directory.
/// The directory is deleted when this value is dropped.
#[derive(Debug)]
pub struct StagedTemplate {
    root: PathBuf,
    _dir: TempDir,
}

impl StagedTemplate {
    pub fn path(&self) -> &Path {
        &self.root
    }
}

/// Template fetcher - retrieves templates from git, archive or local sources
pub struct TemplateFetcher {
    source: TemplateSource,
    client: reqwest::Client,
}

impl TemplateFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(source: TemplateSource, user_agent: &str) -> Self {
        Self {
            source,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Fetch into a fresh temporary directory
    pub async fn stage(&self) -> ScaffoldResult<StagedTemplate> {
        let dir = tempfile::Builder::new()
            .prefix("rapid-fe-template-")
            .tempdir()
            .map_err(|e| {
                ScaffoldError::fetch_with_source(
                    self.source.reference(),
                    "failed to create staging directory",
                    e,
                )
            })?;
        let root = dir.path().join("template");
        self.fetch(&root).await?;
        Ok(StagedTemplate { root, _dir: dir })
    }

    /// Populate `dest` (which must not exist yet) with a snapshot of the template
    pub async fn fetch(&self, dest: &Path) -> ScaffoldResult<()> {
        let reference = self.source.reference();
        if dest.exists() {
            return Err(ScaffoldError::fetch(
                reference,
                format!("staging path {} already exists", dest.display()),
            ));
        }

        tracing::info!(source = %reference, dest = %dest.display(), "fetching template");
        match &self.source {
            TemplateSource::Git(git_ref) => clone_shallow(git_ref, dest).await?,
            TemplateSource::Archive(url) => {
                let bytes = self.download(url).await?;
                extract_archive(&bytes, dest, &reference)?;
            }
            TemplateSource::Local(path) => {
                if !path.is_dir() {
                    return Err(ScaffoldError::fetch(
                        reference,
                        "local template directory not found",
                    ));
                }
                copier::copy_tree(path, dest, &CopyFilter::new()).map_err(|e| {
                    ScaffoldError::fetch_with_source(&reference, "failed to copy local template", e)
                })?;
            }
        }

        strip_vcs_metadata(dest).map_err(|e| {
            ScaffoldError::fetch_with_source(&reference, "failed to strip version-control metadata", e)
        })?;
        Ok(())
    }

    async fn download(&self, url: &Url) -> ScaffoldResult<Vec<u8>> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ScaffoldError::fetch_with_source(url.as_str(), "request failed", e))?;

        if !response.status().is_success() {
            return Err(ScaffoldError::fetch(
                url.as_str(),
                format!("HTTP {}", response.status()),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ScaffoldError::fetch_with_source(url.as_str(), "failed to read body", e))?;
        Ok(bytes.to_vec())
    }
}

/// `git clone --depth 1 --single-branch`
async fn clone_shallow(reference: &str, dest: &Path) -> ScaffoldResult<()> {
    let output = Command::new("git")
        .arg("clone")
        .arg("--depth")
        .arg("1")
        .arg("--single-branch")
        .arg("--quiet")
        .arg("--")
        .arg(reference)
        .arg(dest)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| {
            let message = if e.kind() == io::ErrorKind::NotFound {
                "git is not installed or not on PATH"
            } else {
                "failed to run git"
            };
            ScaffoldError::fetch_with_source(reference, message, e)
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ScaffoldError::fetch(
            reference,
            format!("git clone failed: {}", stderr.trim()),
        ));
    }
    Ok(())
}

/// Unpack a zip snapshot, dropping the single top-level folder GitHub-style
/// archives wrap everything in. Entries that would land outside `dest` are
/// rejected.
pub fn extract_archive(bytes: &[u8], dest: &Path, reference: &str) -> ScaffoldResult<()> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ScaffoldError::fetch_with_source(reference, "invalid zip archive", e))?;

    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let file = archive
            .by_index(i)
            .map_err(|e| ScaffoldError::fetch_with_source(reference, "corrupt zip entry", e))?;
        let name = file.enclosed_name().ok_or_else(|| {
            ScaffoldError::fetch(
                reference,
                format!("archive entry '{}' escapes the extraction root", file.name()),
            )
        })?;
        names.push(name);
    }
    let prefix = common_root(&names);

    std::fs::create_dir_all(dest)
        .map_err(|e| ScaffoldError::fetch_with_source(reference, "failed to create staging", e))?;

    for (i, name) in names.iter().enumerate() {
        let rel = match &prefix {
            Some(prefix) => name.strip_prefix(prefix).unwrap_or(name),
            None => name.as_path(),
        };
        if rel.as_os_str().is_empty() {
            continue;
        }
        let target = dest.join(rel);

        let mut file = archive
            .by_index(i)
            .map_err(|e| ScaffoldError::fetch_with_source(reference, "corrupt zip entry", e))?;
        let write_err = |e: io::Error| {
            ScaffoldError::fetch_with_source(
                reference,
                format!("failed to extract {}", target.display()),
                e,
            )
        };

        if file.is_dir() {
            std::fs::create_dir_all(&target).map_err(write_err)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let mut out = std::fs::File::create(&target).map_err(write_err)?;
        io::copy(&mut file, &mut out).map_err(write_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = file.unix_mode() {
                std::fs::set_permissions(&target, std::fs::Permissions::from_mode(mode & 0o777))
                    .map_err(write_err)?;
            }
        }
    }

    Ok(())
}

/// The first path component, when every entry lives under it and at least one
/// entry is nested deeper
fn common_root(names: &[PathBuf]) -> Option<PathBuf> {
    let first = names.first()?.components().next()?;
    let Component::Normal(first) = first else {
        return None;
    };
    let all_under = names
        .iter()
        .all(|n| matches!(n.components().next(), Some(Component::Normal(c)) if c == first));
    let any_nested = names.iter().any(|n| n.components().count() > 1);
    (all_under && any_nested).then(|| PathBuf::from(first))
}

fn strip_vcs_metadata(root: &Path) -> io::Result<()> {
    if copier::remove_path(&root.join(VCS_DIR))? {
        tracing::debug!(root = %root.display(), "removed version-control metadata");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            let options = SimpleFileOptions::default();
            for (name, content) in entries {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buffer
    }

    #[test]
    fn test_parse_archive_url() {
        let source = TemplateSource::parse("https://github.com/org/repo/archive/refs/heads/main.zip");
        assert!(matches!(source, TemplateSource::Archive(_)));
    }

    #[test]
    fn test_parse_git_reference() {
        let source = TemplateSource::parse("https://github.com/mnisrei/test.git");
        assert_eq!(
            source,
            TemplateSource::Git("https://github.com/mnisrei/test.git".to_string())
        );
        assert!(matches!(
            TemplateSource::parse("git@github.com:org/repo.git"),
            TemplateSource::Git(_)
        ));
    }

    #[test]
    fn test_parse_local_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = TemplateSource::parse(dir.path().to_str().unwrap());
        assert_eq!(source, TemplateSource::Local(dir.path().to_path_buf()));
    }

    #[test]
    fn test_extract_strips_wrapper_folder() {
        let bytes = build_zip(&[
            ("test-main/package.json", "{}"),
            ("test-main/src/main.tsx", "main"),
        ]);
        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("template");

        extract_archive(&bytes, &dest, "archive").unwrap();

        assert!(dest.join("package.json").exists());
        assert_eq!(fs::read_to_string(dest.join("src/main.tsx")).unwrap(), "main");
        assert!(!dest.join("test-main").exists());
    }

    #[test]
    fn test_extract_flat_archive_kept_as_is() {
        let bytes = build_zip(&[("index.html", "<html/>"), ("src/main.tsx", "main")]);
        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("template");

        extract_archive(&bytes, &dest, "archive").unwrap();

        assert!(dest.join("index.html").exists());
        assert!(dest.join("src/main.tsx").exists());
    }

    #[test]
    fn test_extract_rejects_invalid_zip() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = extract_archive(b"not a zip", &dir.path().join("t"), "archive").unwrap_err();
        assert!(matches!(err, ScaffoldError::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_local_fetch_strips_git() {
        let src = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(src.path().join(".git/objects")).unwrap();
        fs::write(src.path().join(".git/HEAD"), "ref").unwrap();
        fs::create_dir_all(src.path().join("src")).unwrap();
        fs::write(src.path().join("src/main.tsx"), "main").unwrap();

        let fetcher = TemplateFetcher::new(TemplateSource::local(src.path().to_path_buf()), "test");
        let staged = fetcher.stage().await.unwrap();

        assert!(staged.path().join("src/main.tsx").exists());
        assert!(!staged.path().join(".git").exists());
        // the source tree is left alone
        assert!(src.path().join(".git/HEAD").exists());
    }

    #[tokio::test]
    async fn test_fetch_refuses_existing_staging_path() {
        let src = tempfile::TempDir::new().unwrap();
        let dest = tempfile::TempDir::new().unwrap();
        let fetcher = TemplateFetcher::new(TemplateSource::local(src.path().to_path_buf()), "test");
        let err = fetcher.fetch(dest.path()).await.unwrap_err();
        assert!(matches!(err, ScaffoldError::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_missing_local_source_is_fetch_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let fetcher = TemplateFetcher::new(TemplateSource::local(dir.path().join("missing")), "test");
        let err = fetcher.stage().await.unwrap_err();
        assert!(matches!(err, ScaffoldError::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_option_like_reference_is_not_a_git_flag() {
        let dir = tempfile::TempDir::new().unwrap();
        let marker = dir.path().join("marker");
        let reference = format!("--upload-pack=touch {}", marker.display());

        let err = clone_shallow(&reference, &dir.path().join("clone")).await.unwrap_err();

        assert!(matches!(err, ScaffoldError::Fetch { .. }));
        assert!(!marker.exists());
    }
}
