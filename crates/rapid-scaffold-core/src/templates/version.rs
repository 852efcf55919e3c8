//! Generator / template manifest compatibility

use semver::Version;

/// Warn when a template's `scaffold.yaml` declares a newer version than the
/// running generator. Unparseable versions never warn.
pub fn check_compatibility(
    generator_version: &str,
    manifest_version: &str,
    upgrade_command: &str,
) -> Option<String> {
    let running = parse_version(generator_version)?;
    let wanted = parse_version(manifest_version)?;

    (running < wanted).then(|| {
        format!(
            "Template manifest {wanted} expects a newer generator (running {running}).\n\
             Relocation rules it relies on may be missing. Upgrade with: {upgrade_command}"
        )
    })
}

fn parse_version(raw: &str) -> Option<Version> {
    let trimmed = raw.trim();
    Version::parse(trimmed.strip_prefix('v').unwrap_or(trimmed)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPGRADE: &str = "cargo install rapid-fe-tools --force";

    #[test]
    fn test_newer_manifest_warns_with_upgrade_hint() {
        let warning = check_compatibility("0.1.0", "1.2.0", UPGRADE).unwrap();
        assert!(warning.contains("1.2.0"));
        assert!(warning.contains(UPGRADE));
    }

    #[test]
    fn test_same_or_older_manifest_is_quiet() {
        assert!(check_compatibility("1.0.0", "1.0.0", UPGRADE).is_none());
        assert!(check_compatibility("1.4.0", "v1.0.0", UPGRADE).is_none());
    }

    #[test]
    fn test_prerelease_generator_is_older_than_release() {
        assert!(check_compatibility("1.0.0-beta.1", "1.0.0", UPGRADE).is_some());
    }

    #[test]
    fn test_unparseable_versions_skip_check() {
        assert!(check_compatibility("dev", "1.0.0", UPGRADE).is_none());
        assert!(check_compatibility("1.0.0", "latest", UPGRADE).is_none());
    }
}
