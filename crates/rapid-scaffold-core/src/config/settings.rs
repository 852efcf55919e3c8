//! Run settings resolved from CLI flags, environment and product defaults
//!
//! Precedence: explicit flag, then environment variable, then the product's
//! default.

use crate::error::ScaffoldResult;
use crate::product::ProductConfig;
use crate::runtime::bootstrap::PackageManager;
use crate::scaffold::ExistingDestPolicy;
use crate::templates::fetcher::TemplateSource;
use std::path::PathBuf;

/// Values supplied on the command line; `None` means "not given"
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub template: Option<String>,
    pub template_dir: Option<PathBuf>,
    pub package_manager: Option<PackageManager>,
    pub existing: Option<ExistingDestPolicy>,
    pub no_install: bool,
    pub dev: bool,
}

#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub template: TemplateSource,
    pub package_manager: PackageManager,
    pub existing: ExistingDestPolicy,
    pub install: bool,
    pub dev: bool,
}

impl GeneratorSettings {
    pub fn resolve<C: ProductConfig>(
        config: &C,
        overrides: &SettingsOverrides,
    ) -> ScaffoldResult<Self> {
        Self::resolve_with_env(config, overrides, |key| std::env::var(key).ok())
    }

    pub fn resolve_with_env<C, F>(
        config: &C,
        overrides: &SettingsOverrides,
        env: F,
    ) -> ScaffoldResult<Self>
    where
        C: ProductConfig,
        F: Fn(&str) -> Option<String>,
    {
        let env_value = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let template = if let Some(dir) = &overrides.template_dir {
            TemplateSource::local(dir.clone())
        } else if let Some(reference) = &overrides.template {
            TemplateSource::parse(reference)
        } else if let Some(reference) = env_value(config.template_ref_env()) {
            TemplateSource::parse(&reference)
        } else {
            TemplateSource::parse(config.default_template_ref())
        };

        let package_manager = match overrides.package_manager {
            Some(pm) => pm,
            None => match env_value(config.package_manager_env()) {
                Some(value) => value.parse()?,
                None => config.default_package_manager(),
            },
        };

        // the dev server needs installed dependencies
        let install = !overrides.no_install;
        let dev = overrides.dev && install;

        Ok(Self {
            template,
            package_manager,
            existing: overrides.existing.unwrap_or_default(),
            install,
            dev,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[derive(Clone)]
    struct TestConfig;

    impl ProductConfig for TestConfig {
        fn name(&self) -> &'static str {
            "test"
        }
        fn display_name(&self) -> &'static str {
            "Test"
        }
        fn default_template_ref(&self) -> &'static str {
            "https://example.com/template.git"
        }
        fn template_ref_env(&self) -> &'static str {
            "TEST_TEMPLATE"
        }
        fn package_manager_env(&self) -> &'static str {
            "TEST_PM"
        }
        fn default_project_name(&self) -> &'static str {
            "test-app"
        }
        fn docs_url(&self) -> &'static str {
            "https://example.com/docs"
        }
        fn next_steps(&self, _: &Path, _: PackageManager, _: bool) -> Vec<String> {
            Vec::new()
        }
        fn upgrade_command(&self) -> &'static str {
            "upgrade"
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let settings =
            GeneratorSettings::resolve_with_env(&TestConfig, &SettingsOverrides::default(), no_env)
                .unwrap();
        assert_eq!(
            settings.template,
            TemplateSource::Git("https://example.com/template.git".into())
        );
        assert_eq!(settings.package_manager, PackageManager::Pnpm);
        assert_eq!(settings.existing, ExistingDestPolicy::PreserveCache);
        assert!(settings.install);
        assert!(!settings.dev);
    }

    #[test]
    fn test_env_overrides_defaults() {
        let env = |key: &str| match key {
            "TEST_TEMPLATE" => Some("https://example.com/other.zip".to_string()),
            "TEST_PM" => Some("yarn".to_string()),
            _ => None,
        };
        let settings =
            GeneratorSettings::resolve_with_env(&TestConfig, &SettingsOverrides::default(), env)
                .unwrap();
        assert!(matches!(settings.template, TemplateSource::Archive(_)));
        assert_eq!(settings.package_manager, PackageManager::Yarn);
    }

    #[test]
    fn test_flags_override_env() {
        let env = |_: &str| Some("yarn".to_string());
        let overrides = SettingsOverrides {
            template_dir: Some(PathBuf::from("/opt/templates/fe")),
            package_manager: Some(PackageManager::Npm),
            ..SettingsOverrides::default()
        };
        let settings = GeneratorSettings::resolve_with_env(&TestConfig, &overrides, env).unwrap();
        assert_eq!(
            settings.template,
            TemplateSource::Local(PathBuf::from("/opt/templates/fe"))
        );
        assert_eq!(settings.package_manager, PackageManager::Npm);
    }

    #[test]
    fn test_bad_env_package_manager_rejected() {
        let env = |key: &str| (key == "TEST_PM").then(|| "pip".to_string());
        let result =
            GeneratorSettings::resolve_with_env(&TestConfig, &SettingsOverrides::default(), env);
        assert!(result.is_err());
    }

    #[test]
    fn test_dev_requires_install() {
        let overrides = SettingsOverrides {
            no_install: true,
            dev: true,
            ..SettingsOverrides::default()
        };
        let settings =
            GeneratorSettings::resolve_with_env(&TestConfig, &overrides, no_env).unwrap();
        assert!(!settings.install);
        assert!(!settings.dev);
    }
}
