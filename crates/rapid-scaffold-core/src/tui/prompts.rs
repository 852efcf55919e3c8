//! Charm-style CLI prompts using cliclack

use crate::config::{GeneratorSettings, SettingsOverrides};
use crate::product::ProductConfig;
use crate::resolver;
use crate::runtime::bootstrap::{BootstrapRunner, PackageManager};
use crate::runtime::check;
use crate::scaffold::{ExistingDestPolicy, ScaffoldReport, Scaffolder};
use crate::templates::fetcher::{StagedTemplate, TemplateFetcher, TemplateSource};
use crate::templates::load_rule_set;
use crate::variant::Variant;
use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Local directory to use as the template instead of fetching it
    pub template_dir: Option<PathBuf>,

    /// Template reference (git URL, zip URL or directory)
    pub template: Option<String>,

    /// Project folder name or path
    pub name: Option<String>,

    /// Design system to scaffold
    pub variant: Option<String>,

    /// What to do with an existing destination
    pub existing: Option<ExistingDestPolicy>,

    pub package_manager: Option<PackageManager>,

    /// Skip dependency installation
    pub no_install: bool,

    /// Start the dev server after installing
    pub dev: bool,

    /// Show what would be relocated without writing anything
    pub dry_run: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

impl CreateArgs {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            template: self.template.clone(),
            template_dir: self.template_dir.clone(),
            package_manager: self.package_manager,
            existing: self.existing,
            no_install: self.no_install || self.dry_run,
            dev: self.dev,
        }
    }
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(config.display_name())?;

    let mut settings = GeneratorSettings::resolve(config, &args.overrides())?;

    // Step 1: Check tools
    check_tools(&mut settings, &args)?;

    // Step 2: Project directory
    let project_dir = select_directory(config, &args, settings.existing)?;

    // Step 3: Fetch template
    let staged = fetch_template(config, &settings.template).await?;

    // Step 4: Rule table (built-in or from the template's manifest)
    let (rules, warning) = load_rule_set(staged.path(), cli_version, config.upgrade_command())?;
    if let Some(warning) = warning {
        cliclack::log::warning(format!(
            "Version warning: {}",
            warning.lines().next().unwrap_or(&warning)
        ))?;
    }
    let scaffolder = Scaffolder::new(rules)?;

    // Step 5: Select variant
    let variant = select_variant(&scaffolder, &args)?;

    if args.dry_run {
        return print_plan(&scaffolder, &staged, &variant, &project_dir, settings.existing);
    }

    // Step 6: Scaffold
    let report = create_project(&scaffolder, &staged, &variant, &project_dir, settings.existing)?;
    drop(staged);

    // Step 7: Bootstrap
    let runner = BootstrapRunner::new(settings.package_manager);
    if settings.install {
        cliclack::log::step(format!("Installing dependencies with {}", settings.package_manager))?;
        runner.install(&project_dir).await?;
        cliclack::log::success("Dependencies installed")?;
    }

    print_summary(&report)?;

    if settings.dev {
        cliclack::outro(format!("Starting the dev server in {}", project_dir.display()))?;
        runner.run_dev(&project_dir).await?;
        return Ok(());
    }

    // Step 8: Show next steps
    print_next_steps(config, &project_dir, settings.package_manager, settings.install)?;

    Ok(())
}

/// Print the variant catalog of the configured template
pub async fn list_variants<C: ProductConfig>(
    config: &C,
    args: CreateArgs,
    cli_version: &str,
) -> Result<()> {
    cliclack::intro(config.display_name())?;

    let settings = GeneratorSettings::resolve(config, &args.overrides())?;
    let staged = fetch_template(config, &settings.template).await?;
    let (rules, _) = load_rule_set(staged.path(), cli_version, config.upgrade_command())?;

    for variant in rules.catalog.variants() {
        let aliases = if variant.aliases.is_empty() {
            String::new()
        } else {
            format!(" (aliases: {})", variant.aliases.join(", "))
        };
        cliclack::log::info(format!(
            "{} - {}{}",
            variant.name.bold(),
            variant.display_name(),
            aliases.dimmed()
        ))?;
    }

    cliclack::outro(format!("{} design systems available", rules.catalog.variants().len()))?;
    Ok(())
}

fn check_tools(settings: &mut GeneratorSettings, args: &CreateArgs) -> Result<()> {
    let needs_git = matches!(settings.template, TemplateSource::Git(_));
    let package_manager = settings.install.then_some(settings.package_manager);

    let spinner = cliclack::spinner();
    spinner.start("Checking tools...");

    let error = match check::check_prerequisites(needs_git, package_manager) {
        Ok(tools) => {
            if tools.is_empty() {
                spinner.stop("No external tools needed");
            } else {
                let info: Vec<String> = tools
                    .iter()
                    .map(|t| format!("{} ({})", t.name, t.version.as_deref().unwrap_or("unknown")))
                    .collect();
                spinner.stop(format!("Detected tools: {}", info.join(", ")));
            }
            return Ok(());
        }
        Err(e) => e,
    };

    spinner.stop("Missing tools");
    cliclack::log::error(format!("{}", error))?;

    // Without git there is nothing to scaffold from
    if needs_git && !check::check_git().available {
        anyhow::bail!("Please install git and try again, or pass --template-dir.");
    }

    let runner = BootstrapRunner::new(settings.package_manager);
    if args.yes {
        cliclack::log::info("Continuing without installing dependencies (--yes mode)")?;
        settings.install = false;
        settings.dev = false;
        return Ok(());
    }

    let action: &str = cliclack::select("What would you like to do?")
        .item("skip", "Scaffold now and install dependencies later", "")
        .item(
            "docs",
            format!("Open {} installation docs", settings.package_manager),
            settings.package_manager.docs_url(),
        )
        .item("abort", "Cancel", "")
        .interact()?;

    match action {
        "skip" => {
            settings.install = false;
            settings.dev = false;
            Ok(())
        }
        "docs" => {
            runner.open_docs()?;
            cliclack::outro(format!(
                "After installing {}, run this command again.",
                settings.package_manager
            ))?;
            std::process::exit(0);
        }
        _ => anyhow::bail!("Setup cancelled."),
    }
}

fn select_directory<C: ProductConfig>(
    config: &C,
    args: &CreateArgs,
    existing: ExistingDestPolicy,
) -> Result<PathBuf> {
    let current_dir = std::env::current_dir()?;

    let name = match &args.name {
        Some(name) => name.clone(),
        None if args.yes => config.default_project_name().to_string(),
        None => cliclack::input("What is the name of your project folder?")
            .placeholder(config.default_project_name())
            .default_input(config.default_project_name())
            .validate(|input: &String| {
                if input.trim().is_empty() {
                    Err("Please enter a folder name")
                } else {
                    Ok(())
                }
            })
            .interact()?,
    };

    let path = resolver::resolve(&name, &current_dir)?;
    cliclack::log::info(format!("Using directory: {}", path.display()))?;

    // Warn if directory exists and has files
    if existing != ExistingDestPolicy::Refuse && path.is_dir() {
        if let Ok(entries) = std::fs::read_dir(&path) {
            let count = entries.count();
            if count > 0 {
                let kept = match existing {
                    ExistingDestPolicy::PreserveCache => " (node_modules will be kept)",
                    _ => "",
                };
                cliclack::log::warning(format!(
                    "Directory has {} existing items that will be replaced{}",
                    count, kept
                ))?;

                let confirm = if args.yes {
                    true
                } else {
                    cliclack::confirm("Continue anyway?")
                        .initial_value(true)
                        .interact()?
                };

                if !confirm {
                    anyhow::bail!("Setup cancelled.");
                }
            }
        }
    }

    Ok(path)
}

async fn fetch_template<C: ProductConfig>(
    config: &C,
    source: &TemplateSource,
) -> Result<StagedTemplate> {
    let fetcher = TemplateFetcher::new(source.clone(), config.user_agent());

    let spinner = cliclack::spinner();
    spinner.start(format!("Fetching template from {}...", source.reference()));

    match fetcher.stage().await {
        Ok(staged) => {
            spinner.stop("Template fetched");
            Ok(staged)
        }
        Err(e) => {
            spinner.stop("Failed to fetch template");
            Err(e.into())
        }
    }
}

fn select_variant(scaffolder: &Scaffolder, args: &CreateArgs) -> Result<Variant> {
    let catalog = &scaffolder.rules().catalog;

    if let Some(name) = &args.variant {
        let variant = scaffolder.variant(name)?.clone();
        cliclack::log::info(format!("Design system: {}", variant.display_name()))?;
        return Ok(variant);
    }

    let variants = catalog.variants();
    if args.yes || variants.len() == 1 {
        let variant = variants[0].clone();
        cliclack::log::info(format!("Using design system: {}", variant.display_name()))?;
        return Ok(variant);
    }

    let mut select = cliclack::select("Which design system would you like to use?");
    for (idx, variant) in variants.iter().enumerate() {
        select = select.item(idx, variant.display_name(), &variant.name);
    }
    let selected_idx: usize = select.interact()?;

    Ok(variants[selected_idx].clone())
}

fn print_plan(
    scaffolder: &Scaffolder,
    staged: &StagedTemplate,
    variant: &Variant,
    project_dir: &Path,
    existing: ExistingDestPolicy,
) -> Result<()> {
    let plan = scaffolder.plan(staged.path(), variant, project_dir, existing)?;

    cliclack::log::info(format!(
        "Dry run for {} into {}",
        variant.display_name(),
        project_dir.display()
    ))?;
    for relocation in &plan.relocations {
        cliclack::log::step(format!("{} ({} files)", relocation.rule, relocation.files))?;
    }
    for missing in &plan.soft_missing {
        cliclack::log::warning(format!("Would skip {}", missing))?;
    }

    cliclack::outro("Nothing was written.")?;
    Ok(())
}

fn create_project(
    scaffolder: &Scaffolder,
    staged: &StagedTemplate,
    variant: &Variant,
    project_dir: &Path,
    existing: ExistingDestPolicy,
) -> Result<ScaffoldReport> {
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    match scaffolder.scaffold(staged.path(), variant, project_dir, existing) {
        Ok(report) => {
            spinner.stop(format!(
                "Created {} files in {}",
                report.total_files(),
                project_dir.display()
            ));
            if report.cache_preserved {
                cliclack::log::info("Kept existing node_modules")?;
            }
            Ok(report)
        }
        Err(e) => {
            spinner.stop("Failed to create project");
            Err(e.into())
        }
    }
}

fn print_summary(report: &ScaffoldReport) -> Result<()> {
    if !report.has_warnings() {
        return Ok(());
    }

    let lines = report.warning_lines();
    cliclack::log::warning(format!(
        "Skipped {} optional piece(s) the {} template does not ship:\n{}",
        lines.len(),
        report.variant,
        lines
            .iter()
            .map(|l| format!("  - {}", l))
            .collect::<Vec<_>>()
            .join("\n")
    ))?;
    Ok(())
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    project_dir: &Path,
    package_manager: PackageManager,
    installed: bool,
) -> Result<()> {
    let steps = config.next_steps(project_dir, package_manager, installed);

    println!();
    println!("  {}", "Next steps".bold());
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step.cyan());
    }
    println!();
    println!("  Docs: {}", config.docs_url().dimmed());

    cliclack::outro("Happy coding!")?;

    Ok(())
}
