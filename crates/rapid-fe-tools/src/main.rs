//! rapid-fe CLI - Project scaffolding for Rapid Framework frontends

mod logging;

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use rapid_scaffold_core::tui::{self, CreateArgs};
use rapid_scaffold_core::{ExistingDestPolicy, PackageManager, ProductConfig, ScaffoldError};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rapid Framework frontend product configuration
#[derive(Clone)]
pub struct RapidFeConfig;

impl ProductConfig for RapidFeConfig {
    fn name(&self) -> &'static str {
        "rapid-fe"
    }

    fn display_name(&self) -> &'static str {
        "Rapid Framework FE"
    }

    fn default_template_ref(&self) -> &'static str {
        "https://github.com/mnisrei/test.git"
    }

    fn template_ref_env(&self) -> &'static str {
        "RAPID_FE_TEMPLATE"
    }

    fn package_manager_env(&self) -> &'static str {
        "RAPID_FE_PACKAGE_MANAGER"
    }

    fn default_project_name(&self) -> &'static str {
        "rapid-framework-fe"
    }

    fn docs_url(&self) -> &'static str {
        "https://github.com/mnisrei/test#readme"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install rapid-fe-tools --force"
    }

    fn next_steps(&self, dir: &Path, package_manager: PackageManager, installed: bool) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        // Step 1: cd to directory if not current
        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        // Step 2: install if it was skipped
        if !installed {
            steps.push(package_manager.command_line(package_manager.install_args()));
        }

        // Step 3: start the dev server
        steps.push(package_manager.command_line(package_manager.dev_args()));

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "rapid-fe-tools")]
#[command(about = "CLI for scaffolding Rapid Framework frontend projects")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub create: CliCreateArgs,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project (default when no subcommand is given)
    Create(CliCreateArgs),
    /// List the design systems the template provides
    Variants(TemplateArgs),
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct TemplateArgs {
    /// Local directory to use as the template instead of fetching it (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Template reference: git URL, zip archive URL or directory
    #[arg(long)]
    pub template: Option<String>,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct CliCreateArgs {
    #[command(flatten)]
    pub template: TemplateArgs,

    /// Project folder name or path
    #[arg(short, long)]
    pub name: Option<String>,

    /// Design system to use (material-ui, antd, tailwind)
    #[arg(short = 's', long)]
    pub variant: Option<String>,

    /// What to do when the project folder already has content
    #[arg(long = "on-existing", value_enum)]
    pub on_existing: Option<ExistingDestPolicy>,

    /// Package manager used to install dependencies
    #[arg(long = "package-manager", value_enum)]
    pub package_manager: Option<PackageManager>,

    /// Skip dependency installation
    #[arg(long = "no-install")]
    pub no_install: bool,

    /// Start the dev server after installing dependencies
    #[arg(long)]
    pub dev: bool,

    /// Show what would be relocated without writing anything
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            template_dir: args.template.template_dir,
            template: args.template.template,
            name: args.name,
            variant: args.variant,
            existing: args.on_existing,
            package_manager: args.package_manager,
            no_install: args.no_install,
            dev: args.dev,
            dry_run: args.dry_run,
            yes: args.yes,
        }
    }
}

impl From<TemplateArgs> for CreateArgs {
    fn from(args: TemplateArgs) -> Self {
        CreateArgs {
            template_dir: args.template_dir,
            template: args.template,
            ..CreateArgs::default()
        }
    }
}

async fn dispatch(args: Args, config: &RapidFeConfig) -> Result<()> {
    match args.command {
        Some(Command::Create(create_args)) => {
            tui::run(config, create_args.into(), CLI_VERSION).await
        }
        Some(Command::Variants(template_args)) => {
            tui::list_variants(config, template_args.into(), CLI_VERSION).await
        }
        // No subcommand provided, default to create behavior
        None => tui::run(config, args.create.into(), CLI_VERSION).await,
    }
}

fn exit_code_for(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<ScaffoldError>() {
        Some(e) => e.exit_code().clamp(1, 255) as u8,
        None => 1,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    if let Err(e) = logging::init_logging(args.verbose, args.quiet) {
        eprintln!("{e}");
    }
    tracing::debug!(version = CLI_VERSION, command = ?args.command, "starting");

    let config = RapidFeConfig;
    let result = dispatch(args, &config).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = cliclack::outro_cancel(format!("{e:#}"));
            ExitCode::from(exit_code_for(&e))
        }
    }
}
