mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};

use infoscreen_core::kernel::constants;
use infoscreen_core::kernel::error::Result;
use infoscreen_core::plugin_system::{ModuleRegistry, PluginCatalog};
use infoscreen_core::{AppConfig, Application};

use crate::cli::StdinControl;

/// InfoScreen: a kiosk shell rotating through screen plugins
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Configuration file (JSON, YAML or TOML)
    #[arg(short, long, default_value = constants::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Screen plugin directory; replaces the configured ones when given (repeatable)
    #[arg(short = 'p', long = "plugins-dir")]
    plugins_dirs: Vec<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every plugin of the catalog with its dependency verdict
    List,
    /// Run an activation pass and report failures (exit code 1 on failure)
    Check,
    /// Run the kiosk loop (default)
    Run {
        /// Ignore stdin and run until interrupted
        #[arg(long)]
        no_stdin: bool,
    },
}

/// Every statically linked screen plugin
fn screen_modules() -> ModuleRegistry {
    let mut modules = ModuleRegistry::new();
    screen_clock::register(&mut modules);
    screen_message::register(&mut modules);
    modules
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        eprintln!("Failed to initialize logging: {}", e);
    }
}

fn list(app: &Application) -> Result<ExitCode> {
    let shell = app.shell();
    let descriptors = shell.catalog().plugins(true)?;
    if descriptors.is_empty() {
        println!("No screen plugins found.");
        return Ok(ExitCode::SUCCESS);
    }

    for descriptor in descriptors {
        let state = if descriptor.enabled { "enabled" } else { "disabled" };
        let verdict = shell.validator().validate(&descriptor);
        println!(
            "{:<20} {:<28} {:<9} {}",
            descriptor.name,
            format!("{}:{}", descriptor.module, descriptor.entry_point),
            state,
            verdict
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn check(app: &mut Application) -> Result<ExitCode> {
    let report = app.activate()?;
    for name in &report.activated {
        println!("ok      {}", name);
    }
    for name in &report.skipped {
        println!("skipped {}", name);
    }
    for failure in &report.failures {
        println!("FAILED  {}", failure);
    }
    app.shell_mut().shutdown();

    if report.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

async fn run(app: &mut Application, read_stdin: bool) -> Result<ExitCode> {
    if read_stdin {
        app.add_control_surface(StdinControl);
    }
    println!("Starting {} v{}...", constants::APP_NAME, constants::APP_VERSION);
    let report = app.run().await?;
    println!(
        "{} stopped ({} screen(s) served, {} failed).",
        constants::APP_NAME,
        report.activated.len(),
        report.failures.len()
    );
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    let mut config = match AppConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if !args.plugins_dirs.is_empty() {
        config.plugin_dirs = args.plugins_dirs;
    }
    info!("Plugin directories: {:?}", config.plugin_dirs);

    let mut app = Application::new(config, screen_modules());

    let outcome = match args.command.unwrap_or(Commands::Run { no_stdin: false }) {
        Commands::List => list(&app),
        Commands::Check => check(&mut app),
        Commands::Run { no_stdin } => run(&mut app, !no_stdin).await,
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
