//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use apiref_core::{BuildProgress, BuildReport, CheckOutcome};
use apiref_shared::{AppConfig, CONFIG_FILE_NAME, init_config, load_config, load_config_from};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// apiref: build the API reference module for the docs site.
#[derive(Parser)]
#[command(
    name = "apiref",
    version,
    about = "Generate the API reference module from endpoint and object JSON.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ./apiref.toml.
    #[arg(long, env = "APIREF_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand; `build` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate the module and write it next to the endpoint files.
    Build {
        /// Override `paths.data_dir`.
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Fail if the module on disk is missing or out of date.
    Check {
        /// Override `paths.data_dir`.
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "apiref=info",
        1 => "apiref=debug",
        _ => "apiref=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so the summary on stdout stays clean.
    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    let default = Command::Build { data_dir: None };
    match cli.command.unwrap_or(default) {
        Command::Build { data_dir } => cmd_build(config_path, data_dir),
        Command::Check { data_dir } => cmd_check(config_path, data_dir),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Load the config from `--config` or the working directory, then apply overrides.
fn resolve_config(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<AppConfig> {
    let mut config = match config_path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    if let Some(data_dir) = data_dir {
        config.paths.data_dir = data_dir;
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_build(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(config_path, data_dir)?;
    info!(
        endpoints = %config.endpoints_path().display(),
        objects = %config.objects_path().display(),
        "building API reference"
    );

    let reporter = CliProgress::new();
    let report = apiref_core::build(&config, &reporter)?;

    // Print summary
    println!();
    println!("  API reference generated!");
    println!("  Output:  {}", report.output_path.display());
    println!("  Files:   {}", report.files_read);
    for (category, count) in &report.routed {
        println!("    {category:<14} {count}");
    }
    println!(
        "  Status:  {}",
        if report.changed { "updated" } else { "unchanged" }
    );
    println!("  SHA-256: {}", report.sha256);
    println!("  Time:    {:.1}s", report.elapsed.as_secs_f64());

    if !report.dropped.is_empty() {
        println!();
        println!(
            "  Skipped {} endpoint(s) with no section:",
            report.dropped.len()
        );
        for diagnostic in &report.dropped {
            println!("    {diagnostic}");
        }
    }
    println!();

    Ok(())
}

fn cmd_check(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(config_path, data_dir)?;
    let output = config.output_path();

    let reporter = CliProgress::new();
    let outcome = apiref_core::check(&config, &reporter);
    reporter.spinner.finish_and_clear();

    match outcome? {
        CheckOutcome::UpToDate { sha256 } => {
            println!("{} is up to date ({sha256})", output.display());
            Ok(())
        }
        CheckOutcome::Stale { expected, actual } => Err(eyre!(
            "{} is out of date (on disk {actual}, expected {expected}); run `apiref build`",
            output.display()
        )),
        CheckOutcome::Missing => Err(eyre!(
            "{} does not exist; run `apiref build`",
            output.display()
        )),
    }
}

fn cmd_config_init(config_path: Option<&Path>) -> Result<()> {
    let path = config_path.unwrap_or(Path::new(CONFIG_FILE_NAME));
    init_config(path)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path, None)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl BuildProgress for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn endpoint_loaded(&self, file: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Formatting [{current}/{total}] {file}"));
    }

    fn done(&self, _report: &BuildReport) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
