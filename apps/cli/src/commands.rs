//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use docsync_core::{
    FileOutcome, NavUpdate, ProgressReporter, SkipReason, SyncOutcome, SyncSummary, sync_docs,
};
use docsync_shared::{CONFIG_FILE_NAME, SyncConfig, load_config, load_config_from};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docsync — mirror a remote docs folder into this site.
#[derive(Parser)]
#[command(
    name = "docsync",
    version,
    about = "Fetch Markdown docs from a remote repository and add them to the site navigation.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Path to the sync config (defaults to ./docsync.toml if present).
    #[arg(long, global = true, env = "DOCSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Defaults to `sync` when omitted.
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
    /// Wipe the local docs folder, re-download everything, and rebuild navigation.
    Sync,

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
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

const CRATE_TARGETS: &[&str] = &[
    "docsync",
    "docsync_core",
    "docsync_remote",
    "docsync_store",
    "docsync_nav",
    "docsync_shared",
];

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = CRATE_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,{filter}")));

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
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Sync) {
        Command::Sync => cmd_sync(&config).await,
        Command::Config { action } => match action {
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<SyncConfig> {
    let config = match path {
        Some(p) => {
            if !p.exists() {
                return Err(eyre!("config file '{}' does not exist", p.display()));
            }
            load_config_from(p)?
        }
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_sync(config: &SyncConfig) -> Result<()> {
    info!(
        repo = %config.repo,
        branch = %config.branch,
        section = %config.section,
        "starting sync"
    );

    let reporter = CliProgress::new();
    let summary = sync_docs(config, &reporter).await?;

    print_summary(config, &summary);
    Ok(())
}

fn print_summary(config: &SyncConfig, summary: &SyncSummary) {
    println!();
    match &summary.outcome {
        SyncOutcome::Completed => {
            println!("  Documentation sync completed!");
        }
        SyncOutcome::NothingToSync => {
            println!(
                "  No documentation files found in {}/{}",
                config.repo, config.remote_path
            );
        }
        SyncOutcome::ListingFailed { reason } => {
            println!("  Could not list remote docs: {reason}");
        }
    }

    let skipped = summary.files.len() - summary.saved();
    println!("  Saved:   {}", summary.saved());
    println!("  Skipped: {skipped}");
    match summary.nav {
        NavUpdate::Replaced { entries } => println!(
            "  Nav:     '{}' section rewritten in {} ({entries} entries)",
            config.section,
            config.nav_config.display()
        ),
        NavUpdate::Unchanged => println!("  Nav:     unchanged"),
    }
    for file in &summary.files {
        if let FileOutcome::Skipped { reason } = &file.outcome {
            println!("    - {}: {reason}", file.name);
        }
    }
    println!("  Time:    {:.1}s", summary.elapsed.as_secs_f64());
    println!();
}

fn cmd_config_show(config: &SyncConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");

    let token_state = if config.resolve_token().is_some() {
        "set"
    } else {
        "not set (anonymous access)"
    };
    println!("# {}: {token_state}", config.token_env);

    if !Path::new(CONFIG_FILE_NAME).exists() {
        println!("# no {CONFIG_FILE_NAME} in the working directory; defaults shown");
    }
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
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_saved(&self, name: &str, current: usize, total: usize) {
        self.spinner.println(format!("  Saved [{current}/{total}]: {name}"));
    }

    fn file_skipped(&self, name: &str, reason: &SkipReason) {
        self.spinner.println(format!("  Skipped: {name} ({reason})"));
    }

    fn done(&self, _summary: &SyncSummary) {
        self.spinner.finish_and_clear();
    }
}
