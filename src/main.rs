//! Folio - behavior layer for a static portfolio page

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use folio::config::Config;
use folio::controllers::theme::stored_theme;
use folio::controllers::validate::validate_all;
use folio::script::{Script, replay};
use folio::store::{FileStore, PreferenceStore, THEME_KEY};
use folio::{ThemeMode, paths};

/// Replay portfolio page sessions headless and manage stored preferences
#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay an interaction script and print the snapshots as JSON
    Replay {
        /// Script file (JSON)
        script: PathBuf,
        /// Configuration file overriding timings, thresholds and selectors
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Check contact form values the way the page does
    Validate {
        /// Sender name
        #[arg(long, default_value = "")]
        name: String,
        /// Sender email
        #[arg(long, default_value = "")]
        email: String,
        /// Message body
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Inspect or change the stored theme preference
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Print the default configuration
    Config,
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the stored preference
    Show,
    /// Store an explicit preference
    Set {
        /// `light` or `dark`
        mode: ThemeMode,
    },
    /// Forget the preference and follow the OS again
    Clear,
}

fn main() -> Result<()> {
    let log_path = paths::log_path();

    // Clear the log file on startup
    if let Err(e) = std::fs::write(&log_path, "") {
        eprintln!("Warning: Failed to clear log file: {e}");
    }

    // Set DEBUG=0-3 to control verbosity (0=off, 1=warn, 2=info, 3=debug)
    let debug_level = std::env::var("DEBUG")
        .ok()
        .and_then(|v| v.parse::<u8>().ok())
        .unwrap_or(0);

    if debug_level > 0 {
        let level = match debug_level {
            1 => tracing::Level::WARN,
            2 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        };

        let dir = log_path.parent().unwrap_or_else(|| Path::new("."));
        let file_appender = tracing_appender::rolling::never(dir, "folio.log");
        tracing_subscriber::fmt()
            .with_writer(file_appender)
            .with_max_level(level)
            .with_ansi(false)
            .init();
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Let --help and --version exit normally
            if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                e.exit();
            }
            eprintln!("error: {}\n", e.kind());
            Cli::command().print_help()?;
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Replay { script, config }) => cmd_replay(&script, config.as_deref()),
        Some(Commands::Validate {
            name,
            email,
            message,
        }) => {
            if !cmd_validate(&name, &email, &message) {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Commands::Theme { action }) => cmd_theme(&action),
        Some(Commands::Config) => {
            let json = serde_json::to_string_pretty(&Config::default())
                .context("Failed to serialize config")?;
            println!("{json}");
            Ok(())
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

fn cmd_replay(script: &Path, config: Option<&Path>) -> Result<()> {
    let config = match config {
        Some(path) => Config::load_from(path)?,
        None => Config::default(),
    };
    let contents = std::fs::read_to_string(script)
        .with_context(|| format!("Failed to read script {}", script.display()))?;
    let parsed: Script = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse script {}", script.display()))?;

    let snapshots = replay(&parsed, config)
        .with_context(|| format!("Failed to replay {}", script.display()))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshots).context("Failed to serialize snapshots")?
    );
    Ok(())
}

/// Print every failing field; returns whether all passed
fn cmd_validate(name: &str, email: &str, message: &str) -> bool {
    let failures = validate_all(name, email, message);
    if failures.is_empty() {
        println!("OK");
        return true;
    }
    for (field, error) in failures {
        eprintln!("{field}: {error}");
    }
    false
}

fn cmd_theme(action: &ThemeAction) -> Result<()> {
    let mut store = FileStore::open_default();
    match action {
        ThemeAction::Show => match stored_theme(&store) {
            Some(mode) => println!("{mode}"),
            None => println!("system"),
        },
        ThemeAction::Set { mode } => {
            store
                .set(THEME_KEY, mode.as_str())
                .with_context(|| format!("Failed to write {}", store.path().display()))?;
            println!("{mode}");
        }
        ThemeAction::Clear => {
            store
                .remove(THEME_KEY)
                .with_context(|| format!("Failed to write {}", store.path().display()))?;
            println!("system");
        }
    }
    Ok(())
}
