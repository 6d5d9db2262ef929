//! Command-line interface for sprout.
//!
//! Two subcommands cover the whole surface:
//!
//! - `init` runs the interactive provisioning pipeline in a target directory
//! - `templates` lists the catalog without touching the filesystem
//!
//! Global flags control verbosity and progress animation. Verbosity maps to
//! a `RUST_LOG` default (an explicit `RUST_LOG` in the environment always
//! wins), and `--no-progress` disables spinners for automation.

mod init;
mod templates;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Runtime configuration derived from global CLI flags.
///
/// Kept separate from the parsed arguments so tests and programmatic
/// callers can inject a configuration without going through clap.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Default log filter when `RUST_LOG` is unset. `None` means logging
    /// stays off (quiet mode).
    pub log_level: Option<String>,

    /// Disable spinners and other animated output.
    pub no_progress: bool,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply this configuration to the process.
    ///
    /// Sets up the tracing subscriber and, when progress is disabled,
    /// exports `SPROUT_NO_PROGRESS` for the spinner layer. Must run on the
    /// main thread before any other threads exist, since it writes to the
    /// process environment.
    pub fn apply(&self) {
        if self.no_progress {
            // Safety: called once at startup, before the tokio runtime
            // spawns worker threads.
            unsafe {
                std::env::set_var("SPROUT_NO_PROGRESS", "1");
            }
        }

        let filter = match std::env::var("RUST_LOG") {
            Ok(explicit) => Some(EnvFilter::new(explicit)),
            Err(_) => self.log_level.as_deref().map(EnvFilter::new),
        };
        if let Some(filter) = filter {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

/// Top-level argument parser.
#[derive(Parser)]
#[command(
    name = "sprout",
    about = "Scaffold projects and components from catalog templates",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (equivalent to RUST_LOG=debug).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors and prompts.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable progress spinners (useful for scripts and CI).
    #[arg(long, global = true)]
    no_progress: bool,

    /// Print the full diagnostic chain on errors instead of the short
    /// user-facing message.
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a new project or component interactively.
    ///
    /// Walks through template selection and metadata prompts, downloads the
    /// chosen template package into the local cache, renders it into the
    /// target directory, and installs dependencies (or runs the template's
    /// own generator).
    Init(init::InitCommand),

    /// List the templates available in the catalog.
    Templates(templates::TemplatesCommand),
}

impl Cli {
    /// Whether full diagnostic error output was requested.
    #[must_use]
    pub const fn debug_errors(&self) -> bool {
        self.debug
    }

    /// Execute the parsed command with configuration derived from the
    /// global flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
        }
    }

    /// Execute with an injected configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.apply();

        match self.command {
            Commands::Init(cmd) => cmd.execute().await,
            Commands::Templates(cmd) => cmd.execute().await,
        }
    }
}
