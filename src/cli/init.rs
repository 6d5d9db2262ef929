//! The `init` command: interactive provisioning of a new scaffold.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::cache::NpmFetcher;
use crate::config::Settings;
use crate::npm;
use crate::pipeline::{self, InitOptions, InitOutcome};
use crate::prompt::DialoguerPrompt;

/// Command to scaffold a project or component in a directory.
///
/// Everything interactive happens inside the pipeline; this command only
/// resolves configuration, checks that npm is available, and wires up the
/// production prompt and fetcher.
#[derive(Args)]
pub struct InitCommand {
    /// Directory to scaffold into (defaults to the current directory)
    #[arg(value_name = "PATH")]
    target_path: Option<PathBuf>,

    /// Skip the confirmation when the target directory is not empty
    #[arg(short, long)]
    force: bool,

    /// Root directory of the template package cache
    #[arg(long, value_name = "DIR", env = "SPROUT_CACHE_HOME")]
    cache_home: Option<PathBuf>,

    /// Template catalog endpoint
    #[arg(long, value_name = "URL", env = "SPROUT_CATALOG_URL")]
    catalog_url: Option<String>,

    /// npm registry mirror for template acquisition and installs
    #[arg(long, value_name = "URL", env = "SPROUT_NPM_REGISTRY")]
    registry: Option<String>,
}

impl InitCommand {
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load(self.cache_home, self.catalog_url, self.registry)?;

        // Fail before any prompt if npm is missing; both template
        // acquisition and dependency installation need it.
        npm::ensure_available(&settings.npm_program)?;

        let target_path = match self.target_path {
            Some(path) => path,
            None => std::env::current_dir()?,
        };
        let options = InitOptions {
            target_path,
            force: self.force,
        };

        let prompt = DialoguerPrompt::new();
        let fetcher = NpmFetcher::new(&settings.npm_program, &settings.npm_registry);

        match pipeline::run(&settings, &options, &prompt, &fetcher).await? {
            InitOutcome::Completed | InitOutcome::Aborted => Ok(()),
        }
    }
}
