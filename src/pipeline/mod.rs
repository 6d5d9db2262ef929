//! The template provisioning and instantiation pipeline.
//!
//! Strictly sequential phases, each completing before the next begins:
//!
//! 1. directory guard (confirm-before-clobber)
//! 2. initialization-kind selection
//! 3. catalog fetch
//! 4. template resolution + metadata collection
//! 5. cache acquisition (download or update)
//! 6. materialization (copy + render, component manifest when applicable)
//! 7. post-processing (dependency install or custom generator)
//!
//! The pipeline owns the collected metadata for the duration of one run and
//! is the only writer of the target directory once the guard phase passes.
//! There is no mid-phase cancellation beyond the guard's two confirmation
//! points, and no retry anywhere: every remote and filesystem operation is
//! single-attempt.

pub mod guard;
pub mod resolver;

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::cache::{PackageFetcher, TemplateCache};
use crate::config::Settings;
use crate::materializer;
use crate::postprocess;
use crate::project::InitKind;
use crate::prompt::Prompt;
use crate::registry::RegistryClient;
use crate::utils::progress::Spinner;

/// How a pipeline run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The scaffold was fully provisioned.
    Completed,
    /// The user declined to continue into a non-empty directory. Not an
    /// error; the target was left untouched.
    Aborted,
}

/// Per-run options from the CLI surface.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Directory to scaffold into.
    pub target_path: PathBuf,
    /// Skip the continue confirmation for non-empty directories.
    pub force: bool,
}

/// Run the provisioning pipeline end to end.
///
/// The prompt and fetcher are injected so the whole pipeline can run
/// scripted and offline in tests; production wires up `DialoguerPrompt`
/// and `NpmFetcher`.
pub async fn run<P: Prompt, F: PackageFetcher>(
    settings: &Settings,
    options: &InitOptions,
    prompt: &P,
    fetcher: &F,
) -> Result<InitOutcome> {
    if !guard::assess_and_prepare(&options.target_path, options.force, prompt)? {
        info!("project creation aborted");
        return Ok(InitOutcome::Aborted);
    }

    let kind = select_kind(prompt)?;

    let registry = RegistryClient::new(settings.catalog_url.clone());
    let templates = registry.fetch_templates().await?;

    let resolution = resolver::resolve(kind, &templates, prompt)?;
    debug!(
        "resolved template {}@{}",
        resolution.template.npm_name, resolution.template.version
    );

    let cache = TemplateCache::new(&settings.cache_home);
    let spinner = Spinner::new(format!(
        "Acquiring template {}...",
        resolution.template.name
    ));
    let entry = match cache.acquire(fetcher, &resolution.template).await {
        Ok(entry) => {
            spinner.finish_and_clear();
            entry
        }
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e);
        }
    };
    println!("{} template ready in cache", "✓".green());

    materializer::materialize(
        &entry.template_dir,
        &options.target_path,
        &resolution.metadata,
        &resolution.template.ignore,
    )?;
    if resolution.template.is_component() {
        materializer::write_component_manifest(
            &options.target_path,
            &resolution.metadata,
            &resolution.template,
            &entry,
        )?;
    }
    println!("{} scaffold materialized", "✓".green());

    postprocess::run(
        &resolution.template,
        &entry,
        &resolution.metadata,
        &options.target_path,
        settings,
    )
    .await?;

    println!(
        "{} {} '{}' created successfully",
        "✓".green(),
        kind.label(),
        resolution.metadata.name
    );
    Ok(InitOutcome::Completed)
}

fn select_kind<P: Prompt>(prompt: &P) -> Result<InitKind> {
    let items = vec!["project".to_string(), "component".to_string()];
    let choice = prompt.select("Select the initialization type", &items)?;
    Ok(if choice == 1 {
        InitKind::Component
    } else {
        InitKind::Project
    })
}
