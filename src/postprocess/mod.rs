//! Post-processing: the two terminal branches of the pipeline.
//!
//! Normal templates get a blocking dependency install in the target
//! directory. Custom templates hand control to the template package's own
//! generator, which runs in a fresh process and receives a plain JSON
//! payload on stdin; arbitrary template logic never executes inside the
//! sprout process itself.

use anyhow::Result;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::cache::{self, CacheEntry};
use crate::config::Settings;
use crate::core::SproutError;
use crate::npm::{self, NpmCommand};
use crate::project::ProjectMetadata;
use crate::registry::{TemplateDescriptor, TemplateKind};

/// Payload handed to a custom generator on stdin.
///
/// Serialized with camelCase keys so generators written for the catalog's
/// JavaScript ecosystem read it naturally.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratorPayload<'a> {
    target_path: &'a Path,
    data: &'a ProjectMetadata,
    template: &'a TemplateDescriptor,
    template_path: &'a Path,
    source_path: &'a Path,
}

/// Run the post-processing branch selected by the template kind.
///
/// # Errors
///
/// [`SproutError::UnknownTemplateKind`] for a descriptor kind this version
/// cannot handle; otherwise the branch-specific errors below.
pub async fn run(
    descriptor: &TemplateDescriptor,
    entry: &CacheEntry,
    metadata: &ProjectMetadata,
    target: &Path,
    settings: &Settings,
) -> Result<()> {
    match &descriptor.kind {
        TemplateKind::Normal => install_dependencies(target, settings).await,
        TemplateKind::Custom => run_custom_generator(descriptor, entry, metadata, target, settings).await,
        TemplateKind::Unknown(raw) => Err(SproutError::UnknownTemplateKind {
            name: descriptor.name.clone(),
            kind: raw.clone(),
        }
        .into()),
    }
}

/// Install the scaffold's dependencies with npm in the target directory.
///
/// The subprocess inherits standard I/O so the user sees npm's own output;
/// a spawn error or non-zero exit is fatal.
pub async fn install_dependencies(target: &Path, settings: &Settings) -> Result<()> {
    npm::ensure_available(&settings.npm_program)?;
    info!("installing dependencies in {}", target.display());

    NpmCommand::new(&settings.npm_program)
        .arg("install")
        .arg(format!("--registry={}", settings.npm_registry))
        .current_dir(target)
        .inherit_stdio()
        .execute_success()
        .await
        .map_err(|e| SproutError::DependencyInstallFailed {
            reason: e.to_string(),
        })?;

    Ok(())
}

/// Invoke the template package's declared entry point as an out-of-process
/// generator.
///
/// The entry file comes from the cached package's `package.json`; a missing
/// file is fatal before anything is spawned. The payload (target path,
/// metadata, full descriptor) is written to the child's stdin as a single
/// JSON document.
pub async fn run_custom_generator(
    descriptor: &TemplateDescriptor,
    entry: &CacheEntry,
    metadata: &ProjectMetadata,
    target: &Path,
    settings: &Settings,
) -> Result<()> {
    let entry_file = cache::entry_point(&entry.package_dir)?;
    if !entry_file.is_file() {
        return Err(SproutError::EntryFileNotFound {
            path: entry_file.display().to_string(),
        }
        .into());
    }

    let payload = GeneratorPayload {
        target_path: target,
        data: metadata,
        template: descriptor,
        template_path: &entry.template_dir,
        source_path: &entry.package_dir,
    };
    let payload_json = serde_json::to_vec(&payload)?;

    info!("running custom generator for template '{}'", descriptor.name);
    debug!(
        "spawning {} {}",
        settings.node_program,
        entry_file.display()
    );

    let mut child = Command::new(&settings.node_program)
        .arg(&entry_file)
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| SproutError::GeneratorFailed {
            reason: format!("failed to spawn generator process: {e}"),
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(&payload_json).await {
            Ok(()) => {}
            // A generator that never reads stdin closes the pipe early;
            // its exit status decides success, not the payload write.
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                debug!("generator closed stdin before the payload was written");
            }
            Err(e) => {
                return Err(SproutError::GeneratorFailed {
                    reason: format!("failed to write generator payload: {e}"),
                }
                .into());
            }
        }
        // Dropping stdin closes the pipe so the generator sees EOF.
    }

    let status = child.wait().await.map_err(|e| SproutError::GeneratorFailed {
        reason: e.to_string(),
    })?;

    if !status.success() {
        return Err(SproutError::GeneratorFailed {
            reason: format!("generator exited with status {status}"),
        }
        .into());
    }

    Ok(())
}
