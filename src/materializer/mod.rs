//! Materialization: copying a cached template into the target directory and
//! rendering placeholders.
//!
//! The copy is unconditional and preserves relative structure; exclusion
//! rules apply only to the subsequent render pass. Rendering walks the
//! copied tree, skips the baseline exclusions plus any template-supplied
//! ignore globs, substitutes placeholder expressions
//! (`{{ name }}`, `{{ className }}`, `{{ version }}`, `{{ description }}`)
//! from the collected metadata, and overwrites each file in place.
//!
//! Failures are fatal with no rollback: a partially materialized target is
//! left as-is for the user to inspect.

use anyhow::{Context, Result};
use glob::Pattern;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::cache::CacheEntry;
use crate::constants::{COMPONENT_MANIFEST_FILE, EXCLUDED_DIRS, EXCLUDED_FILES};
use crate::core::SproutError;
use crate::project::ProjectMetadata;
use crate::registry::TemplateDescriptor;
use crate::utils::fs::{copy_dir, ensure_dir};

/// Copy the template tree into the target and render placeholders.
///
/// `ignore_globs` are the template-supplied patterns, matched against each
/// file's path relative to the target root; they extend the fixed baseline
/// exclusion set.
pub fn materialize(
    source: &Path,
    target: &Path,
    metadata: &ProjectMetadata,
    ignore_globs: &[String],
) -> Result<()> {
    ensure_dir(source)?;
    ensure_dir(target)?;

    debug!(
        "copying template tree {} -> {}",
        source.display(),
        target.display()
    );
    copy_dir(source, target)?;

    let patterns = compile_patterns(ignore_globs)?;
    let context = tera::Context::from_serialize(metadata)
        .context("Failed to build render context from project metadata")?;

    for entry in WalkDir::new(target).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(target)
            .unwrap_or_else(|_| entry.path());
        if is_excluded(rel, &patterns) {
            trace!("render pass skipping {}", rel.display());
            continue;
        }
        render_in_place(entry.path(), &context)?;
    }

    Ok(())
}

/// Serialized shape of the `.componentrc` manifest.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ComponentManifest<'a> {
    #[serde(flatten)]
    metadata: &'a ProjectMetadata,
    build_path: Option<&'a str>,
    example_path: Option<&'a str>,
    npm_name: &'a str,
    npm_version: &'a str,
}

/// Write the component manifest into the target root.
///
/// The manifest merges the collected metadata with the descriptor's opaque
/// component fields and the version actually present in the cache.
pub fn write_component_manifest(
    target: &Path,
    metadata: &ProjectMetadata,
    descriptor: &TemplateDescriptor,
    entry: &CacheEntry,
) -> Result<()> {
    let manifest = ComponentManifest {
        metadata,
        build_path: descriptor.build_path.as_deref(),
        example_path: descriptor.example_path.as_deref(),
        npm_name: &descriptor.npm_name,
        npm_version: &entry.version,
    };

    let path = target.join(COMPONENT_MANIFEST_FILE);
    let content = serde_json::to_string(&manifest)?;
    fs::write(&path, content)
        .with_context(|| format!("Failed to write component manifest: {}", path.display()))?;
    debug!("wrote component manifest {}", path.display());
    Ok(())
}

fn compile_patterns(globs: &[String]) -> Result<Vec<Pattern>> {
    globs
        .iter()
        .map(|g| {
            Pattern::new(g).map_err(|e| {
                SproutError::ConfigError {
                    message: format!("invalid ignore pattern '{g}': {e}"),
                }
                .into()
            })
        })
        .collect()
}

fn is_excluded(rel: &Path, patterns: &[Pattern]) -> bool {
    let in_excluded_dir = rel.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_some_and(|name| EXCLUDED_DIRS.contains(&name))
    });
    if in_excluded_dir {
        return true;
    }

    if rel
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| EXCLUDED_FILES.contains(&name))
    {
        return true;
    }

    patterns.iter().any(|p| p.matches_path(rel))
}

fn render_in_place(path: &Path, context: &tera::Context) -> Result<()> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        // Binary files are copied verbatim but never rendered.
        Err(e) if e.kind() == ErrorKind::InvalidData => return Ok(()),
        Err(e) => {
            return Err(SproutError::FileSystemError {
                operation: format!("read for render ({e})"),
                path: path.display().to_string(),
            }
            .into());
        }
    };

    let rendered =
        tera::Tera::one_off(&content, context, false).map_err(|e| SproutError::RenderFailed {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;

    if rendered != content {
        fs::write(path, rendered).map_err(|_| SproutError::FileSystemError {
            operation: "write rendered file".to_string(),
            path: path.display().to_string(),
        })?;
    }

    Ok(())
}
