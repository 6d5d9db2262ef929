//! Local template package cache with install/update semantics.
//!
//! Template packages are acquired through the system npm command into a
//! per-user cache root and never evicted by the pipeline. Acquisition is
//! idempotent: a package already cached at the requested version is not
//! fetched again; a cached package at a different version is reconciled in
//! place by a fresh install (update).
//!
//! The cache uses the standard npm prefix layout: packages land under
//! `<cache_home>/templates/node_modules/<package>`, and the installed
//! version is read back from the package's own `package.json`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::TEMPLATE_CONTENT_DIR;
use crate::core::SproutError;
use crate::npm::{self, NpmCommand};
use crate::registry::TemplateDescriptor;

/// Downloads a package at an exact version into an npm prefix directory.
///
/// This is the only seam between the cache and the network; tests provide
/// a fake that writes package contents directly to disk.
pub trait PackageFetcher {
    /// Install `package@version` under `prefix` using the npm layout
    /// (`prefix/node_modules/<package>`). Installing over an existing copy
    /// replaces it (update semantics).
    fn install(
        &self,
        package: &str,
        version: &str,
        prefix: &Path,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Production fetcher shelling out to npm.
pub struct NpmFetcher {
    program: String,
    registry: String,
}

impl NpmFetcher {
    /// Create a fetcher using the given npm program and registry mirror.
    #[must_use]
    pub fn new(program: impl Into<String>, registry: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            registry: registry.into(),
        }
    }
}

impl PackageFetcher for NpmFetcher {
    async fn install(&self, package: &str, version: &str, prefix: &Path) -> Result<()> {
        npm::ensure_available(&self.program)?;
        crate::utils::fs::ensure_dir(prefix)?;

        NpmCommand::new(&self.program)
            .args([
                "install",
                &format!("{package}@{version}"),
                "--prefix",
                &prefix.display().to_string(),
                &format!("--registry={}", self.registry),
            ])
            .execute_success()
            .await
            .map_err(|e| SproutError::PackageAcquisitionFailed {
                package: package.to_string(),
                version: version.to_string(),
                reason: e.to_string(),
            })?;

        Ok(())
    }
}

/// On-disk representation of an acquired template package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Registry identifier of the package.
    pub npm_name: String,
    /// Version present in the cache after acquisition.
    pub version: String,
    /// Root of the unpacked package (contains `package.json`).
    pub package_dir: PathBuf,
    /// The package's nested scaffold content directory.
    pub template_dir: PathBuf,
}

#[derive(Deserialize)]
struct PackageManifest {
    #[serde(default)]
    version: String,
    #[serde(default)]
    main: Option<String>,
}

/// Template package cache rooted at an explicit directory.
///
/// The root is threaded in from settings rather than read ambiently, so
/// every test run can use an isolated temporary cache.
pub struct TemplateCache {
    prefix: PathBuf,
}

impl TemplateCache {
    /// Create a cache under `cache_home`.
    #[must_use]
    pub fn new(cache_home: &Path) -> Self {
        Self {
            prefix: cache_home.join("templates"),
        }
    }

    /// Expected package root for a given package identifier.
    #[must_use]
    pub fn package_dir(&self, package: &str) -> PathBuf {
        self.prefix.join("node_modules").join(package)
    }

    /// Guarantee `descriptor.npm_name@descriptor.version` is present and
    /// current in the cache, downloading or updating as needed.
    ///
    /// # Errors
    ///
    /// - [`SproutError::PackageAcquisitionFailed`] when the fetch fails
    /// - [`SproutError::TemplateContentMissing`] when the acquired package
    ///   has no `template/` directory
    pub async fn acquire<F: PackageFetcher>(
        &self,
        fetcher: &F,
        descriptor: &TemplateDescriptor,
    ) -> Result<CacheEntry> {
        let package_dir = self.package_dir(&descriptor.npm_name);

        match self.installed_version(&package_dir)? {
            None => {
                info!(
                    "downloading template {}@{}",
                    descriptor.npm_name, descriptor.version
                );
                fetcher
                    .install(&descriptor.npm_name, &descriptor.version, &self.prefix)
                    .await?;
            }
            Some(cached) if cached == descriptor.version => {
                debug!(
                    "template {}@{} already cached, skipping fetch",
                    descriptor.npm_name, cached
                );
            }
            Some(cached) => {
                info!(
                    "updating template {} from {} to {}",
                    descriptor.npm_name, cached, descriptor.version
                );
                fetcher
                    .install(&descriptor.npm_name, &descriptor.version, &self.prefix)
                    .await?;
            }
        }

        let template_dir = package_dir.join(TEMPLATE_CONTENT_DIR);
        if !template_dir.is_dir() {
            return Err(SproutError::TemplateContentMissing {
                name: descriptor.name.clone(),
            }
            .into());
        }

        Ok(CacheEntry {
            npm_name: descriptor.npm_name.clone(),
            version: descriptor.version.clone(),
            package_dir,
            template_dir,
        })
    }

    fn installed_version(&self, package_dir: &Path) -> Result<Option<String>> {
        let manifest_path = package_dir.join("package.json");
        if !manifest_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&manifest_path).with_context(|| {
            format!("Failed to read package manifest: {}", manifest_path.display())
        })?;
        let manifest: PackageManifest = serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse package manifest: {}", manifest_path.display())
        })?;

        if manifest.version.is_empty() {
            Ok(None)
        } else {
            Ok(Some(manifest.version))
        }
    }
}

/// Resolve a cached package's declared entry point file.
///
/// Reads `package.json` at the package root and joins its `main` field
/// (default `index.js`, npm's own default) onto the package directory. Does
/// not check existence; callers decide how a missing file is reported.
pub fn entry_point(package_dir: &Path) -> Result<PathBuf> {
    let manifest_path = package_dir.join("package.json");
    let content = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("Failed to read package manifest: {}", manifest_path.display()))?;
    let manifest: PackageManifest = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse package manifest: {}", manifest_path.display()))?;

    let main = manifest.main.unwrap_or_else(|| "index.js".to_string());
    Ok(package_dir.join(main))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TemplateKind;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct RecordingFetcher {
        calls: Mutex<Vec<(String, String)>>,
        with_template_dir: bool,
    }

    impl RecordingFetcher {
        fn new(with_template_dir: bool) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                with_template_dir,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl PackageFetcher for RecordingFetcher {
        async fn install(&self, package: &str, version: &str, prefix: &Path) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((package.to_string(), version.to_string()));

            let package_dir = prefix.join("node_modules").join(package);
            fs::create_dir_all(&package_dir)?;
            fs::write(
                package_dir.join("package.json"),
                format!(r#"{{"name":"{package}","version":"{version}"}}"#),
            )?;
            if self.with_template_dir {
                fs::create_dir_all(package_dir.join("template"))?;
                fs::write(package_dir.join("template/index.html"), "<h1>{{ name }}</h1>")?;
            }
            Ok(())
        }
    }

    fn descriptor(version: &str) -> TemplateDescriptor {
        TemplateDescriptor {
            name: "Template A".to_string(),
            npm_name: "tpl-a".to_string(),
            version: version.to_string(),
            tag: vec!["project".to_string()],
            kind: TemplateKind::Normal,
            ignore: Vec::new(),
            build_path: None,
            example_path: None,
        }
    }

    #[tokio::test]
    async fn fresh_acquire_installs_and_resolves_template_dir() -> Result<()> {
        let temp = TempDir::new()?;
        let cache = TemplateCache::new(temp.path());
        let fetcher = RecordingFetcher::new(true);

        let entry = cache.acquire(&fetcher, &descriptor("1.0.0")).await?;

        assert_eq!(fetcher.call_count(), 1);
        assert_eq!(entry.version, "1.0.0");
        assert!(entry.template_dir.ends_with("tpl-a/template"));
        assert!(entry.template_dir.is_dir());
        Ok(())
    }

    #[tokio::test]
    async fn second_acquire_at_same_version_is_idempotent() -> Result<()> {
        let temp = TempDir::new()?;
        let cache = TemplateCache::new(temp.path());
        let fetcher = RecordingFetcher::new(true);

        let first = cache.acquire(&fetcher, &descriptor("1.0.0")).await?;
        let second = cache.acquire(&fetcher, &descriptor("1.0.0")).await?;

        assert_eq!(fetcher.call_count(), 1, "no re-download at identical version");
        assert_eq!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn version_change_triggers_update() -> Result<()> {
        let temp = TempDir::new()?;
        let cache = TemplateCache::new(temp.path());
        let fetcher = RecordingFetcher::new(true);

        cache.acquire(&fetcher, &descriptor("1.0.0")).await?;
        let updated = cache.acquire(&fetcher, &descriptor("1.1.0")).await?;

        assert_eq!(fetcher.call_count(), 2);
        assert_eq!(updated.version, "1.1.0");

        let manifest =
            fs::read_to_string(cache.package_dir("tpl-a").join("package.json"))?;
        assert!(manifest.contains("1.1.0"));
        Ok(())
    }

    #[tokio::test]
    async fn missing_template_dir_is_fatal_and_names_template() -> Result<()> {
        let temp = TempDir::new()?;
        let cache = TemplateCache::new(temp.path());
        let fetcher = RecordingFetcher::new(false);

        let err = cache.acquire(&fetcher, &descriptor("1.0.0")).await.unwrap_err();
        match err.downcast_ref::<SproutError>() {
            Some(SproutError::TemplateContentMissing { name }) => {
                assert_eq!(name, "Template A");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn entry_point_defaults_to_index_js() -> Result<()> {
        let temp = TempDir::new()?;
        fs::write(temp.path().join("package.json"), r#"{"name":"x","version":"1.0.0"}"#)?;
        let entry = entry_point(temp.path())?;
        assert!(entry.ends_with("index.js"));
        Ok(())
    }

    #[test]
    fn entry_point_honors_main_field() -> Result<()> {
        let temp = TempDir::new()?;
        fs::write(
            temp.path().join("package.json"),
            r#"{"name":"x","version":"1.0.0","main":"lib/generate.js"}"#,
        )?;
        let entry = entry_point(temp.path())?;
        assert!(entry.ends_with("lib/generate.js"));
        Ok(())
    }
}
