//! Shared test fixtures for unit and integration tests.
//!
//! Available to integration tests through the `test-utils` cargo feature
//! (the crate depends on itself with that feature in dev-dependencies).
//! Provides a scripted prompt, an offline package fetcher that fabricates
//! template packages on disk, and a one-shot HTTP catalog server.

use anyhow::Result;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Mutex, Once};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing_subscriber::EnvFilter;

use crate::cache::PackageFetcher;
use crate::prompt::Prompt;

/// Global flag to ensure logging is only initialized once in tests.
static INIT_LOGGING: Once = Once::new();

/// Initialize tracing for tests, honoring `RUST_LOG`.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A scripted answer for [`ScriptedPrompt`].
#[derive(Debug, Clone)]
pub enum Answer {
    /// Answer to a confirmation prompt.
    Confirm(bool),
    /// Answer to a free-text input prompt. Empty strings fall back to the
    /// prompt's default, mirroring terminal behavior.
    Input(String),
    /// Answer to a selection prompt (chosen index).
    Select(usize),
}

/// Prompt implementation that replays a fixed script of answers.
///
/// Panics when the pipeline asks for a different prompt type than the
/// script expects, which turns prompt-order regressions into loud test
/// failures.
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<Answer>>,
}

impl ScriptedPrompt {
    #[must_use]
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
        }
    }

    fn next(&self, expected: &str) -> Answer {
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("scripted prompt exhausted, expected {expected}"))
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&self, message: &str, _default: bool) -> Result<bool> {
        match self.next("confirm") {
            Answer::Confirm(value) => Ok(value),
            other => panic!("expected Confirm for '{message}', got {other:?}"),
        }
    }

    fn input(&self, message: &str, default: Option<&str>) -> Result<String> {
        match self.next("input") {
            Answer::Input(value) if value.is_empty() => {
                Ok(default.unwrap_or_default().to_string())
            }
            Answer::Input(value) => Ok(value),
            other => panic!("expected Input for '{message}', got {other:?}"),
        }
    }

    fn select(&self, message: &str, items: &[String]) -> Result<usize> {
        match self.next("select") {
            Answer::Select(index) => {
                assert!(
                    index < items.len(),
                    "scripted selection {index} out of range for '{message}' ({items:?})"
                );
                Ok(index)
            }
            other => panic!("expected Select for '{message}', got {other:?}"),
        }
    }
}

/// A template file fabricated by [`FakeFetcher`].
#[derive(Debug, Clone)]
pub struct FixtureFile {
    /// Path relative to the package root (e.g. `template/index.html`).
    pub path: String,
    /// File content.
    pub content: String,
}

/// Offline [`PackageFetcher`] that writes a fabricated package to disk.
///
/// Mimics the npm prefix layout the production fetcher produces, records
/// every install call for idempotence assertions, and lets tests shape the
/// package contents (template files, entry point, `main` field).
pub struct FakeFetcher {
    calls: Mutex<Vec<(String, String)>>,
    files: Vec<FixtureFile>,
    main_field: Option<String>,
}

impl FakeFetcher {
    /// A fetcher producing a minimal normal template.
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            files: vec![FixtureFile {
                path: "template/index.html".to_string(),
                content: "<h1>{{ name }}</h1>".to_string(),
            }],
            main_field: None,
        }
    }

    /// Replace the fabricated package contents.
    #[must_use]
    pub fn with_files(mut self, files: Vec<FixtureFile>) -> Self {
        self.files = files;
        self
    }

    /// Declare a `main` entry in the fabricated `package.json`.
    #[must_use]
    pub fn with_main(mut self, main: impl Into<String>) -> Self {
        self.main_field = Some(main.into());
        self
    }

    /// Install calls recorded so far as `(package, version)` pairs.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for FakeFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageFetcher for FakeFetcher {
    async fn install(&self, package: &str, version: &str, prefix: &Path) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((package.to_string(), version.to_string()));

        let package_dir = prefix.join("node_modules").join(package);
        if package_dir.exists() {
            std::fs::remove_dir_all(&package_dir)?;
        }
        std::fs::create_dir_all(&package_dir)?;

        let manifest = match &self.main_field {
            Some(main) => format!(
                r#"{{"name":"{package}","version":"{version}","main":"{main}"}}"#
            ),
            None => format!(r#"{{"name":"{package}","version":"{version}"}}"#),
        };
        std::fs::write(package_dir.join("package.json"), manifest)?;

        for file in &self.files {
            let path = package_dir.join(&file.path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &file.content)?;
        }
        Ok(())
    }
}

/// Serve a single HTTP response on an ephemeral port and return its URL.
///
/// Accepts exactly one connection, ignores the request, writes `body` as a
/// JSON response, and shuts down. Enough to stand in for the catalog
/// endpoint without a real server.
pub async fn serve_catalog_once(body: String) -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    Ok(format!("http://{addr}/catalog"))
}
