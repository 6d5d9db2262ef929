//! Type-safe npm command builder for consistent subprocess execution.
//!
//! Every npm invocation (template acquisition into the cache, dependency
//! installation in the target directory) goes through this builder so that
//! timeout handling, logging, and error mapping stay uniform. The program
//! name is injectable, which lets tests substitute a stub executable.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::NPM_COMMAND_TIMEOUT;
use crate::core::SproutError;

/// Verify the npm executable is reachable before spawning anything.
///
/// # Errors
///
/// [`SproutError::NpmNotFound`] when the program cannot be located in PATH.
pub fn ensure_available(program: &str) -> Result<()> {
    which::which(program).map_err(|_| SproutError::NpmNotFound)?;
    Ok(())
}

/// Fluent builder for npm subprocess invocations.
///
/// Defaults: output captured, 5-minute timeout, current process working
/// directory. Use [`inherit_stdio`](Self::inherit_stdio) for interactive
/// installs where the user should see npm's own progress output.
pub struct NpmCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    capture_output: bool,
    timeout_duration: Option<Duration>,
}

impl NpmCommand {
    /// Create a builder for the given npm program name or path.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            capture_output: true,
            timeout_duration: Some(NPM_COMMAND_TIMEOUT),
        }
    }

    /// Add a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory for the invocation.
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Let the child write directly to the terminal instead of capturing.
    #[must_use]
    pub const fn inherit_stdio(mut self) -> Self {
        self.capture_output = false;
        self
    }

    /// Override the default timeout (`None` disables it).
    #[must_use]
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Execute the command, failing on spawn error, timeout, or non-zero
    /// exit.
    pub async fn execute_success(self) -> Result<()> {
        let operation = self.args.first().cloned().unwrap_or_else(|| "npm".to_string());
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }

        tracing::debug!(
            target: "npm",
            "Executing command: {} {}",
            self.program,
            self.args.join(" ")
        );

        if self.capture_output {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }

        let output_future = cmd.output();
        let output = if let Some(duration) = self.timeout_duration {
            match timeout(duration, output_future).await {
                Ok(result) => result
                    .with_context(|| format!("Failed to execute {} {}", self.program, operation))?,
                Err(_) => {
                    return Err(SproutError::NpmCommandError {
                        operation,
                        stderr: format!(
                            "npm command timed out after {} seconds",
                            duration.as_secs()
                        ),
                    }
                    .into());
                }
            }
        } else {
            output_future
                .await
                .with_context(|| format!("Failed to execute {} {}", self.program, operation))?
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            tracing::debug!(
                target: "npm",
                "Command failed with exit code: {:?}",
                output.status.code()
            );
            return Err(SproutError::NpmCommandError { operation, stderr }.into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_args() {
        let cmd = NpmCommand::new("npm")
            .arg("install")
            .args(["tpl-a@1.0.0", "--registry=http://localhost:4873"]);
        assert_eq!(cmd.args, vec!["install", "tpl-a@1.0.0", "--registry=http://localhost:4873"]);
    }

    #[test]
    fn ensure_available_rejects_missing_program() {
        let err = ensure_available("definitely-not-a-real-npm-binary").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SproutError>(),
            Some(SproutError::NpmNotFound)
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn execute_success_on_zero_exit() {
        NpmCommand::new("true").execute_success().await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn execute_success_fails_on_non_zero_exit() {
        let err = NpmCommand::new("false")
            .arg("install")
            .execute_success()
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SproutError>(),
            Some(SproutError::NpmCommandError { operation, .. }) if operation == "install"
        ));
    }
}
