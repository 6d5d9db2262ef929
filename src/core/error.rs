//! Error handling for sprout.
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`SproutError`]) for precise handling in code
//! 2. **User-friendly messages** ([`ErrorContext`]) with actionable suggestions
//!    for CLI users
//!
//! Every fatal condition in the provisioning pipeline maps to a variant here,
//! grouped by pipeline phase: catalog lookup, cache acquisition,
//! materialization, post-processing, and configuration. Each class carries a
//! distinct process exit code so automation can tell failure modes apart.
//!
//! A declined confirmation in the directory guard is *not* an error: it is a
//! deliberate abort and terminates the process with exit code 0.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for sprout operations.
///
/// Variants carry the details needed for a useful terminal message: package
/// identifiers, file paths, subprocess stderr. Messages are written for end
/// users, not just developers.
#[derive(Error, Debug)]
pub enum SproutError {
    /// npm executable not found in PATH.
    ///
    /// Template acquisition and dependency installation both shell out to
    /// the system npm command, so nothing works without it.
    #[error("npm is not installed or not found in PATH")]
    NpmNotFound,

    /// An npm subprocess returned a non-zero exit code.
    #[error("npm operation failed: {operation}")]
    NpmCommandError {
        /// The npm operation that failed (e.g. "install").
        operation: String,
        /// Error output captured from the npm command.
        stderr: String,
    },

    /// The template catalog could not be fetched.
    #[error("cannot reach template catalog at {url}")]
    CatalogUnavailable {
        /// The catalog endpoint that was queried.
        url: String,
        /// Reason reported by the HTTP client.
        reason: String,
    },

    /// The catalog responded but its template list was empty or missing.
    #[error("no templates available in the catalog")]
    CatalogEmpty,

    /// Kind-filtering produced zero candidate templates.
    ///
    /// The catalog had entries, but none tagged for the chosen
    /// initialization kind. Failing fast here beats presenting an empty
    /// selection menu.
    #[error("no templates tagged for '{kind}' are available")]
    NoMatchingTemplates {
        /// The initialization kind that had no candidates.
        kind: String,
    },

    /// Installing or updating a template package into the cache failed.
    #[error("failed to acquire template package {package}@{version}")]
    PackageAcquisitionFailed {
        /// Registry identifier of the template package.
        package: String,
        /// Version that was being fetched.
        version: String,
        /// Underlying failure reason.
        reason: String,
    },

    /// The acquired package has no nested `template/` content directory.
    #[error("template '{name}' not found: package has no template directory")]
    TemplateContentMissing {
        /// Display name of the template.
        name: String,
    },

    /// A filesystem operation failed during copy or render.
    #[error("file system error: {operation} at {path}")]
    FileSystemError {
        /// The operation that failed (e.g. "copy", "read directory").
        operation: String,
        /// Path where the failure occurred.
        path: String,
    },

    /// Placeholder substitution failed for a copied file.
    #[error("failed to render template file {file}")]
    RenderFailed {
        /// Path of the file that failed to render.
        file: String,
        /// Error reported by the template engine.
        reason: String,
    },

    /// A custom template's declared entry point does not exist on disk.
    #[error("entry file not found: {path}")]
    EntryFileNotFound {
        /// Path of the missing entry file.
        path: String,
    },

    /// The custom generator process failed.
    #[error("custom template generator failed: {reason}")]
    GeneratorFailed {
        /// Spawn error or exit status description.
        reason: String,
    },

    /// Dependency installation in the target directory failed.
    #[error("dependency installation failed: {reason}")]
    DependencyInstallFailed {
        /// Spawn error or exit status description.
        reason: String,
    },

    /// The template descriptor carries a kind this version cannot handle.
    ///
    /// Indicates a corrupt or incompatible descriptor rather than a user
    /// mistake.
    #[error("unknown template type '{kind}' for template '{name}'")]
    UnknownTemplateKind {
        /// Display name of the template.
        name: String,
        /// The unrecognized kind value.
        kind: String,
    },

    /// Configuration error (invalid settings, unusable cache home, ...).
    #[error("configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem.
        message: String,
    },

    /// An interactive prompt could not be completed.
    #[error("prompt failed: {reason}")]
    PromptFailed {
        /// Error reported by the terminal prompt.
        reason: String,
    },

    /// IO error wrapper from [`std::io::Error`].
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl SproutError {
    /// Process exit code for this error's class.
    ///
    /// Codes are stable per pipeline phase so scripts can distinguish a
    /// catalog outage from a broken template package:
    /// 2 configuration, 3 catalog, 4 cache acquisition, 5 materialization,
    /// 6 post-processing, 1 anything else.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigError { .. } | Self::UnknownTemplateKind { .. } => 2,
            Self::CatalogUnavailable { .. }
            | Self::CatalogEmpty
            | Self::NoMatchingTemplates { .. } => 3,
            Self::PackageAcquisitionFailed { .. }
            | Self::TemplateContentMissing { .. }
            | Self::NpmNotFound => 4,
            Self::FileSystemError { .. } | Self::RenderFailed { .. } => 5,
            Self::EntryFileNotFound { .. }
            | Self::GeneratorFailed { .. }
            | Self::DependencyInstallFailed { .. } => 6,
            _ => 1,
        }
    }
}

/// Wrapper pairing a [`SproutError`] with optional details and a suggestion.
///
/// Produced by [`user_friendly_error`] at the top level and rendered to
/// stderr with colored severity markers.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error.
    pub error: SproutError,
    /// Actionable suggestion for resolving the problem.
    pub suggestion: Option<String>,
    /// Additional background on why the error occurred.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with no suggestion or details.
    #[must_use]
    pub const fn new(error: SproutError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attach an actionable suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach background details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colored markers.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }

    /// Exit code of the wrapped error.
    pub const fn exit_code(&self) -> i32 {
        self.error.exit_code()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Convert any error into a user-friendly [`ErrorContext`].
///
/// Typed [`SproutError`]s get phase-specific suggestions; raw IO errors get
/// generic filesystem guidance; everything else falls back to the anyhow
/// message chain wrapped in a configuration error.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    match error.downcast::<SproutError>() {
        Ok(sprout_error) => create_error_context(sprout_error),
        Err(other) => {
            if let Some(io_error) = other.downcast_ref::<std::io::Error>() {
                let kind = io_error.kind();
                let ctx = ErrorContext::new(SproutError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                });
                return match kind {
                    std::io::ErrorKind::PermissionDenied => ctx
                        .with_suggestion("Check file ownership or re-run with elevated permissions")
                        .with_details("sprout does not have permission to read or write a path it needs"),
                    std::io::ErrorKind::NotFound => ctx
                        .with_suggestion("Check that the path exists and is spelled correctly"),
                    _ => ctx.with_details(io_error.to_string()),
                };
            }

            let mut message = other.to_string();
            let chain: Vec<String> = other.chain().skip(1).map(ToString::to_string).collect();
            if !chain.is_empty() {
                message.push_str("\n\nCaused by:");
                for (i, cause) in chain.iter().enumerate() {
                    message.push_str(&format!("\n  {}: {}", i + 1, cause));
                }
            }
            ErrorContext::new(SproutError::ConfigError { message })
        }
    }
}

fn create_error_context(error: SproutError) -> ErrorContext {
    match &error {
        SproutError::NpmNotFound => ErrorContext::new(error)
            .with_suggestion("Install Node.js and npm from https://nodejs.org/ and ensure npm is in your PATH")
            .with_details("sprout acquires template packages and installs dependencies through the system npm command"),
        SproutError::CatalogUnavailable { .. } => ErrorContext::new(error)
            .with_suggestion("Check your network connection, or point SPROUT_CATALOG_URL at a reachable catalog")
            .with_details("The catalog request is a single attempt with a 5 second timeout"),
        SproutError::CatalogEmpty => ErrorContext::new(error)
            .with_suggestion("Verify the catalog endpoint serves a non-empty 'list' field"),
        SproutError::NoMatchingTemplates { kind } => {
            let kind = kind.clone();
            ErrorContext::new(error).with_details(format!(
                "The catalog has templates, but none carry the '{kind}' tag"
            ))
        }
        SproutError::PackageAcquisitionFailed { .. } => ErrorContext::new(error)
            .with_suggestion("Check the npm registry mirror setting and that the package version exists"),
        SproutError::TemplateContentMissing { .. } => ErrorContext::new(error)
            .with_details("A template package must contain a 'template' directory with the scaffold content"),
        SproutError::EntryFileNotFound { .. } => ErrorContext::new(error)
            .with_details("The custom template's package.json declares a main entry that is missing from the package"),
        SproutError::UnknownTemplateKind { .. } => ErrorContext::new(error)
            .with_details("The template descriptor is corrupt or was published for a newer sprout version"),
        SproutError::DependencyInstallFailed { .. } => ErrorContext::new(error)
            .with_suggestion("Inspect the npm output above; the scaffold itself was written successfully"),
        _ => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_class() {
        assert_eq!(
            SproutError::ConfigError {
                message: "bad".into()
            }
            .exit_code(),
            2
        );
        assert_eq!(SproutError::CatalogEmpty.exit_code(), 3);
        assert_eq!(SproutError::NpmNotFound.exit_code(), 4);
        assert_eq!(
            SproutError::TemplateContentMissing { name: "x".into() }.exit_code(),
            4
        );
        assert_eq!(
            SproutError::RenderFailed {
                file: "a".into(),
                reason: "b".into()
            }
            .exit_code(),
            5
        );
        assert_eq!(
            SproutError::EntryFileNotFound { path: "p".into() }.exit_code(),
            6
        );
        assert_eq!(
            SproutError::PromptFailed { reason: "r".into() }.exit_code(),
            1
        );
    }

    #[test]
    fn user_friendly_error_preserves_typed_variant() {
        let err = anyhow::Error::from(SproutError::CatalogEmpty);
        let ctx = user_friendly_error(err);
        assert!(matches!(ctx.error, SproutError::CatalogEmpty));
        assert!(ctx.suggestion.is_some());
    }

    #[test]
    fn user_friendly_error_wraps_untyped_chain() {
        let err = anyhow::anyhow!("inner").context("outer");
        let ctx = user_friendly_error(err);
        let rendered = format!("{ctx}");
        assert!(rendered.contains("outer"));
        assert!(rendered.contains("inner"));
    }

    #[test]
    fn context_display_includes_suggestion() {
        let ctx = ErrorContext::new(SproutError::CatalogEmpty)
            .with_suggestion("try again")
            .with_details("the list was empty");
        let rendered = format!("{ctx}");
        assert!(rendered.contains("Suggestion: try again"));
        assert!(rendered.contains("Details: the list was empty"));
    }
}
