//! Global constants used throughout the sprout codebase.
//!
//! Timeouts, fixed file names, and the baseline render exclusions are
//! defined centrally so magic values stay discoverable.

use std::time::Duration;

/// Timeout for the single catalog request (5 seconds).
///
/// Matches the fail-fast contract of the registry client: one attempt,
/// bounded wait, no retry.
pub const CATALOG_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for npm subprocess invocations (5 minutes).
///
/// Template packages are small, but dependency installs in the target
/// directory can legitimately take a while on cold npm caches.
pub const NPM_COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

/// Fixed name of the component manifest written at the project root.
pub const COMPONENT_MANIFEST_FILE: &str = ".componentrc";

/// Name of the nested directory inside a template package that holds the
/// actual scaffold content.
pub const TEMPLATE_CONTENT_DIR: &str = "template";

/// Default npm registry mirror used for template acquisition and
/// dependency installs.
pub const DEFAULT_NPM_REGISTRY: &str = "https://registry.npmjs.org";

/// Default catalog endpoint returning the template list.
pub const DEFAULT_CATALOG_URL: &str = "https://catalog.sprout.dev/api/templates";

/// Directory names that never get rendered.
pub const EXCLUDED_DIRS: &[&str] = &["node_modules", ".git", ".vscode", "public"];

/// Directory names that do not count as content when deciding whether a
/// target directory is empty. Deliberately narrower than [`EXCLUDED_DIRS`]:
/// only installed dependencies are disposable, anything else in the target
/// belongs to the user. Dotfiles are ignored separately.
pub const DISPOSABLE_DIRS: &[&str] = &["node_modules"];

/// File names excluded from the render pass.
pub const EXCLUDED_FILES: &[&str] = &[".DS_Store", "README.md"];

/// Default version offered when prompting for a project version.
pub const DEFAULT_PROJECT_VERSION: &str = "1.0.0";
