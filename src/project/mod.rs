//! Project metadata collected for a single scaffolding run.

pub mod naming;

use serde::Serialize;

/// What kind of scaffold the user is initializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitKind {
    /// A standalone application project.
    Project,
    /// A reusable component; collects a description and writes a component
    /// manifest into the target.
    Component,
}

impl InitKind {
    /// The classification tag templates must carry to match this kind.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Component => "component",
        }
    }

    /// Human-readable label used in prompts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Component => "component",
        }
    }
}

/// Metadata collected interactively, owned by the pipeline for one run.
///
/// Serializes with camelCase keys; the same serialization feeds both the
/// placeholder render context and the component manifest. Once a name is
/// accepted, `name` (formatted) and `class_name` are guaranteed non-empty.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    /// The exact string the user typed, before sanitization.
    #[serde(skip)]
    pub raw_name: String,
    /// Sanitized, upper-camel-case project name.
    pub name: String,
    /// Kebab-case naming-convention transform of the formatted name.
    pub class_name: String,
    /// Semantic version string, user-editable default "1.0.0".
    pub version: String,
    /// Required for components, absent for projects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
