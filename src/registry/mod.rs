//! Registry client for the remote template catalog.
//!
//! One HTTP GET against the catalog endpoint returns a JSON body whose
//! `list` field is the canonical template list. The request is a single
//! attempt with a bounded timeout; network failures and empty catalogs are
//! both fatal, since the pipeline cannot proceed without at least one
//! candidate template.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::CATALOG_REQUEST_TIMEOUT;
use crate::core::SproutError;

/// Classification of how a template is instantiated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum TemplateKind {
    /// Declarative scaffold: copy, render placeholders, install
    /// dependencies.
    #[default]
    Normal,
    /// The template package supplies its own generator, invoked
    /// out-of-process instead of the standard render/install flow.
    Custom,
    /// Any kind value this version does not recognize, preserved verbatim
    /// for diagnostics. Selecting such a template is an unrecoverable
    /// configuration error.
    Unknown(String),
}

impl TemplateKind {
    /// The wire representation of this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Normal => "normal",
            Self::Custom => "custom",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for TemplateKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "normal" => Self::Normal,
            "custom" => Self::Custom,
            _ => Self::Unknown(value),
        }
    }
}

impl From<TemplateKind> for String {
    fn from(kind: TemplateKind) -> Self {
        match kind {
            TemplateKind::Unknown(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

/// Catalog entry describing an installable scaffold package.
///
/// Immutable once fetched; `npm_name` plus `version` uniquely identify a
/// cache entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDescriptor {
    /// Human-readable display name shown in the selection menu.
    pub name: String,
    /// Registry-unique package identifier.
    pub npm_name: String,
    /// Semantic version of the template package.
    pub version: String,
    /// Classification tags, e.g. "project" or "component".
    #[serde(default)]
    pub tag: Vec<String>,
    /// Template kind; defaults to normal when the catalog omits it.
    #[serde(default, rename = "type")]
    pub kind: TemplateKind,
    /// Template-supplied glob patterns excluded from the render pass.
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Opaque metadata echoed into the component manifest.
    #[serde(default)]
    pub build_path: Option<String>,
    /// Opaque metadata echoed into the component manifest.
    #[serde(default)]
    pub example_path: Option<String>,
}

impl TemplateDescriptor {
    /// Whether this template carries the component classification tag.
    #[must_use]
    pub fn is_component(&self) -> bool {
        self.tag.iter().any(|t| t == "component")
    }
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    list: Vec<TemplateDescriptor>,
}

/// HTTP client for the template catalog endpoint.
pub struct RegistryClient {
    client: reqwest::Client,
    catalog_url: String,
}

impl RegistryClient {
    /// Create a client for the given catalog endpoint.
    ///
    /// The underlying HTTP client uses a short request timeout; there is no
    /// retry policy by design (single interactive run, fail fast).
    pub fn new(catalog_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(CATALOG_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            catalog_url: catalog_url.into(),
        }
    }

    /// Fetch the template catalog.
    ///
    /// # Errors
    ///
    /// - [`SproutError::CatalogUnavailable`] on any network or decode
    ///   failure
    /// - [`SproutError::CatalogEmpty`] when the response carries no
    ///   templates
    pub async fn fetch_templates(&self) -> Result<Vec<TemplateDescriptor>> {
        debug!("fetching template catalog from {}", self.catalog_url);

        let response = self
            .client
            .get(&self.catalog_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| SproutError::CatalogUnavailable {
                url: self.catalog_url.clone(),
                reason: e.to_string(),
            })?;

        let catalog: CatalogResponse =
            response
                .json()
                .await
                .map_err(|e| SproutError::CatalogUnavailable {
                    url: self.catalog_url.clone(),
                    reason: format!("invalid catalog payload: {e}"),
                })?;

        if catalog.list.is_empty() {
            return Err(SproutError::CatalogEmpty.into());
        }

        debug!("catalog returned {} templates", catalog.list.len());
        Ok(catalog.list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_deserializes_from_catalog_json() {
        let json = r#"{
            "npmName": "tpl-a",
            "name": "Template A",
            "version": "1.0.0",
            "tag": ["project"],
            "type": "normal",
            "ignore": ["**/assets/**"],
            "buildPath": "dist",
            "examplePath": "example"
        }"#;

        let descriptor: TemplateDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.npm_name, "tpl-a");
        assert_eq!(descriptor.kind, TemplateKind::Normal);
        assert_eq!(descriptor.ignore, vec!["**/assets/**".to_string()]);
        assert_eq!(descriptor.build_path.as_deref(), Some("dist"));
        assert!(!descriptor.is_component());
    }

    #[test]
    fn missing_kind_defaults_to_normal() {
        let json = r#"{"npmName": "tpl-b", "name": "B", "version": "0.1.0", "tag": []}"#;
        let descriptor: TemplateDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.kind, TemplateKind::Normal);
    }

    #[test]
    fn unrecognized_kind_keeps_the_raw_value() {
        let json =
            r#"{"npmName": "tpl-c", "name": "C", "version": "0.1.0", "type": "wasm-wizard"}"#;
        let descriptor: TemplateDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(
            descriptor.kind,
            TemplateKind::Unknown("wasm-wizard".to_string())
        );
        assert_eq!(descriptor.kind.as_str(), "wasm-wizard");
    }

    #[test]
    fn component_tag_detection() {
        let json = r#"{"npmName": "tpl-d", "name": "D", "version": "2.0.0", "tag": ["component", "ui"]}"#;
        let descriptor: TemplateDescriptor = serde_json::from_str(json).unwrap();
        assert!(descriptor.is_component());
    }

    #[tokio::test]
    async fn fetch_templates_fails_fast_on_unreachable_catalog() {
        // Port 9 (discard) is never serving HTTP here.
        let client = RegistryClient::new("http://127.0.0.1:9/catalog");
        let err = client.fetch_templates().await.unwrap_err();
        let sprout = err.downcast_ref::<SproutError>().unwrap();
        assert!(matches!(sprout, SproutError::CatalogUnavailable { .. }));
    }
}
