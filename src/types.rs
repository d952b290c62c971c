//! Core data types for the Mermaid Chart companion
//!
//! This module defines the data model shared by the session, scanner, client
//! and panel layers: diagram documents as the remote API serves them, derived
//! in-document references, and the credential material the session manager
//! owns.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Unique identifier for remote diagram documents
///
/// Wraps a UUID to provide type safety and prevent mixing document IDs
/// with other string identifiers the API hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    /// Create a new random document ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a document ID from a string
    pub fn from_string(s: &str) -> Result<Self> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bearer authorization material plus the endpoint it is valid against
///
/// Owned exclusively by [`crate::session::CredentialStore`] and mutated only
/// by the session manager. Never persisted by the core; persistence, if any,
/// belongs to the host identity system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Access token attached as a bearer header to every API call
    pub token: String,

    /// Base endpoint of the Mermaid Chart service
    pub endpoint: String,
}

/// Rendered-output theme accepted by the remote render endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramTheme {
    Dark,
    Light,
}

impl DiagramTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramTheme::Dark => "dark",
            DiagramTheme::Light => "light",
        }
    }
}

impl std::str::FromStr for DiagramTheme {
    type Err = crate::error::CompanionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dark" => Ok(DiagramTheme::Dark),
            "light" => Ok(DiagramTheme::Light),
            other => Err(crate::error::CompanionError::Validation(format!(
                "unknown theme '{}', expected 'dark' or 'light'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for DiagramTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagram reference embedded in a source document
///
/// Derived by the scanner on every pass, never stored. Identity is the UUID,
/// not the range: edits that shift text do not lose a reference as long as
/// the token text survives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramReference {
    /// UUID of the referenced remote diagram
    pub id: Uuid,

    /// Zero-based line of the token in the document
    pub line: u32,

    /// Character column of the token's opening bracket
    pub start_col: u32,

    /// Character column one past the token's closing bracket
    pub end_col: u32,

    /// Human-readable label for list views and inline actions
    pub title: String,
}

/// A remote project that groups diagram documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// A diagram document as the remote API serves it
///
/// The server is the source of truth; the client holds at most one working
/// copy per open panel, discarded on panel close. `document_id` never changes
/// after creation; version and rendered outputs are replaced wholesale after
/// every successful update, never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagram {
    /// Server-internal row identifier
    #[serde(default)]
    pub id: String,

    /// Stable document identity referenced from source comments
    #[serde(rename = "documentID")]
    pub document_id: DocumentId,

    /// Owning project
    #[serde(rename = "projectID", default)]
    pub project_id: String,

    /// Major version component
    #[serde(default)]
    pub major: u32,

    /// Minor version component
    #[serde(default)]
    pub minor: u32,

    #[serde(default)]
    pub title: String,

    /// Mermaid source code
    #[serde(default)]
    pub code: String,

    /// Rendered SVG for the dark theme, when the server included it
    #[serde(rename = "svgCodeDark", skip_serializing_if = "Option::is_none")]
    pub svg_code_dark: Option<String>,

    /// Rendered SVG for the light theme, when the server included it
    #[serde(rename = "svgCodeLight", skip_serializing_if = "Option::is_none")]
    pub svg_code_light: Option<String>,
}

impl Diagram {
    /// Version string in the `v{major}.{minor}` form the API expects
    pub fn version(&self) -> String {
        format!("v{}.{}", self.major, self.minor)
    }

    /// Rendered SVG for a theme, if the server included one
    pub fn svg_for(&self, theme: DiagramTheme) -> Option<&str> {
        match theme {
            DiagramTheme::Dark => self.svg_code_dark.as_deref(),
            DiagramTheme::Light => self.svg_code_light.as_deref(),
        }
    }
}

/// The authenticated user, as returned by the session validation probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "fullName", default)]
    pub full_name: String,

    #[serde(rename = "emailAddress", default)]
    pub email_address: String,
}
