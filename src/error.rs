//! Structured error types for the Cadre layout engine.
//!
//! The rebuild path itself never fails: malformed layout configuration
//! degrades to "no visible change". The only real error sources are scene
//! JSON parsing and misuse of the tree API (stale ids, attach cycles).

use thiserror::Error;

/// The unified error type returned by the public Cadre API.
#[derive(Debug, Error)]
pub enum CadreError {
    /// JSON input failed to parse as a valid scene description.
    #[error("failed to parse scene: {source}{}", format_hint(.hint))]
    Parse {
        source: serde_json::Error,
        hint: String,
    },

    /// An `ElementId` refers to an element that was despawned (or was never
    /// part of this tree).
    #[error("element reference is stale or was despawned")]
    StaleElement,

    /// Attaching an element to itself or to one of its own descendants.
    #[error("cannot attach an element to itself or its own descendant")]
    AttachCycle,
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for CadreError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the scene schema. Check field names and types."
                    .to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input — is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        CadreError::Parse { source: e, hint }
    }
}
