//! Engine error types
//!
//! Every failure aborts generation before the archive packager runs, so callers
//! always get exactly one `GenerationError` and never a partial archive.

use thiserror::Error;

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Errors produced while turning a project configuration into an archive
#[derive(Debug, Error)]
pub enum GenerationError {
    // ─────────────────────────────────────────────────────────────
    // Configuration errors (surfaced to the caller, never fatal)
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Extension '{extension}' requires a non-empty '{field}'")]
    MissingRequiredField {
        extension: &'static str,
        field: &'static str,
    },

    #[error("Extensions '{first}' and '{second}' cannot be enabled together")]
    ConflictingExtensions {
        first: &'static str,
        second: &'static str,
    },

    #[error("Unknown trigger type '{tag}' on function '{function}' (trigger #{index})")]
    UnknownTriggerType {
        function: String,
        index: usize,
        tag: String,
    },

    // ─────────────────────────────────────────────────────────────
    // Output errors
    // ─────────────────────────────────────────────────────────────
    #[error("Functions '{first}' and '{second}' both map to output '{path}'")]
    DuplicateOutputPath {
        path: String,
        first: String,
        second: String,
    },

    #[error("Generation exceeded its {resource} budget ({actual} > {limit})")]
    ResourceExhausted {
        resource: &'static str,
        limit: u64,
        actual: u64,
    },

    // ─────────────────────────────────────────────────────────────
    // Serialization / packaging errors
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse project file: {0}")]
    ProjectFile(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerationError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// True for every error that a corrected configuration would avoid.
    ///
    /// A missing extension field is a specific kind of invalid configuration.
    pub fn is_invalid_config(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. }
                | Self::MissingRequiredField { .. }
                | Self::ConflictingExtensions { .. }
                | Self::ProjectFile(_)
        )
    }
}
