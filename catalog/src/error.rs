//! Error types for catalog and settings loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a catalog or a settings file.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The catalog loaded but failed structural validation.
    #[error("invalid catalog: {0}")]
    Invalid(String),

    /// The file extension is neither JSON nor YAML.
    #[error("unsupported catalog format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// All configured loader sources failed.
    #[error("no catalog sources available")]
    NoSourcesAvailable,
}

/// Convenience alias for results with [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;
