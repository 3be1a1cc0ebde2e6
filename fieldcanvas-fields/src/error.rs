//! Error types for the field configuration model

use thiserror::Error;

/// Result type for field operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur in field configuration operations
#[derive(Debug, Error)]
pub enum FieldsError {
    /// Type tag is not in the catalog
    #[error("unknown field type: {tag}")]
    UnknownType { tag: String },

    /// Field id is no longer in the collection
    #[error("field not found: {id}")]
    NotFound { id: String },

    /// Positional access past the end of the collection
    #[error("field index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Attribute key not in the current schema, or value of the wrong kind
    #[error("invalid attribute '{key}' for field type {field_type}: {message}")]
    InvalidAttribute {
        field_type: String,
        key: String,
        message: String,
    },

    /// Geometry violates the non-negative / positive-size invariant
    #[error("invalid geometry: {message}")]
    InvalidGeometry { message: String },

    /// Viewport with a non-positive or non-finite dimension
    #[error("invalid viewport: {message}")]
    InvalidViewport { message: String },

    /// Catalog entry failed validation at build time
    #[error("invalid field type definition '{tag}': {message}")]
    InvalidCatalog { tag: String, message: String },

    /// Form-state path that names nothing on a field
    #[error("invalid field path: {path}")]
    InvalidPath { path: String },

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FieldsError {
    /// Create an unknown type error
    pub fn unknown_type(tag: impl Into<String>) -> Self {
        Self::UnknownType { tag: tag.into() }
    }

    /// Create a not found error
    pub fn not_found(id: impl ToString) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    /// Create an invalid attribute error
    pub fn invalid_attribute(
        field_type: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            field_type: field_type.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an invalid catalog error
    pub fn invalid_catalog(tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCatalog {
            tag: tag.into(),
            message: message.into(),
        }
    }

    /// Racing delete/edit errors the UI may swallow
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::IndexOutOfBounds { .. })
    }
}
