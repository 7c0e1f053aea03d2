//! # Error Types
//!
//! Crate-level error wrapping the per-module errors, used by the CLI and by
//! callers that drive both rendering and the badge catalog.

use thiserror::Error;

use crate::badge::{CatalogError, StorageError, ValidationError};
use crate::render::RenderError;

/// Main error type for popsheet operations
#[derive(Debug, Error)]
pub enum PopsheetError {
    /// Page rasterization failed
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Badge catalog operation rejected or failed to persist
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Badge input failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid argument or input document
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON parse or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
