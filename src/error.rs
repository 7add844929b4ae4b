//! Error types for Trellis operations.
//!
//! This module provides the main error type [`TrellisError`] which wraps the
//! error conditions that can occur while loading, editing, and exporting a
//! node diagram.

use std::io;

use thiserror::Error;

/// The main error type for Trellis operations.
///
/// Structural no-ops (connecting or deleting a node that is not owned by the
/// manager, cursor moves with no candidate) are reported through `bool`
/// return values, not through this type; an error here means a snapshot,
/// settings file, or export genuinely failed.
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported body shape type: {0}")]
    UnsupportedShape(String),

    #[error("settings error: {0}")]
    Settings(String),

    #[error("export error: {0}")]
    Export(Box<dyn std::error::Error>),
}
