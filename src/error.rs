//! Error types for terminal lifecycle operations
//!
//! Byte-stream parsing never fails; these errors only come out of
//! construction, resize, colorscheme and config loading.

use std::io;
use thiserror::Error;

/// Terminal error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Zero-sized grid requested
    #[error("Invalid terminal dimensions: {cols}x{rows}")]
    InvalidDimensions { cols: usize, rows: usize },

    /// Buffer allocation failed
    #[error("Failed to allocate {what}: {cells} cells")]
    Allocation { what: &'static str, cells: usize },

    /// Malformed color value
    #[error("Invalid color value: {0}")]
    InvalidColor(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Config (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for terminal operations
pub type Result<T> = std::result::Result<T, Error>;
