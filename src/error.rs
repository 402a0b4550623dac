//! Error types for palette extraction.

use thiserror::Error;

/// Failure while building a [`ColorTable`](crate::ColorTable).
///
/// These are startup-time errors: a service should refuse traffic until the
/// table loads.
#[derive(Debug, Error)]
pub enum ReferenceTableError {
    #[error("reference table is empty")]
    Empty,

    #[error("failed to read reference table: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse reference table: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid hex color {value:?} for {name:?}")]
    InvalidHex { name: String, value: String },
}

/// Unified error type for [`extract_palette`](crate::extract_palette).
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input bytes are empty, corrupt or in a format we cannot read.
    #[error("unable to decode image: {0}")]
    Decode(String),

    #[error("{name} must be between {min} and {max}, got {value}")]
    InvalidParameter {
        name: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    /// The image decoded but has no pixels to cluster.
    #[error("insufficient image data: {0}")]
    InsufficientData(String),

    #[error("reference table error: {0}")]
    ReferenceTable(#[from] ReferenceTableError),
}

impl ExtractError {
    /// Stable machine-readable code for response envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            ExtractError::Decode(_) => "decode_error",
            ExtractError::InvalidParameter { .. } => "invalid_parameter",
            ExtractError::InsufficientData(_) => "insufficient_data",
            ExtractError::ReferenceTable(_) => "reference_table_error",
        }
    }

    /// True when the caller supplied bad input (HTTP 400 class), false for
    /// internal failures (HTTP 500 class).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ExtractError::ReferenceTable(_))
    }
}

impl From<image::ImageError> for ExtractError {
    fn from(err: image::ImageError) -> Self {
        ExtractError::Decode(err.to_string())
    }
}
