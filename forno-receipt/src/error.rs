//! Error types for receipt rendering

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Document has nothing to draw
    #[error("Receipt is empty")]
    Empty,

    /// Invalid layout parameters
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// PDF backend failure
    #[error("PDF error: {0}")]
    Pdf(String),
}

/// Result type for receipt operations
pub type ReceiptResult<T> = Result<T, ReceiptError>;
