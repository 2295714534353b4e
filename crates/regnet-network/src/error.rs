//! Error types for network expansion

use thiserror::Error;

/// Errors that can occur while building a company network
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),
}
