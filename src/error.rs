//! Error types for the weather tool service

use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, WeatherServiceError>;

#[derive(Error, Debug)]
pub enum WeatherServiceError {

    // =============================
    // Core Service Errors
    // =============================

    /// The external weather call failed (network error or non-success
    /// response). Never retried; never followed by a history write.
    #[error("Weather provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider replied successfully but omitted expected fields or
    /// returned mismatched array lengths for forecast data.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid tool input: {0}")]
    InvalidToolInput(String),

    #[error("View provider not found: {0}")]
    ViewNotFound(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
