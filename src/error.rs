//! Error types for the chat widget

use thiserror::Error;

/// Result type alias for widget operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the chat widget
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio device error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Endpoint replied with a non-2xx status; `detail` carries the
    /// server-supplied error text when the body had one
    #[error("endpoint error {status}: {}", detail.as_deref().unwrap_or("<no detail>"))]
    Endpoint {
        /// HTTP status code
        status: u16,
        /// Server-supplied `error` field, if present
        detail: Option<String>,
    },

    /// Transport-level failure: no response at all
    #[error("connection error: {0}")]
    Connection(String),

    /// Response body was not valid JSON or lacked the expected field
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
