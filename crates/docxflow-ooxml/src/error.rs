//! Error types for body emission

use thiserror::Error;

/// Errors that can occur while emitting a WordprocessingML fragment
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// A block was closed while none was open
    #[error("Structural underflow: no open block to close")]
    BlockUnderflow,

    /// A span was closed while none was open
    #[error("Structural underflow: no open span to close")]
    SpanUnderflow,

    /// A list was closed while none was open
    #[error("Structural underflow: no open list to close")]
    ListUnderflow,

    /// A table, row or cell was closed while none was open
    #[error("Structural underflow: no open table to close")]
    TableUnderflow,

    /// The output sink was asked to pop its base target
    #[error("Structural underflow: output sink has no buffered target")]
    SinkUnderflow,

    /// Output was taken while a table buffer was still pushed
    #[error("Unclosed table: {0} buffered target(s) still open")]
    UnclosedTable(usize),

    /// Malformed RFC 2397 data URL
    #[error("Data URL error: {0}")]
    DataUrl(#[from] DataUrlError),

    /// Image bytes could not be measured
    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Remote image could not be fetched
    #[error("Image fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    /// Neither explicit nor intrinsic image size is known
    #[error("Image size unknown: {0}")]
    MissingDimensions(String),

    /// Error reading files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML configuration error
    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON event script error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while decoding an RFC 2397 data URL
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataUrlError {
    /// No comma separates the header from the payload
    #[error("missing ',' between media type and data")]
    MissingComma,

    /// The media type or its parameters are malformed
    #[error("invalid media type: {0}")]
    InvalidMediaType(String),

    /// The charset parameter names an encoding we cannot decode
    #[error("unsupported charset: {0}")]
    UnsupportedCharset(String),

    /// The payload is flagged base64 but does not decode
    #[error("invalid base64 payload: {0}")]
    Base64(String),
}

/// Result type for emitter operations
pub type Result<T> = std::result::Result<T, OoxmlError>;
