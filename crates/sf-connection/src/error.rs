//! Error types for sf-connection.
//!
//! Error messages are designed to avoid exposing sensitive credential data.

/// Result type alias for sf-connection operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sf-connection operations.
///
/// Error messages are sanitized to prevent accidental credential exposure.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Auth(_))
    }
}

/// The kind of error that occurred.
///
/// Error messages avoid including credential values.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Authentication against the remote platform failed.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Error response from the remote platform.
    #[error("Remote error: {code} - {message}")]
    Remote { code: String, message: String },

    /// A pagination cursor was rejected by the remote platform.
    #[error("Invalid query cursor: {0}")]
    InvalidCursor(String),

    /// Object schema description failed.
    #[error("Describe error: {0}")]
    Describe(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}
