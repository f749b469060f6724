//! Error types for sf-dataload.
//!
//! Conversion and matching errors propagate to the caller; the CSV row
//! pipeline expects callers to catch `DataValidation` per row, record it
//! through the problem reporter, and continue with the next row.

/// Result type alias for sf-dataload operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sf-dataload operations.
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

    /// Returns true if this is a per-row data validation error, the kind a
    /// batch caller records and skips rather than aborting on.
    pub fn is_data_validation(&self) -> bool {
        matches!(self.kind, ErrorKind::DataValidation { .. })
    }

    /// Returns true if a mandatory lookup found no record.
    pub fn is_no_match(&self) -> bool {
        matches!(self.kind, ErrorKind::NoMatch { .. })
    }

    /// Returns true if a lookup matched more than one record.
    pub fn is_ambiguous_match(&self) -> bool {
        matches!(self.kind, ErrorKind::AmbiguousMatch { .. })
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// An input value failed type-aware conversion or derivation.
    #[error("{reason}{}", value.as_ref().map(|v| format!(": {v}")).unwrap_or_default())]
    DataValidation {
        reason: String,
        /// The offending value, when one exists.
        value: Option<String>,
    },

    /// A mandatory lookup resolved no record.
    #[error("No Matching {object}{}", label.as_ref().map(|l| format!(" - {l}")).unwrap_or_default())]
    NoMatch {
        object: String,
        label: Option<String>,
    },

    /// Lookup criteria matched more than one record.
    #[error("Multiple Matching {object}s: {criteria}")]
    AmbiguousMatch { object: String, criteria: String },

    /// Access to an object name that was never cached or described.
    #[error("No object named {0}")]
    UnknownObject(String),

    /// A field name absent from the object's remote schema.
    #[error("No field named {field} on {object}")]
    UnknownField { object: String, field: String },

    /// Passthrough from the remote connection, not interpreted here.
    #[error("Connection error: {0}")]
    Connection(String),

    /// CSV read/write error.
    #[error("CSV error: {0}")]
    Csv(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),
}

impl ErrorKind {
    /// A data-validation error carrying the offending value.
    pub fn data_validation(reason: impl Into<String>, value: impl Into<String>) -> Self {
        ErrorKind::DataValidation {
            reason: reason.into(),
            value: Some(value.into()),
        }
    }
}

impl From<sf_connection::Error> for Error {
    fn from(err: sf_connection::Error) -> Self {
        Error::with_source(ErrorKind::Connection(err.to_string()), err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::with_source(ErrorKind::Csv(err.to_string()), err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(ErrorKind::Io(err.to_string()), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_validation_carries_value() {
        let err = Error::new(ErrorKind::data_validation("Invalid Boolean type", "perhaps"));
        assert!(err.is_data_validation());
        assert_eq!(err.to_string(), "Invalid Boolean type: perhaps");
    }

    #[test]
    fn test_no_match_display_includes_label() {
        let err = Error::new(ErrorKind::NoMatch {
            object: "Account".into(),
            label: Some("Primary".into()),
        });
        assert!(err.is_no_match());
        assert_eq!(err.to_string(), "No Matching Account - Primary");

        let err = Error::new(ErrorKind::NoMatch {
            object: "Account".into(),
            label: None,
        });
        assert_eq!(err.to_string(), "No Matching Account");
    }

    #[test]
    fn test_ambiguous_match_display_names_criteria() {
        let err = Error::new(ErrorKind::AmbiguousMatch {
            object: "Contact".into(),
            criteria: "Email=a@b.com".into(),
        });
        assert!(err.is_ambiguous_match());
        assert!(err.to_string().contains("Multiple Matching Contacts"));
        assert!(err.to_string().contains("Email=a@b.com"));
    }

    #[test]
    fn test_from_connection_error() {
        let remote = sf_connection::Error::new(sf_connection::ErrorKind::Auth("denied".into()));
        let err: Error = remote.into();
        assert!(matches!(err.kind, ErrorKind::Connection(_)));
        assert!(err.source.is_some());
    }

    #[test]
    fn test_from_io_error() {
        let err: Error = std::io::Error::other("disk full").into();
        assert!(matches!(err.kind, ErrorKind::Io(_)));
    }
}
