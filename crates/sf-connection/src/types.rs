//! Common types shared across the connection boundary.

use serde::{Deserialize, Serialize};

/// One remote record: field name to untyped scalar value.
///
/// The `Id` field is canonically an 18-character string; its 15-character
/// case-sensitive prefix refers to the same record.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Wire shape of one field description from the remote schema.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldMetadata {
    /// Field type name as reported by the remote platform
    /// (e.g. "string", "textarea", "boolean", "phone", "id").
    #[serde(rename = "type")]
    pub field_type: String,

    /// Maximum length in characters, for length-limited types.
    pub length: Option<usize>,
}

impl FieldMetadata {
    /// Convenience constructor for a typed field with no length limit.
    pub fn of_type(field_type: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            length: None,
        }
    }

    /// Convenience constructor for a length-limited field.
    pub fn with_length(field_type: impl Into<String>, length: usize) -> Self {
        Self {
            field_type: field_type.into(),
            length: Some(length),
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryPage {
    /// The records in this page, in query order.
    pub records: Vec<Record>,

    /// Whether this is the last page.
    pub done: bool,

    /// Cursor for fetching the next page. Present when `done` is false.
    pub cursor: Option<String>,
}

impl QueryPage {
    /// A final page holding the given records.
    pub fn last(records: Vec<Record>) -> Self {
        Self {
            records,
            done: true,
            cursor: None,
        }
    }

    /// A non-final page with a cursor to the next one.
    pub fn partial(records: Vec<Record>, cursor: impl Into<String>) -> Self {
        Self {
            records,
            done: false,
            cursor: Some(cursor.into()),
        }
    }
}

/// Opaque proof of a successful authentication.
///
/// The session id is redacted in Debug output.
#[derive(Clone)]
pub struct SessionHandle {
    session_id: String,
    server_url: String,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("session_id", &"[REDACTED]")
            .field("server_url", &self.server_url)
            .finish()
    }
}

impl SessionHandle {
    /// Create a new session handle.
    pub fn new(session_id: impl Into<String>, server_url: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            server_url: server_url.into(),
        }
    }

    /// Get the session id.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Get the server URL the session is bound to.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}
