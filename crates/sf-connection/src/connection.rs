//! The `RemoteConnection` trait: everything the core needs from the remote
//! object/record API.
//!
//! Implementations own the transport (HTTP, SOAP, in-memory fake); this
//! crate deliberately ships none. All calls are synchronous and blocking —
//! pagination loops in the core are sequential, and retry/backoff policy is
//! the implementation's concern, not the core's.

use std::collections::HashMap;

use crate::credentials::Credentials;
use crate::error::Result;
use crate::types::{FieldMetadata, QueryPage, Record, SessionHandle};

/// Capability boundary to the remote CRM platform.
pub trait RemoteConnection {
    /// Authenticate the configured connection.
    ///
    /// Fails with `ErrorKind::Auth`; a failed authentication is fatal to the
    /// caller.
    fn authenticate(&self, credentials: &Credentials) -> Result<SessionHandle>;

    /// Describe the fields of a remote object: field name to metadata.
    fn describe_fields(&self, object_name: &str) -> Result<HashMap<String, FieldMetadata>>;

    /// Execute a query and return its first page.
    fn query_first_page(&self, soql: &str) -> Result<QueryPage>;

    /// Fetch the page behind a cursor returned by an earlier page.
    fn query_next_page(&self, cursor: &str) -> Result<QueryPage>;

    /// Create a record, returning its new id.
    fn create(&self, object_name: &str, fields: &Record) -> Result<String>;

    /// Update the record with the given id.
    fn update(&self, object_name: &str, id: &str, fields: &Record) -> Result<()>;

    /// Create or update a record keyed on an external id field, returning
    /// the record's id.
    fn upsert(
        &self,
        object_name: &str,
        external_id_field: &str,
        value: &str,
        fields: &Record,
    ) -> Result<String>;

    /// Delete the record with the given id.
    fn delete(&self, object_name: &str, id: &str) -> Result<()>;
}
