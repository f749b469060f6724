//! # sf-dataload
//!
//! In-memory record cache, indexed lookup and CSV conversion engine for
//! loading data into a remote CRM platform.
//!
//! The crate mediates access to the platform's object/record API through
//! the [`sf_connection::RemoteConnection`] capability: it authenticates a
//! configured connection, materializes remote object schemas, fetches
//! query results with pagination, and answers repeated lookups from lazy
//! in-memory indexes. A type-aware conversion layer turns CSV input into
//! values compatible with remote field types, reporting per-row problems
//! instead of failing the whole batch.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sf_connection::Credentials;
//! use sf_dataload::{MatchTemplate, MatchValue, RecordIdMatcher, Salesforce};
//!
//! let credentials = Credentials::new("user@example.com", "pw", Some("token".into()), false);
//! let mut sf = Salesforce::connect(Arc::new(transport), &credentials)?;
//!
//! // Cache an object and look records up without further round trips.
//! sf.cache("Account where Active__c = true", &["Name", "Phone"])?;
//! let matches = sf.object("Account")?
//!     .find_where(&[("Name".into(), "Acme".into())])?;
//!
//! // Resolve foreign-key ids with fallback criteria.
//! let matcher = RecordIdMatcher::new(
//!     "Account",
//!     vec![MatchTemplate::new().with("Name", MatchValue::derived(|row| row.get("account")))],
//! );
//! ```

mod address;
mod cache;
mod error;
mod facade;
mod field;
mod matcher;
mod reporter;
mod row;

#[cfg(test)]
pub(crate) mod testing;

pub use address::{address_name, address_name_parts};
pub use cache::{Criteria, RecordCache};
pub use error::{Error, ErrorKind, Result};
pub use facade::Salesforce;
pub use field::{FieldDescriptor, FieldKind};
pub use matcher::{MatchTemplate, MatchValue, RecordIdMatcher};
pub use reporter::{CsvProblemReporter, ProblemKind};
pub use row::ConvertibleCsvRow;

// Re-export the connection boundary types users implement against.
pub use sf_connection::{
    Credentials, FieldMetadata, QueryPage, Record, RemoteConnection, SessionHandle,
};
