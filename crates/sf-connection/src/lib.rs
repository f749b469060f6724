//! # sf-connection
//!
//! The remote-connection capability boundary consumed by `sf-dataload`.
//!
//! This crate defines WHAT the data-loading core needs from a remote CRM
//! platform — authentication, schema description, paginated queries and
//! record CRUD — as the [`RemoteConnection`] trait, plus the types that
//! cross that boundary. It contains no transport: production code plugs in
//! an HTTP/SOAP client, tests plug in an in-memory fake.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sf_connection::{Credentials, RemoteConnection};
//!
//! let connection = MyTransport::new(/* ... */);
//! let credentials = Credentials::new("user@example.com", "pw", Some("token".into()), false);
//! let session = connection.authenticate(&credentials)?;
//! let page = connection.query_first_page("SELECT Id, Name FROM Account")?;
//! ```

mod connection;
mod credentials;
mod error;
mod types;

pub use connection::RemoteConnection;
pub use credentials::Credentials;
pub use error::{Error, ErrorKind, Result};
pub use types::{FieldMetadata, QueryPage, Record, SessionHandle};
