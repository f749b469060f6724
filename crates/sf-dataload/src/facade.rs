//! Connection facade: one authenticated session plus its registry of
//! record caches.
//!
//! The registry is explicit per-facade state, so several independent
//! sessions can coexist in one process. Re-caching an object name fully
//! replaces the prior cache, indexes included.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use sf_connection::{Credentials, Record, RemoteConnection, SessionHandle};

use crate::cache::{query_all_pages, RecordCache};
use crate::error::{Error, ErrorKind, Result};

/// An authenticated connection to one remote org, with a registry of
/// cached objects keyed by object name.
pub struct Salesforce {
    connection: Arc<dyn RemoteConnection>,
    session: SessionHandle,
    sandbox: bool,
    objects: HashMap<String, RecordCache>,
}

impl std::fmt::Debug for Salesforce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Salesforce")
            .field("sandbox", &self.sandbox)
            .finish_non_exhaustive()
    }
}

impl Salesforce {
    /// Authenticate and build a facade over the given connection.
    ///
    /// A failed authentication is fatal: no facade is returned.
    #[instrument(skip(connection, credentials), fields(username = %credentials.username()))]
    pub fn connect(
        connection: Arc<dyn RemoteConnection>,
        credentials: &Credentials,
    ) -> Result<Self> {
        let session = connection.authenticate(credentials)?;
        info!(username = %credentials.username(), sandbox = credentials.is_sandbox(), "Authenticated");
        Ok(Self {
            connection,
            session,
            sandbox: credentials.is_sandbox(),
            objects: HashMap::new(),
        })
    }

    /// The session handle returned by authentication.
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Whether this facade is connected to a sandbox org.
    pub fn is_sandbox(&self) -> bool {
        self.sandbox
    }

    /// Cache all records of an object, eagerly fetching every page.
    ///
    /// `object_spec` is `"ObjectName"` or `"ObjectName where <scope>"`;
    /// `query_fields` limits the fetched columns (`Id` is always included).
    /// Replaces any existing cache for that object name.
    #[instrument(skip(self, query_fields))]
    pub fn cache(&mut self, object_spec: &str, query_fields: &[&str]) -> Result<&mut RecordCache> {
        let (object_name, scope) = split_object_spec(object_spec);
        debug!(object = object_name, scope, "Caching object");

        let mut cache = RecordCache::new(
            Arc::clone(&self.connection),
            object_name,
            scope,
            query_fields,
        );
        cache.records()?;

        match self.objects.entry(object_name.to_string()) {
            Entry::Occupied(mut slot) => {
                slot.insert(cache);
                Ok(slot.into_mut())
            }
            Entry::Vacant(slot) => Ok(slot.insert(cache)),
        }
    }

    /// Register an object for schema access without fetching its records.
    ///
    /// Returns the existing cache when the object is already registered.
    pub fn describe(&mut self, object_name: &str) -> Result<&mut RecordCache> {
        if let Entry::Vacant(slot) = self.objects.entry(object_name.to_string()) {
            slot.insert(RecordCache::new(
                Arc::clone(&self.connection),
                object_name,
                "",
                &[],
            ));
        }
        self.object(object_name)
    }

    /// The cache for a previously cached or described object.
    ///
    /// Fails with `UnknownObject` for a name never registered.
    pub fn object(&mut self, object_name: &str) -> Result<&mut RecordCache> {
        self.objects
            .get_mut(object_name)
            .ok_or_else(|| Error::new(ErrorKind::UnknownObject(object_name.to_string())))
    }

    /// Cache an object and write its records to a backup file.
    pub fn backup(&mut self, object_spec: &str, query_fields: &[&str]) -> Result<Option<PathBuf>> {
        self.cache(object_spec, query_fields)?.backup()
    }

    /// Execute an ad-hoc query, fetching every page.
    pub fn query(&self, soql: &str) -> Result<Vec<Record>> {
        query_all_pages(self.connection.as_ref(), soql)
    }

    /// Create a record, returning its new id.
    #[instrument(skip(self, fields))]
    pub fn insert(&self, object_name: &str, fields: &Record) -> Result<String> {
        Ok(self.connection.create(object_name, fields)?)
    }

    /// Update the record with the given id.
    #[instrument(skip(self, fields))]
    pub fn update(&self, object_name: &str, id: &str, fields: &Record) -> Result<()> {
        Ok(self.connection.update(object_name, id, fields)?)
    }

    /// Create or update a record keyed on an external id field.
    #[instrument(skip(self, fields))]
    pub fn upsert(
        &self,
        object_name: &str,
        external_id_field: &str,
        value: &str,
        fields: &Record,
    ) -> Result<String> {
        Ok(self
            .connection
            .upsert(object_name, external_id_field, value, fields)?)
    }

    /// Delete the record with the given id.
    #[instrument(skip(self))]
    pub fn delete(&self, object_name: &str, id: &str) -> Result<()> {
        Ok(self.connection.delete(object_name, id)?)
    }
}

/// Split `"ObjectName where <scope>"` into name and scope; the scope is
/// empty when absent.
fn split_object_spec(object_spec: &str) -> (&str, &str) {
    match object_spec.split_once(" where ") {
        Some((object_name, scope)) => (object_name, scope),
        None => (object_spec, ""),
    }
}
