//! In-memory `RemoteConnection` fake for unit tests.
//!
//! Pages are queued in order; the first query pops the first page, each
//! cursor fetch pops the next. Call counters let tests assert that caches
//! fetch and describe exactly once.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use serde_json::Value;

use sf_connection::{
    Credentials, Error, ErrorKind, FieldMetadata, QueryPage, Record, RemoteConnection, Result,
    SessionHandle,
};

/// Build a record from field/value pairs, preserving field order.
pub(crate) fn record(pairs: &[(&str, Value)]) -> Record {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

#[derive(Default)]
pub(crate) struct MockConnection {
    schemas: HashMap<String, HashMap<String, FieldMetadata>>,
    pages: RefCell<Vec<QueryPage>>,
    queries: RefCell<Vec<String>>,
    next_page_calls: Cell<usize>,
    describe_calls: Cell<usize>,
    created: RefCell<Vec<(String, Record)>>,
    deleted: RefCell<Vec<(String, String)>>,
    fail_auth: bool,
}

impl MockConnection {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_auth() -> Self {
        Self {
            fail_auth: true,
            ..Self::default()
        }
    }

    pub(crate) fn with_schema(
        mut self,
        object_name: &str,
        fields: &[(&str, &str, Option<usize>)],
    ) -> Self {
        let schema = fields
            .iter()
            .map(|(name, field_type, length)| {
                (
                    name.to_string(),
                    FieldMetadata {
                        field_type: field_type.to_string(),
                        length: *length,
                    },
                )
            })
            .collect();
        self.schemas.insert(object_name.to_string(), schema);
        self
    }

    /// A typical Account schema covering every field kind the tests use.
    pub(crate) fn with_account_schema(self) -> Self {
        self.with_schema(
            "Account",
            &[
                ("Id", "id", Some(18)),
                ("Name", "string", Some(80)),
                ("Phone", "phone", Some(40)),
                ("Active__c", "boolean", None),
            ],
        )
    }

    pub(crate) fn with_last_page(self, records: Vec<Record>) -> Self {
        self.pages.borrow_mut().push(QueryPage::last(records));
        self
    }

    pub(crate) fn with_partial_page(self, records: Vec<Record>, cursor: &str) -> Self {
        self.pages
            .borrow_mut()
            .push(QueryPage::partial(records, cursor));
        self
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }

    pub(crate) fn query_calls(&self) -> usize {
        self.queries.borrow().len()
    }

    pub(crate) fn next_page_calls(&self) -> usize {
        self.next_page_calls.get()
    }

    pub(crate) fn describe_calls(&self) -> usize {
        self.describe_calls.get()
    }

    pub(crate) fn created(&self) -> Vec<(String, Record)> {
        self.created.borrow().clone()
    }

    pub(crate) fn deleted(&self) -> Vec<(String, String)> {
        self.deleted.borrow().clone()
    }

    fn pop_page(&self) -> QueryPage {
        let mut pages = self.pages.borrow_mut();
        if pages.is_empty() {
            QueryPage::last(Vec::new())
        } else {
            pages.remove(0)
        }
    }
}

impl RemoteConnection for MockConnection {
    fn authenticate(&self, credentials: &Credentials) -> Result<SessionHandle> {
        if self.fail_auth {
            return Err(Error::new(ErrorKind::Auth(format!(
                "login failed for {}",
                credentials.username()
            ))));
        }
        Ok(SessionHandle::new(
            "session-0001",
            format!("https://{}", credentials.login_host()),
        ))
    }

    fn describe_fields(&self, object_name: &str) -> Result<HashMap<String, FieldMetadata>> {
        self.describe_calls.set(self.describe_calls.get() + 1);
        self.schemas
            .get(object_name)
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::Describe(format!("no such object {object_name}"))))
    }

    fn query_first_page(&self, soql: &str) -> Result<QueryPage> {
        self.queries.borrow_mut().push(soql.to_string());
        Ok(self.pop_page())
    }

    fn query_next_page(&self, _cursor: &str) -> Result<QueryPage> {
        self.next_page_calls.set(self.next_page_calls.get() + 1);
        Ok(self.pop_page())
    }

    fn create(&self, object_name: &str, fields: &Record) -> Result<String> {
        let mut created = self.created.borrow_mut();
        created.push((object_name.to_string(), fields.clone()));
        Ok(format!("001A00000000{:03}IAS", created.len()))
    }

    fn update(&self, _object_name: &str, _id: &str, _fields: &Record) -> Result<()> {
        Ok(())
    }

    fn upsert(
        &self,
        object_name: &str,
        _external_id_field: &str,
        _value: &str,
        fields: &Record,
    ) -> Result<String> {
        self.create(object_name, fields)
    }

    fn delete(&self, object_name: &str, id: &str) -> Result<()> {
        self.deleted
            .borrow_mut()
            .push((object_name.to_string(), id.to_string()));
        Ok(())
    }
}
