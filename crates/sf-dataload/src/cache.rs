//! In-memory record cache and lookup engine for one remote object.
//!
//! A [`RecordCache`] holds every record fetched for one object type and
//! answers repeated lookups from lazily built indexes. Records are fetched
//! once (paginated, in fetch order) and frozen; an index for a given set of
//! criteria fields is built at most once and never invalidated afterward.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument};

use sf_connection::{RemoteConnection, Record};

use crate::error::{Error, ErrorKind, Result};
use crate::field::{scalar_to_string, FieldDescriptor};

/// Separator joining per-field lookup keys into one index key.
const KEY_SEPARATOR: &str = "|";

/// Default directory for backup files.
const BACKUP_DIR: &str = "backup";

/// Lookup criteria: ordered field-name/value pairs.
pub type Criteria = [(String, Value)];

/// One lazily built index over the cached records.
///
/// Identified by the sorted set of its field names; `key_order` preserves
/// the criteria order first seen for that set so index-side and query-side
/// keys join consistently.
struct LookupIndex {
    key_order: Vec<String>,
    buckets: HashMap<String, Vec<usize>>,
}

/// All fetched records for one remote object type, with lazy schema
/// resolution and lazy per-criteria-set indexes.
pub struct RecordCache {
    connection: Arc<dyn RemoteConnection>,
    object_name: String,
    scope: String,
    query_fields: Vec<String>,
    records: Option<Vec<Record>>,
    descriptors: Option<HashMap<String, FieldDescriptor>>,
    indexes: HashMap<Vec<String>, LookupIndex>,
}

impl std::fmt::Debug for RecordCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordCache")
            .field("object_name", &self.object_name)
            .field("scope", &self.scope)
            .field("query_fields", &self.query_fields)
            .finish_non_exhaustive()
    }
}

impl RecordCache {
    pub(crate) fn new(
        connection: Arc<dyn RemoteConnection>,
        object_name: impl Into<String>,
        scope: impl Into<String>,
        query_fields: &[&str],
    ) -> Self {
        Self {
            connection,
            object_name: object_name.into(),
            scope: scope.into(),
            query_fields: query_fields.iter().map(|f| f.to_string()).collect(),
            records: None,
            descriptors: None,
            indexes: HashMap::new(),
        }
    }

    /// The remote object name this cache holds.
    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    /// The optional scope clause restricting which records are fetched.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// All records for this object, fetching every page on first call.
    ///
    /// Subsequent calls return the memoized sequence without refetching.
    /// Fetch failures propagate; there is no retry at this layer.
    pub fn records(&mut self) -> Result<&[Record]> {
        self.ensure_records()?;
        Ok(self.records.as_deref().unwrap_or_default())
    }

    /// Look up records matching the given criteria.
    ///
    /// Builds an index for the criteria's field-name set if one does not
    /// exist yet. Returns no records, exactly one, or all ambiguous matches;
    /// "not found" is an empty result, never an error. Criteria values are
    /// passed through each field's lookup conversion, so id fields match on
    /// their 15-character prefix whether the criteria carry 15- or 18-char
    /// ids.
    pub fn find_where(&mut self, criteria: &Criteria) -> Result<Vec<&Record>> {
        self.ensure_records()?;
        for (name, _) in criteria {
            self.describe_field(name)?;
        }

        let mut field_set: Vec<String> = criteria.iter().map(|(name, _)| name.clone()).collect();
        field_set.sort();

        if !self.indexes.contains_key(&field_set) {
            let index = self.build_index(criteria);
            debug!(
                object = %self.object_name,
                fields = ?field_set,
                buckets = index.buckets.len(),
                "Built lookup index"
            );
            self.indexes.insert(field_set.clone(), index);
        }

        let records = self.records.as_deref().unwrap_or_default();
        let Some(index) = self.indexes.get(&field_set) else {
            return Ok(Vec::new());
        };
        let Some(descriptors) = self.descriptors.as_ref() else {
            return Ok(Vec::new());
        };

        // Query-side key joins values in the index's stored key order, with
        // the same per-field conversion used at index build time.
        let key = join_key(&index.key_order, descriptors, |name| {
            criteria
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone())
                .unwrap_or(Value::Null)
        });

        Ok(index
            .buckets
            .get(&key)
            .map(|positions| positions.iter().map(|&i| &records[i]).collect())
            .unwrap_or_default())
    }

    /// Distinct lookup values of one field across all records.
    ///
    /// Null and empty values are skipped; duplicates collapse on the
    /// field's lookup key. Result order is not guaranteed.
    pub fn distinct_values(&mut self, field_name: &str) -> Result<Vec<Value>> {
        self.ensure_records()?;
        let descriptor = self.describe_field(field_name)?.clone();

        let mut seen = std::collections::HashSet::new();
        let mut values = Vec::new();
        for record in self.records.as_deref().unwrap_or_default() {
            let raw = record.get(field_name).unwrap_or(&Value::Null);
            if raw.is_null() || raw.as_str() == Some("") {
                continue;
            }
            let value = descriptor.lookup_value(raw);
            if seen.insert(descriptor.lookup_key(raw)) {
                values.push(value);
            }
        }
        Ok(values)
    }

    /// The conversion descriptor for one field, resolving the remote schema
    /// lazily on first use.
    pub fn describe_field(&mut self, field_name: &str) -> Result<&FieldDescriptor> {
        self.ensure_descriptors()?;
        self.descriptors
            .as_ref()
            .and_then(|descriptors| descriptors.get(field_name))
            .ok_or_else(|| {
                Error::new(ErrorKind::UnknownField {
                    object: self.object_name.clone(),
                    field: field_name.to_string(),
                })
            })
    }

    /// Write all cached records to a timestamped CSV file under `backup/`.
    ///
    /// Returns `None` when the cache holds zero records.
    pub fn backup(&mut self) -> Result<Option<PathBuf>> {
        self.backup_to(Path::new(BACKUP_DIR))
    }

    /// Write all cached records to a timestamped CSV file under `dir`,
    /// creating the directory if absent.
    ///
    /// The header is the first record's full attribute set, or `Id`
    /// followed by the requested fields when a field subset was configured.
    /// One data row per record, in fetch order.
    #[instrument(skip(self, dir), fields(object = %self.object_name))]
    pub fn backup_to(&mut self, dir: &Path) -> Result<Option<PathBuf>> {
        self.ensure_records()?;
        let records = match self.records.as_deref() {
            Some(records) if !records.is_empty() => records,
            _ => return Ok(None),
        };

        std::fs::create_dir_all(dir)?;
        let filename = dir.join(format!(
            "backup-{}-{}.csv",
            self.object_name.to_lowercase(),
            chrono::Local::now().format("%F-%H%M")
        ));

        let fields: Vec<String> = if self.query_fields.is_empty() {
            records[0].keys().cloned().collect()
        } else {
            std::iter::once("Id".to_string())
                .chain(self.query_fields.iter().cloned())
                .collect()
        };

        let mut writer = csv::Writer::from_path(&filename)?;
        writer.write_record(&fields)?;
        for record in records {
            writer.write_record(
                fields
                    .iter()
                    .map(|field| scalar_to_string(record.get(field).unwrap_or(&Value::Null))),
            )?;
        }
        writer.flush()?;

        info!(object = %self.object_name, path = %filename.display(), rows = records.len(), "Backup written");
        Ok(Some(filename))
    }

    fn ensure_records(&mut self) -> Result<()> {
        if self.records.is_some() {
            return Ok(());
        }
        let records = self.fetch_all()?;
        self.records = Some(records);
        Ok(())
    }

    fn ensure_descriptors(&mut self) -> Result<()> {
        if self.descriptors.is_some() {
            return Ok(());
        }
        let fields = self.connection.describe_fields(&self.object_name)?;
        self.descriptors = Some(
            fields
                .into_iter()
                .map(|(name, metadata)| (name, FieldDescriptor::from_metadata(&metadata)))
                .collect(),
        );
        Ok(())
    }

    #[instrument(skip(self), fields(object = %self.object_name))]
    fn fetch_all(&mut self) -> Result<Vec<Record>> {
        self.ensure_descriptors()?;

        let field_list: Vec<String> = if self.query_fields.is_empty() {
            let mut names: Vec<String> = self
                .descriptors
                .as_ref()
                .map(|descriptors| descriptors.keys().cloned().collect())
                .unwrap_or_default();
            names.sort();
            names
        } else {
            std::iter::once("Id".to_string())
                .chain(self.query_fields.iter().cloned())
                .collect()
        };

        let mut soql = format!("SELECT {} FROM {}", field_list.join(", "), self.object_name);
        if !self.scope.is_empty() {
            soql.push_str(" WHERE ");
            soql.push_str(&self.scope);
        }
        debug!(soql = %soql, "Fetching all records");

        query_all_pages(self.connection.as_ref(), &soql)
    }

    fn build_index(&self, criteria: &Criteria) -> LookupIndex {
        let key_order: Vec<String> = criteria.iter().map(|(name, _)| name.clone()).collect();
        let mut buckets: HashMap<String, Vec<usize>> = HashMap::new();

        if let (Some(records), Some(descriptors)) = (&self.records, &self.descriptors) {
            for (position, record) in records.iter().enumerate() {
                let key = join_key(&key_order, descriptors, |name| {
                    record.get(name).cloned().unwrap_or(Value::Null)
                });
                // Records with an entirely empty key are unmatchable by
                // construction and stay out of the index.
                if key.is_empty() {
                    continue;
                }
                buckets.entry(key).or_default().push(position);
            }
        }

        LookupIndex { key_order, buckets }
    }
}

/// Join per-field lookup keys into one index key, in `key_order`.
fn join_key(
    key_order: &[String],
    descriptors: &HashMap<String, FieldDescriptor>,
    mut value_of: impl FnMut(&str) -> Value,
) -> String {
    key_order
        .iter()
        .map(|name| {
            descriptors
                .get(name)
                .map(|descriptor| descriptor.lookup_key(&value_of(name)))
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}

/// Execute a query and fetch every page, accumulating records in fetch
/// order. Blocks until the full result set is in memory.
pub(crate) fn query_all_pages(
    connection: &dyn RemoteConnection,
    soql: &str,
) -> Result<Vec<Record>> {
    let mut result = connection.query_first_page(soql)?;
    let mut all_records = Vec::new();
    all_records.extend(result.records);

    while !result.done {
        let cursor = result.cursor.clone().ok_or_else(|| {
            Error::new(ErrorKind::Connection(
                "unfinished query page returned no cursor".to_string(),
            ))
        })?;
        result = connection.query_next_page(&cursor)?;
        all_records.extend(result.records);
    }

    Ok(all_records)
}
