//! One tabular input row on its way to a remote object.
//!
//! A [`ConvertibleCsvRow`] wraps a CSV row, converts its configured columns
//! through the owning cache's field descriptors, and appends the converted
//! values to an output sink. Programmatically set values live in an overlay;
//! the underlying row is never mutated.

use std::collections::HashMap;
use std::io::Write;

use serde_json::Value;

use crate::cache::RecordCache;
use crate::error::Result;
use crate::field::scalar_to_string;

/// One input row, its conversion configuration and overlay state.
pub struct ConvertibleCsvRow {
    headers: Vec<String>,
    row: HashMap<String, String>,
    index: usize,
    columns: Vec<String>,
    settable_attributes: Vec<String>,
    overlay: HashMap<String, Value>,
    converted: u32,
}

impl ConvertibleCsvRow {
    /// Wrap a header/value row.
    ///
    /// `columns` are converted (in order) by [`convert`](Self::convert);
    /// `settable_attributes` are cleared in the overlay after each
    /// successful conversion.
    pub fn new(
        headers: Vec<String>,
        values: Vec<String>,
        index: usize,
        columns: Vec<String>,
        settable_attributes: Vec<String>,
    ) -> Self {
        let row = headers.iter().cloned().zip(values).collect();
        Self {
            headers,
            row,
            index,
            columns,
            settable_attributes,
            overlay: HashMap::new(),
            converted: 0,
        }
    }

    /// Wrap one record from a `csv` reader.
    pub fn from_csv_record(
        headers: &csv::StringRecord,
        record: &csv::StringRecord,
        index: usize,
        columns: Vec<String>,
        settable_attributes: Vec<String>,
    ) -> Self {
        Self::new(
            headers.iter().map(str::to_string).collect(),
            record.iter().map(str::to_string).collect(),
            index,
            columns,
            settable_attributes,
        )
    }

    /// Position of this row in its input file.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Column names of the underlying row, in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The value for a column: the overlay value when one was set,
    /// otherwise the original row value. Unknown columns read as null.
    pub fn get(&self, key: &str) -> Value {
        if let Some(value) = self.overlay.get(key) {
            return value.clone();
        }
        self.row
            .get(key)
            .map(|s| Value::String(s.clone()))
            .unwrap_or(Value::Null)
    }

    /// Set a column value in the overlay. The underlying row is untouched.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.overlay.insert(key.into(), value);
    }

    /// Whether [`convert`](Self::convert) has succeeded at least once.
    pub fn is_converted(&self) -> bool {
        self.converted > 0
    }

    /// How many times this row has been converted.
    pub fn conversion_count(&self) -> u32 {
        self.converted
    }

    /// Convert the configured columns and append them as one record to the
    /// sink.
    ///
    /// Each column's value is converted through its field descriptor from
    /// the owning cache, in column order. On success the conversion counter
    /// increments and every settable attribute is cleared to null in the
    /// overlay. A conversion failure leaves the sink and counter untouched
    /// and propagates, so a batch caller can report it and move on.
    pub fn convert<W: Write>(
        &mut self,
        object: &mut RecordCache,
        out: &mut csv::Writer<W>,
    ) -> Result<()> {
        let mut fields = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let descriptor = object.describe_field(column)?;
            fields.push(descriptor.convert(&self.get(column))?);
        }

        out.write_record(fields.iter().map(scalar_to_string))?;
        self.converted += 1;

        for column in self.settable_attributes.clone() {
            self.set(column, Value::Null);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::Salesforce;
    use crate::testing::MockConnection;
    use serde_json::json;
    use sf_connection::Credentials;
    use std::sync::Arc;

    fn account_facade() -> Salesforce {
        let connection = Arc::new(
            MockConnection::new()
                .with_schema(
                    "Account",
                    &[
                        ("Id", "id", Some(18)),
                        ("one", "string", None),
                        ("two", "string", Some(1)),
                        ("Active__c", "boolean", None),
                    ],
                )
                .with_last_page(vec![]),
        );
        let credentials = Credentials::new("user@example.com", "pw", None, false);
        let mut sf = Salesforce::connect(connection, &credentials).unwrap();
        sf.describe("Account").unwrap();
        sf
    }

    fn row(columns: &[&str], settable: &[&str]) -> ConvertibleCsvRow {
        ConvertibleCsvRow::new(
            vec!["one".into(), "two".into()],
            vec!["One".into(), "Two".into()],
            0,
            columns.iter().map(|c| c.to_string()).collect(),
            settable.iter().map(|c| c.to_string()).collect(),
        )
    }

    #[test]
    fn test_get_prefers_overlay_over_row() {
        let mut row = row(&[], &[]);
        assert_eq!(row.get("one"), json!("One"));
        row.set("one", json!("Overridden"));
        assert_eq!(row.get("one"), json!("Overridden"));
        assert_eq!(row.get("two"), json!("Two"));
        assert_eq!(row.get("missing"), Value::Null);
    }

    #[test]
    fn test_convert_writes_converted_fields_and_clears_settables() {
        let mut sf = account_facade();
        let mut writer = csv::Writer::from_writer(Vec::new());
        let mut row = row(&["one", "two"], &["two"]);

        assert!(!row.is_converted());
        row.convert(sf.object("Account").unwrap(), &mut writer)
            .unwrap();

        // "two" has a length-1 string descriptor: "Two" truncates to "T".
        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(output, "One,T\n");

        assert!(row.is_converted());
        assert_eq!(row.conversion_count(), 1);
        // Cleared settable attribute reads back as null.
        assert_eq!(row.get("two"), Value::Null);
    }

    #[test]
    fn test_convert_counter_counts_every_conversion() {
        let mut sf = account_facade();
        let mut writer = csv::Writer::from_writer(Vec::new());
        let mut row = row(&["one"], &[]);

        row.convert(sf.object("Account").unwrap(), &mut writer)
            .unwrap();
        row.convert(sf.object("Account").unwrap(), &mut writer)
            .unwrap();
        assert_eq!(row.conversion_count(), 2);
    }

    #[test]
    fn test_failed_conversion_leaves_sink_and_counter_untouched() {
        let mut sf = account_facade();
        let mut writer = csv::Writer::from_writer(Vec::new());
        let mut row = ConvertibleCsvRow::new(
            vec!["Active__c".into()],
            vec!["perhaps".into()],
            3,
            vec!["Active__c".into()],
            vec![],
        );

        let err = row
            .convert(sf.object("Account").unwrap(), &mut writer)
            .unwrap_err();
        assert!(err.is_data_validation());
        assert!(!row.is_converted());
        assert_eq!(writer.into_inner().unwrap(), b"");
    }

    #[test]
    fn test_from_csv_record() {
        let mut reader = csv::Reader::from_reader("one,two\nOne,Two\n".as_bytes());
        let headers = reader.headers().unwrap().clone();
        let record = reader.records().next().unwrap().unwrap();

        let row =
            ConvertibleCsvRow::from_csv_record(&headers, &record, 1, vec!["one".into()], vec![]);
        assert_eq!(row.index(), 1);
        assert_eq!(row.get("one"), json!("One"));
        assert_eq!(row.headers(), ["one", "two"]);
    }
}
