//! Type-aware field conversion.
//!
//! The remote schema reports each field's type as a string; conversion
//! behavior is dispatched on a tagged [`FieldKind`] rather than a type
//! hierarchy. Two operations exist per field: `convert` normalizes a value
//! for storage or output, `lookup_value`/`lookup_key` derive the comparable
//! key used by the record cache's indexes.

use serde_json::Value;

use sf_connection::FieldMetadata;

use crate::error::{Error, ErrorKind, Result};

/// The conversion-relevant kind of a remote field.
///
/// Unrecognized remote type names fall back to `Default` (identity
/// conversion).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `string` and `textarea`: length-truncated text.
    Text,
    /// `boolean`: lenient textual booleans.
    Boolean,
    /// `phone`: stripped to digits, parentheses, whitespace and `+`.
    Phone,
    /// `id`: 15/18-character identifiers, matched on the 15-char prefix.
    Id,
    /// Everything else: identity.
    Default,
}

impl FieldKind {
    /// Map a remote type name to its kind.
    pub fn from_type_name(type_name: &str) -> Self {
        match type_name {
            "string" | "textarea" => FieldKind::Text,
            "boolean" => FieldKind::Boolean,
            "phone" => FieldKind::Phone,
            "id" => FieldKind::Id,
            _ => FieldKind::Default,
        }
    }
}

/// Conversion behavior for one remote field, built from its schema
/// description. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    kind: FieldKind,
    length: Option<usize>,
}

impl FieldDescriptor {
    /// Build a descriptor from remote field metadata.
    pub fn from_metadata(metadata: &FieldMetadata) -> Self {
        Self {
            kind: FieldKind::from_type_name(&metadata.field_type),
            length: metadata.length,
        }
    }

    /// The field's conversion kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Normalize a raw value for storage or output.
    ///
    /// Null passes through unchanged for every kind.
    pub fn convert(&self, value: &Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        match self.kind {
            FieldKind::Text => Ok(match value.as_str() {
                Some(s) => Value::String(self.truncate(s)),
                None => value.clone(),
            }),
            FieldKind::Phone => Ok(match value.as_str() {
                Some(s) => {
                    let stripped: String = s
                        .chars()
                        .filter(|c| {
                            c.is_ascii_digit() || c.is_whitespace() || matches!(c, '(' | ')' | '+')
                        })
                        .collect();
                    Value::String(self.truncate(stripped.trim()))
                }
                None => value.clone(),
            }),
            FieldKind::Boolean => self.convert_boolean(value),
            FieldKind::Id | FieldKind::Default => Ok(value.clone()),
        }
    }

    /// Derive the comparable lookup value for indexing and querying.
    ///
    /// Id fields compare on the first 15 characters (case-sensitive), so
    /// the 15-char prefix and the full 18-char id are the same key. Every
    /// other kind is identity.
    pub fn lookup_value(&self, value: &Value) -> Value {
        match (self.kind, value.as_str()) {
            (FieldKind::Id, Some(s)) => Value::String(s.chars().take(15).collect()),
            _ => value.clone(),
        }
    }

    /// The string form of [`lookup_value`](Self::lookup_value), as joined
    /// into index keys. Null and `""` both produce `""`.
    pub fn lookup_key(&self, value: &Value) -> String {
        scalar_to_string(&self.lookup_value(value))
    }

    fn convert_boolean(&self, value: &Value) -> Result<Value> {
        if let Some(b) = value.as_bool() {
            return Ok(Value::Bool(b));
        }

        let text = match value.as_str() {
            Some(s) => s,
            None => {
                return Err(Error::new(ErrorKind::data_validation(
                    "Invalid Boolean type",
                    value.to_string(),
                )))
            }
        };

        if text.is_empty() {
            return Ok(Value::String(String::new()));
        }

        match text.to_lowercase().as_str() {
            "true" | "yes" | "t" | "1" | "y" => Ok(Value::Bool(true)),
            "false" | "no" | "f" | "0" | "n" => Ok(Value::Bool(false)),
            _ => Err(Error::new(ErrorKind::data_validation(
                "Invalid Boolean type",
                text,
            ))),
        }
    }

    fn truncate(&self, s: &str) -> String {
        match self.length {
            Some(max) => s.chars().take(max).collect(),
            None => s.to_string(),
        }
    }
}

/// Render a scalar value as the string used in lookup keys and CSV cells.
pub(crate) fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
