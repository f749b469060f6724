//! Multi-criteria record id resolution.
//!
//! A [`RecordIdMatcher`] tries an ordered sequence of criteria templates
//! against one cached object until a template resolves exactly one record.
//! Template values are literals or derivations of the input row, evaluated
//! only when their template is attempted.

use serde_json::Value;

use crate::error::{Error, ErrorKind, Result};
use crate::facade::Salesforce;
use crate::field::scalar_to_string;
use crate::row::ConvertibleCsvRow;

/// One criteria value: a literal, or a function of the input row.
pub enum MatchValue {
    Literal(Value),
    Derived(Box<dyn Fn(&ConvertibleCsvRow) -> Value>),
}

impl MatchValue {
    /// A literal criteria value.
    pub fn literal(value: impl Into<Value>) -> Self {
        MatchValue::Literal(value.into())
    }

    /// A value derived from the input row when the template is attempted.
    pub fn derived(derive: impl Fn(&ConvertibleCsvRow) -> Value + 'static) -> Self {
        MatchValue::Derived(Box::new(derive))
    }

    fn evaluate(&self, row: &ConvertibleCsvRow) -> Value {
        match self {
            MatchValue::Literal(value) => value.clone(),
            MatchValue::Derived(derive) => derive(row),
        }
    }
}

/// One ordered set of match criteria.
#[derive(Default)]
pub struct MatchTemplate {
    criteria: Vec<(String, MatchValue)>,
}

impl MatchTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a criterion; order is preserved.
    pub fn with(mut self, field: impl Into<String>, value: MatchValue) -> Self {
        self.criteria.push((field.into(), value));
        self
    }

    fn evaluate(&self, row: &ConvertibleCsvRow) -> Vec<(String, Value)> {
        self.criteria
            .iter()
            .map(|(field, value)| (field.clone(), value.evaluate(row)))
            .collect()
    }
}

/// Resolves a single record id through fallback criteria templates.
///
/// Stateless after construction; `mandatory` controls whether exhausting
/// every template is an error or an absent result.
pub struct RecordIdMatcher {
    object_name: String,
    templates: Vec<MatchTemplate>,
    label: Option<String>,
    mandatory: bool,
}

impl RecordIdMatcher {
    /// A mandatory matcher over the given templates, tried in order.
    pub fn new(object_name: impl Into<String>, templates: Vec<MatchTemplate>) -> Self {
        Self {
            object_name: object_name.into(),
            templates,
            label: None,
            mandatory: true,
        }
    }

    /// Label used in the no-match error, to tell multiple matchers for the
    /// same object apart.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Exhausting every template returns `None` instead of failing.
    pub fn optional(mut self) -> Self {
        self.mandatory = false;
        self
    }

    /// Resolve the id of the single record matching the input row.
    ///
    /// Templates are attempted in order. A template matching more than one
    /// record fails immediately with `AmbiguousMatch`, regardless of any
    /// remaining templates; exactly one match returns that record's `Id`;
    /// no match falls through to the next template.
    pub fn resolve(
        &self,
        salesforce: &mut Salesforce,
        row: &ConvertibleCsvRow,
    ) -> Result<Option<String>> {
        for template in &self.templates {
            let criteria = template.evaluate(row);
            let object = salesforce.object(&self.object_name)?;
            let matches = object.find_where(&criteria)?;

            match matches.len() {
                0 => continue,
                1 => {
                    let id = matches[0]
                        .get("Id")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .ok_or_else(|| {
                            Error::new(ErrorKind::UnknownField {
                                object: self.object_name.clone(),
                                field: "Id".to_string(),
                            })
                        })?;
                    return Ok(Some(id));
                }
                _ => {
                    return Err(Error::new(ErrorKind::AmbiguousMatch {
                        object: self.object_name.clone(),
                        criteria: format_criteria(&criteria),
                    }))
                }
            }
        }

        if self.mandatory {
            Err(Error::new(ErrorKind::NoMatch {
                object: self.object_name.clone(),
                label: self.label.clone(),
            }))
        } else {
            Ok(None)
        }
    }
}

fn format_criteria(criteria: &[(String, Value)]) -> String {
    criteria
        .iter()
        .map(|(field, value)| format!("{field}={}", scalar_to_string(value)))
        .collect::<Vec<_>>()
        .join(", ")
}
