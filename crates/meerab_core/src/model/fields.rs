//! Whitelisted mapping from untrusted JSON input to typed field sets.
//!
//! # Responsibility
//! - Reject input keys outside an entity's accepted field list.
//! - Coerce scalar JSON values into stored text.
//!
//! # Invariants
//! - Text fields accept strings, numbers and booleans; `null` means absent.
//! - Objects and arrays are never silently stringified.

use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input-shape error raised before the store is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldsError {
    /// A field set must be a JSON object.
    NotAnObject,
    /// A batch must be a JSON array.
    NotAnArray,
    UnknownField(String),
    MissingField(&'static str),
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },
    /// Error inside one element of a batch.
    AtIndex {
        index: usize,
        source: Box<FieldsError>,
    },
}

impl Display for FieldsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "payload must be a JSON object"),
            Self::NotAnArray => write!(f, "payload must be an array"),
            Self::UnknownField(name) => write!(f, "unknown field `{name}`"),
            Self::MissingField(name) => write!(f, "missing required field `{name}`"),
            Self::InvalidType { field, expected } => {
                write!(f, "field `{field}` must be {expected}")
            }
            Self::AtIndex { index, source } => write!(f, "entry {index}: {source}"),
        }
    }
}

impl Error for FieldsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AtIndex { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Consumable view over one JSON object being mapped into a field set.
pub(crate) struct FieldReader {
    map: Map<String, Value>,
}

impl FieldReader {
    /// Takes ownership of `input` and rejects keys outside `allowed`.
    pub(crate) fn new(input: Value, allowed: &[&str]) -> Result<Self, FieldsError> {
        let Value::Object(map) = input else {
            return Err(FieldsError::NotAnObject);
        };

        // Sorted so the reported key does not depend on map ordering.
        let mut unknown = map
            .keys()
            .filter(|key| !allowed.contains(&key.as_str()))
            .collect::<Vec<_>>();
        unknown.sort();
        if let Some(key) = unknown.first() {
            return Err(FieldsError::UnknownField((*key).clone()));
        }

        Ok(Self { map })
    }

    /// Reads an optional text field with scalar coercion.
    pub(crate) fn text(&mut self, field: &'static str) -> Result<Option<String>, FieldsError> {
        match self.map.remove(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text)),
            Some(Value::Number(number)) => Ok(Some(number.to_string())),
            Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
            Some(Value::Array(_) | Value::Object(_)) => Err(FieldsError::InvalidType {
                field,
                expected: "text",
            }),
        }
    }

    /// Reads a text field that must be present and non-null.
    pub(crate) fn required_text(&mut self, field: &'static str) -> Result<String, FieldsError> {
        self.text(field)?.ok_or(FieldsError::MissingField(field))
    }

    /// Reads an array of opaque values; absent or `null` yields an empty list.
    pub(crate) fn opaque_list(&mut self, field: &'static str) -> Result<Vec<Value>, FieldsError> {
        match self.map.remove(field) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(FieldsError::InvalidType {
                field,
                expected: "an array",
            }),
        }
    }
}

/// Splits a batch payload into its elements.
pub(crate) fn batch_items(input: Value) -> Result<Vec<Value>, FieldsError> {
    match input {
        Value::Array(items) => Ok(items),
        _ => Err(FieldsError::NotAnArray),
    }
}

#[cfg(test)]
mod tests {
    use super::{batch_items, FieldReader, FieldsError};
    use serde_json::json;

    #[test]
    fn text_coerces_scalars_and_treats_null_as_absent() {
        let mut reader = FieldReader::new(
            json!({"a": "x", "b": 101, "c": 5.5, "d": true, "e": null}),
            &["a", "b", "c", "d", "e"],
        )
        .unwrap();

        assert_eq!(reader.text("a").unwrap().as_deref(), Some("x"));
        assert_eq!(reader.text("b").unwrap().as_deref(), Some("101"));
        assert_eq!(reader.text("c").unwrap().as_deref(), Some("5.5"));
        assert_eq!(reader.text("d").unwrap().as_deref(), Some("true"));
        assert_eq!(reader.text("e").unwrap(), None);
        assert_eq!(reader.text("missing").unwrap(), None);
    }

    #[test]
    fn text_rejects_structured_values() {
        let mut reader = FieldReader::new(json!({"a": {"nested": 1}}), &["a"]).unwrap();
        assert_eq!(
            reader.text("a").unwrap_err(),
            FieldsError::InvalidType {
                field: "a",
                expected: "text"
            }
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = FieldReader::new(json!({"a": 1, "zz": 2, "b": 3}), &["a"])
            .err()
            .expect("unknown keys must fail");
        assert_eq!(err, FieldsError::UnknownField("b".to_string()));
    }

    #[test]
    fn non_object_and_non_array_inputs_are_rejected() {
        assert_eq!(
            FieldReader::new(json!([1, 2]), &[]).err(),
            Some(FieldsError::NotAnObject)
        );
        assert_eq!(batch_items(json!({"a": 1})), Err(FieldsError::NotAnArray));
    }

    #[test]
    fn nested_error_message_names_the_entry() {
        let err = FieldsError::AtIndex {
            index: 2,
            source: Box::new(FieldsError::MissingField("roll")),
        };
        assert_eq!(err.to_string(), "entry 2: missing required field `roll`");
    }
}
