//! Notice domain model.
//!
//! # Responsibility
//! - Define the announcement record and its accepted input fields.
//!
//! # Invariants
//! - `date` is free-form text and is never parsed.
//! - Only `title` and `date` are accepted from callers.

use super::fields::{FieldReader, FieldsError};
use super::timestamp::rfc3339;
use super::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type NoticeId = RecordId;

const NOTICE_FIELDS: &[&str] = &["title", "date"];

/// Caller-supplied notice content, as stored in the document body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl NoticeFields {
    /// Maps an untrusted JSON object into notice fields.
    ///
    /// # Errors
    /// - `FieldsError::NotAnObject` when `input` is not an object.
    /// - `FieldsError::UnknownField` for keys other than `title`/`date`.
    /// - `FieldsError::InvalidType` for structured values in text fields.
    pub fn from_json(input: Value) -> Result<Self, FieldsError> {
        let mut reader = FieldReader::new(input, NOTICE_FIELDS)?;
        Ok(Self {
            title: reader.text("title")?,
            date: reader.text("date")?,
        })
    }
}

/// Stored notice as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    #[serde(rename = "_id")]
    pub id: NoticeId,
    #[serde(flatten)]
    pub fields: NoticeFields,
    /// Unix epoch milliseconds, rendered as RFC 3339.
    #[serde(with = "rfc3339")]
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::{Notice, NoticeFields};
    use crate::model::fields::FieldsError;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn from_json_accepts_whitelisted_fields() {
        let fields =
            NoticeFields::from_json(json!({"title": "Admission open", "date": "12 Jan"})).unwrap();
        assert_eq!(fields.title.as_deref(), Some("Admission open"));
        assert_eq!(fields.date.as_deref(), Some("12 Jan"));
    }

    #[test]
    fn from_json_rejects_extra_fields() {
        let err = NoticeFields::from_json(json!({"title": "x", "pinned": true})).unwrap_err();
        assert_eq!(err, FieldsError::UnknownField("pinned".to_string()));
    }

    #[test]
    fn notice_serializes_with_wire_names() {
        let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
        let notice = Notice {
            id,
            fields: NoticeFields {
                title: Some("Holiday".to_string()),
                date: None,
            },
            created_at: 1_700_000_000_000,
        };

        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(
            json,
            json!({
                "_id": "11111111-2222-4333-8444-555555555555",
                "title": "Holiday",
                "createdAt": "2023-11-14T22:13:20.000Z"
            })
        );

        let back: Notice = serde_json::from_value(json).unwrap();
        assert_eq!(back, notice);
    }
}
