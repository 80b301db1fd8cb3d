//! Exam result domain model.
//!
//! # Responsibility
//! - Define the superset result schema and its accepted input fields.
//!
//! # Invariants
//! - `roll` and `exam_name` are required; every other field is optional.
//! - `(roll, exam_name)` is the lookup key but is not unique.
//! - `gpa` is text and is never interpreted numerically.
//! - `marks` entries are opaque and kept in caller order.

use super::fields::{batch_items, FieldReader, FieldsError};
use super::timestamp::rfc3339;
use super::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type ResultId = RecordId;

const RESULT_FIELDS: &[&str] = &[
    "studentName",
    "fatherName",
    "motherName",
    "roll",
    "regNo",
    "examName",
    "year",
    "institute",
    "gpa",
    "resultStatus",
    "marks",
];

/// Caller-supplied result content, as stored in the document body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_name: Option<String>,
    pub roll: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reg_no: Option<String>,
    pub exam_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    /// Pass/fail marker; conventions are caller-defined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_status: Option<String>,
    /// Subject-wise marks; entry shape is caller-defined.
    #[serde(default)]
    pub marks: Vec<Value>,
}

impl ResultFields {
    /// Creates a field set holding only the lookup key.
    pub fn new(roll: impl Into<String>, exam_name: impl Into<String>) -> Self {
        Self {
            roll: roll.into(),
            exam_name: exam_name.into(),
            ..Self::default()
        }
    }

    /// Maps an untrusted JSON object into result fields.
    ///
    /// # Errors
    /// - `FieldsError::NotAnObject` when `input` is not an object.
    /// - `FieldsError::UnknownField` for keys outside the result schema.
    /// - `FieldsError::MissingField` when `roll` or `examName` is absent.
    /// - `FieldsError::InvalidType` for mistyped values.
    pub fn from_json(input: Value) -> Result<Self, FieldsError> {
        let mut reader = FieldReader::new(input, RESULT_FIELDS)?;
        Ok(Self {
            student_name: reader.text("studentName")?,
            father_name: reader.text("fatherName")?,
            mother_name: reader.text("motherName")?,
            roll: reader.required_text("roll")?,
            reg_no: reader.text("regNo")?,
            exam_name: reader.required_text("examName")?,
            year: reader.text("year")?,
            institute: reader.text("institute")?,
            gpa: reader.text("gpa")?,
            result_status: reader.text("resultStatus")?,
            marks: reader.opaque_list("marks")?,
        })
    }

    /// Maps a bulk payload: a JSON array of result objects.
    ///
    /// # Errors
    /// - `FieldsError::NotAnArray` when `input` is not an array.
    /// - `FieldsError::AtIndex` naming the first entry that fails mapping.
    pub fn batch_from_json(input: Value) -> Result<Vec<Self>, FieldsError> {
        batch_items(input)?
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                Self::from_json(item).map_err(|err| FieldsError::AtIndex {
                    index,
                    source: Box::new(err),
                })
            })
            .collect()
    }
}

/// Stored exam result as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    #[serde(rename = "_id")]
    pub id: ResultId,
    #[serde(flatten)]
    pub fields: ResultFields,
    /// Unix epoch milliseconds, rendered as RFC 3339.
    #[serde(with = "rfc3339")]
    pub created_at: i64,
}
