//! Domain model for the notice and exam-result collections.
//!
//! # Responsibility
//! - Define stored record shapes and their JSON wire form.
//! - Map untrusted JSON input into whitelisted, typed field sets.
//!
//! # Invariants
//! - Every record is identified by a store-assigned `RecordId`.
//! - `createdAt` is assigned by the service at creation, never by callers.
//! - Records are never updated in place; deletion is a hard delete.

pub mod fields;
pub mod notice;
pub mod result;
pub mod timestamp;

use uuid::Uuid;

/// Store-assigned identifier shared by both collections.
pub type RecordId = Uuid;
