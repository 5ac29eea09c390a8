//! Raw course records as the storage collaborator hands them over.
//!
//! JSON shape (one element of the stored array):
//! {
//!   "department_code": "ANTHRO",
//!   "department_name": "Anthropology",
//!   "number": "125C",
//!   "title": "Environmental Anthropology",
//!   "units": "4",
//!   "prerequisite_courses": ["or", ["ANTHRO 2A", "ANTHRO 2B"]]
//! }
//!
//! `prerequisite_courses` is a flat, possibly nested token sequence: bare
//! strings are course ids, the literal tokens "and"/"or" set the combinator
//! for what follows, and arrays nest. The field may be absent or empty.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One stored course record, unvalidated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCourseRecord {
    pub department_code: String,

    #[serde(default)]
    pub department_name: String,

    pub number: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub units: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisite_courses: Vec<RawPrereq>,

    /// Fields this engine does not interpret (description, ge_category, ...).
    /// Kept so the record round-trips intact to the scheduler collaborator.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// One element of a raw prerequisite sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrereq {
    /// A course id or a combinator token ("and" / "or").
    Token(String),
    /// A nested sub-sequence.
    Seq(Vec<RawPrereq>),
    /// Anything else; skipped with a malformed-expression diagnostic.
    Other(serde_json::Value),
}
