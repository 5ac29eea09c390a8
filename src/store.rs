//! Storage collaborator boundary.
//!
//! The engine only needs two operations from its store: fetch every course
//! record, and replace them all. The shipped implementation keeps the records
//! as a JSON array in a single file; anything that can satisfy the trait
//! (a document database, a fixture in tests) plugs in the same way.

use crate::Result;
use crate::catalog::RawCourseRecord;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

pub trait CatalogStore {
    /// All stored course records, in stored order.
    fn fetch_all(&self) -> Result<Vec<RawCourseRecord>>;

    /// Replace the whole document set (clear-then-insert semantics).
    fn replace_all(&mut self, records: &[RawCourseRecord]) -> Result<()>;
}

/// A JSON-array file of raw course records.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> JsonFileStore {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogStore for JsonFileStore {
    fn fetch_all(&self) -> Result<Vec<RawCourseRecord>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("read catalog file {}", self.path.display()))?;
        let records: Vec<RawCourseRecord> = serde_json::from_str(&text)
            .with_context(|| format!("parse catalog file {}", self.path.display()))?;
        tracing::debug!(records = records.len(), path = %self.path.display(), "fetched catalog");
        Ok(records)
    }

    fn replace_all(&mut self, records: &[RawCourseRecord]) -> Result<()> {
        let text = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, text)
            .with_context(|| format!("write catalog file {}", self.path.display()))?;
        tracing::debug!(records = records.len(), path = %self.path.display(), "replaced catalog");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn replace_then_fetch_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let mut store = JsonFileStore::new(&path);

        let records: Vec<RawCourseRecord> = serde_json::from_str(
            r#"[
                {"department_code": "CS", "department_name": "Computer Science",
                 "number": "1", "title": "Intro", "units": "4"},
                {"department_code": "CS", "department_name": "Computer Science",
                 "number": "2", "title": "More", "units": "4",
                 "prerequisite_courses": ["CS 1"]}
            ]"#,
        )
        .unwrap();

        store.replace_all(&records).unwrap();
        let fetched = store.fetch_all().unwrap();

        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[1].department_code, "CS");
        assert_eq!(fetched[1].number, "2");
    }

    #[test]
    fn replace_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let mut store = JsonFileStore::new(&path);

        let first: Vec<RawCourseRecord> = serde_json::from_str(
            r#"[{"department_code": "CS", "number": "1"},
                {"department_code": "CS", "number": "2"}]"#,
        )
        .unwrap();
        let second: Vec<RawCourseRecord> =
            serde_json::from_str(r#"[{"department_code": "MATH", "number": "2A"}]"#).unwrap();

        store.replace_all(&first).unwrap();
        store.replace_all(&second).unwrap();

        let fetched = store.fetch_all().unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].department_code, "MATH");
    }

    #[test]
    fn fetch_from_a_missing_file_is_an_error() {
        let store = JsonFileStore::new("/nonexistent/catalog.json");
        assert!(store.fetch_all().is_err());
    }

    #[test]
    fn unknown_fields_round_trip_through_extra() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let mut store = JsonFileStore::new(&path);

        let records: Vec<RawCourseRecord> = serde_json::from_str(
            r#"[{"department_code": "CS", "number": "1", "ge_category": "III"}]"#,
        )
        .unwrap();
        store.replace_all(&records).unwrap();

        let fetched = store.fetch_all().unwrap();
        assert_eq!(
            fetched[0].extra.get("ge_category"),
            Some(&serde_json::json!("III"))
        );
    }
}
