//! Non-fatal catalog diagnostics.
//!
//! Bad course data never aborts a catalog load; the index records what it had
//! to work around and keeps going. Collaborator failures (store, scheduler)
//! are real errors and are propagated with `anyhow` instead.

use std::fmt;

/// A recorded, non-fatal problem found while loading or resolving a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A prerequisite leaf names a course id absent from the catalog.
    MissingReference {
        course_id: String,
        referenced_by: String,
    },
    /// An element of a raw prerequisite sequence is neither a course id, a
    /// combinator token, nor a nested sequence.
    MalformedExpression { course_id: String, detail: String },
    /// A prerequisite chain revisits a course already being resolved.
    CyclicReference { course_id: String },
    /// Two raw records derived the same course id; the later record won.
    DuplicateCourseId { course_id: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingReference {
                course_id,
                referenced_by,
            } => write!(
                f,
                "missing course {} (referenced by {})",
                course_id, referenced_by
            ),
            Diagnostic::MalformedExpression { course_id, detail } => write!(
                f,
                "malformed prerequisite element in {}: {}",
                course_id, detail
            ),
            Diagnostic::CyclicReference { course_id } => {
                write!(f, "cyclic prerequisite chain at {}", course_id)
            }
            Diagnostic::DuplicateCourseId { course_id } => {
                write!(f, "duplicate course id {}", course_id)
            }
        }
    }
}
