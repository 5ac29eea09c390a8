//! Course entity model: normalization of raw records into catalog entities.
//!
//! Identity is derived, never taken verbatim from input: a course's id is
//! `"<department_code> <number>"`, e.g. "ANTHRO 125C", which is also how
//! prerequisite leaves reference other courses.

use crate::catalog::expr::{PrereqExpr, parse_prereq_tokens};
use crate::catalog::record::RawCourseRecord;
use crate::diagnostics::Diagnostic;
use regex::Regex;
use serde::Serialize;

/// One catalog course. Immutable once normalized; the expanded prerequisite
/// tree lives in the index's memo table, not here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub course_id: String,
    pub dept_id: String,
    pub dept_name: String,
    pub course_name: String,
    pub units: String,

    #[serde(skip)]
    pub prereq_expr: Option<PrereqExpr>,
}

/// The course fields embedded in resolved prerequisite leaves and views.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRef {
    pub course_id: String,
    pub dept_id: String,
    pub dept_name: String,
    pub course_name: String,
    pub units: String,
}

impl From<&Course> for CourseRef {
    fn from(course: &Course) -> Self {
        CourseRef {
            course_id: course.course_id.clone(),
            dept_id: course.dept_id.clone(),
            dept_name: course.dept_name.clone(),
            course_name: course.course_name.clone(),
            units: course.units.clone(),
        }
    }
}

/// One department, in catalog first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub dept_id: String,
    pub dept_name: String,
}

impl Course {
    /// Map a raw record onto a `Course`, deriving the id and parsing the
    /// prerequisite token sequence. Malformed prerequisite elements are
    /// recorded and skipped; normalization itself never fails.
    pub fn normalize(raw: &RawCourseRecord, diagnostics: &mut Vec<Diagnostic>) -> Course {
        let course_id = derive_course_id(&raw.department_code, &raw.number);
        let prereq_expr =
            parse_prereq_tokens(&raw.prerequisite_courses, &course_id, diagnostics);

        Course {
            course_id,
            dept_id: raw.department_code.clone(),
            dept_name: raw.department_name.clone(),
            course_name: raw.title.clone(),
            units: raw.units.clone(),
            prereq_expr,
        }
    }
}

/// Derive the canonical course id from department code and course number.
pub fn derive_course_id(department_code: &str, number: &str) -> String {
    format!("{} {}", department_code.trim(), number.trim())
}

/// Parse the free-form units field into a numeric `(min, max)` range.
///
/// Accepts "4", "4.0", and range forms like "1-12". Anything else (including
/// empty) yields `None`; units stay display-only in that case.
pub fn parse_units(units: &str) -> Option<(f64, f64)> {
    let re = Regex::new(r"^\s*([0-9]+(?:\.[0-9]+)?)\s*(?:-\s*([0-9]+(?:\.[0-9]+)?))?\s*$").ok()?;
    let caps = re.captures(units)?;
    let min: f64 = caps.get(1)?.as_str().parse().ok()?;
    let max: f64 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => min,
    };
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::expr::Combinator;
    use crate::catalog::record::RawPrereq;
    use pretty_assertions::assert_eq;

    fn record(dept: &str, number: &str) -> RawCourseRecord {
        RawCourseRecord {
            department_code: dept.to_string(),
            department_name: format!("{} department", dept),
            number: number.to_string(),
            title: format!("{} {} title", dept, number),
            units: "4".to_string(),
            prerequisite_courses: Vec::new(),
            extra: Default::default(),
        }
    }

    #[test]
    fn normalize_maps_raw_fields_and_derives_the_id() {
        let mut raw = record("ANTHRO", "125C");
        raw.prerequisite_courses = vec![
            RawPrereq::Token("or".to_string()),
            RawPrereq::Seq(vec![
                RawPrereq::Token("ANTHRO 2A".to_string()),
                RawPrereq::Token("ANTHRO 2B".to_string()),
            ]),
        ];

        let mut diagnostics = Vec::new();
        let course = Course::normalize(&raw, &mut diagnostics);

        assert_eq!(course.course_id, "ANTHRO 125C");
        assert_eq!(course.dept_id, "ANTHRO");
        assert_eq!(course.dept_name, "ANTHRO department");
        assert_eq!(course.course_name, "ANTHRO 125C title");
        assert_eq!(course.units, "4");
        assert!(diagnostics.is_empty());

        match course.prereq_expr {
            Some(PrereqExpr::Group {
                combinator: Combinator::Or,
                ref children,
            }) => assert_eq!(children.len(), 2),
            ref other => panic!("unexpected expression: {:?}", other),
        }
    }

    #[test]
    fn absent_prerequisites_normalize_to_none() {
        let mut diagnostics = Vec::new();
        let course = Course::normalize(&record("CS", "1"), &mut diagnostics);
        assert_eq!(course.prereq_expr, None);
    }

    #[test]
    fn course_id_is_derived_not_copied() {
        assert_eq!(derive_course_id(" COMPSCI ", " 111 "), "COMPSCI 111");
    }

    #[test]
    fn units_parse_plain_decimal_and_range() {
        assert_eq!(parse_units("4"), Some((4.0, 4.0)));
        assert_eq!(parse_units("4.0"), Some((4.0, 4.0)));
        assert_eq!(parse_units("1-12"), Some((1.0, 12.0)));
        assert_eq!(parse_units(" 2 - 4 "), Some((2.0, 4.0)));
        assert_eq!(parse_units("varies"), None);
        assert_eq!(parse_units(""), None);
    }
}
