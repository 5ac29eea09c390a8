//! Report aggregation: combine the department list, expanded course views,
//! flattened dependency edges, and load diagnostics into one payload for the
//! HTML renderer.

pub mod html;

pub use html::render_html_report;

use crate::catalog::course::parse_units;
use crate::catalog::{CatalogIndex, CourseView, Department};
use crate::diagnostics::Diagnostic;
use crate::graph::{Edge, flatten_edges};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    /// Catalog first-seen order.
    pub departments: Vec<Department>,

    /// Department id -> expanded courses, catalog order.
    pub courses: BTreeMap<String, Vec<CourseView>>,

    /// Course id -> ordered direct prerequisite edges.
    pub edges: BTreeMap<String, Vec<Edge>>,

    /// Department id -> courses with at least one direct edge leaving that
    /// department's course list.
    pub external: BTreeMap<String, Vec<String>>,

    pub totals: TotalsView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsView {
    pub departments: usize,
    pub courses: usize,
    pub missing_references: usize,
    pub cycles: usize,
    pub duplicate_ids: usize,
    pub malformed_expressions: usize,
    /// Sum of the parsable minimum units across the catalog.
    pub total_min_units: f64,
}

/// Expand every department and aggregate the report payload.
pub fn build_report_data(index: &mut CatalogIndex) -> ReportData {
    let departments = index.departments().to_vec();

    let mut courses: BTreeMap<String, Vec<CourseView>> = BTreeMap::new();
    let mut edges: BTreeMap<String, Vec<Edge>> = BTreeMap::new();
    let mut external: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut total_min_units = 0.0f64;
    let mut course_count = 0usize;

    for dept in &departments {
        let views = index.courses_in(&dept.dept_id).to_vec();
        let in_scope: BTreeSet<String> =
            views.iter().map(|v| v.course.course_id.clone()).collect();

        let mut crossing: Vec<String> = Vec::new();
        for view in &views {
            let mut direct = Vec::new();
            if let Some(tree) = &view.prereq {
                flatten_edges(tree, &mut direct);
            }
            if direct.iter().any(|e| !in_scope.contains(&e.target)) {
                crossing.push(view.course.course_id.clone());
            }
            edges.insert(view.course.course_id.clone(), direct);

            if let Some((min, _)) = parse_units(&view.course.units) {
                total_min_units += min;
            }
        }

        course_count += views.len();
        external.insert(dept.dept_id.clone(), crossing);
        courses.insert(dept.dept_id.clone(), views);
    }

    // Every department has resolved by now, so the diagnostics are complete.
    let mut missing_references = 0usize;
    let mut cycles = 0usize;
    let mut duplicate_ids = 0usize;
    let mut malformed_expressions = 0usize;
    for diagnostic in index.diagnostics() {
        match diagnostic {
            Diagnostic::MissingReference { .. } => missing_references += 1,
            Diagnostic::CyclicReference { .. } => cycles += 1,
            Diagnostic::DuplicateCourseId { .. } => duplicate_ids += 1,
            Diagnostic::MalformedExpression { .. } => malformed_expressions += 1,
        }
    }

    ReportData {
        totals: TotalsView {
            departments: departments.len(),
            courses: course_count,
            missing_references,
            cycles,
            duplicate_ids,
            malformed_expressions,
            total_min_units,
        },
        departments,
        courses,
        edges,
        external,
    }
}
