//! Catalog index: the id map, department list, and per-department course
//! views, built fresh on every catalog load.
//!
//! Department and per-department caches are explicit memo tables with
//! compute-once-per-key semantics; a department's resolution pass runs to
//! completion before its views are cached, so cached views always carry fully
//! expanded trees.

use crate::catalog::course::{Course, CourseRef, Department};
use crate::catalog::expr::PrereqNode;
use crate::catalog::record::RawCourseRecord;
use crate::catalog::resolve::Resolver;
use crate::diagnostics::Diagnostic;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// A course with its prerequisite tree fully expanded, as returned by
/// department queries and embedded in the report payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseView {
    #[serde(flatten)]
    pub course: CourseRef,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prereq: Option<PrereqNode>,
}

pub struct CatalogIndex {
    /// Catalog order; ids unique after last-write-wins.
    courses: Vec<Course>,
    by_id: HashMap<String, usize>,

    departments: Option<Vec<Department>>,
    dept_courses: BTreeMap<String, Vec<CourseView>>,
    resolved: BTreeMap<String, Option<PrereqNode>>,

    diagnostics: Vec<Diagnostic>,
}

impl CatalogIndex {
    /// Build the id map and catalog-order course list in one pass.
    ///
    /// Duplicate course ids are resolved last-write-wins: the later record
    /// replaces the earlier one at the earlier's catalog position, so
    /// department and course ordering are unaffected by duplicates.
    pub fn build(records: &[RawCourseRecord]) -> CatalogIndex {
        let mut diagnostics = Vec::new();
        let mut courses: Vec<Course> = Vec::with_capacity(records.len());
        let mut by_id: HashMap<String, usize> = HashMap::with_capacity(records.len());

        for raw in records {
            let course = Course::normalize(raw, &mut diagnostics);
            match by_id.get(&course.course_id) {
                Some(&position) => {
                    tracing::warn!(
                        course_id = %course.course_id,
                        "duplicate course id, keeping the later record"
                    );
                    diagnostics.push(Diagnostic::DuplicateCourseId {
                        course_id: course.course_id.clone(),
                    });
                    courses[position] = course;
                }
                None => {
                    by_id.insert(course.course_id.clone(), courses.len());
                    courses.push(course);
                }
            }
        }

        tracing::debug!(courses = courses.len(), "catalog indexed");

        CatalogIndex {
            courses,
            by_id,
            departments: None,
            dept_courses: BTreeMap::new(),
            resolved: BTreeMap::new(),
            diagnostics,
        }
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// O(1) id lookup.
    pub fn lookup(&self, course_id: &str) -> Option<&Course> {
        self.by_id.get(course_id).map(|&index| &self.courses[index])
    }

    /// All departments, first-seen order, one entry per distinct id.
    /// Computed on first call, memoized after.
    pub fn departments(&mut self) -> &[Department] {
        if self.departments.is_none() {
            let mut seen: HashSet<&str> = HashSet::new();
            let mut list = Vec::new();
            for course in &self.courses {
                if seen.insert(&course.dept_id) {
                    list.push(Department {
                        dept_id: course.dept_id.clone(),
                        dept_name: course.dept_name.clone(),
                    });
                }
            }
            self.departments = Some(list);
        }
        self.departments.as_deref().unwrap_or_default()
    }

    /// One department's courses, catalog order, prerequisite trees fully
    /// expanded. The whole department resolves before the result is cached,
    /// so repeated calls are lookups. Unknown departments yield an empty
    /// slice.
    pub fn courses_in(&mut self, dept_id: &str) -> &[CourseView] {
        if !self.dept_courses.contains_key(dept_id) {
            let members: Vec<usize> = self
                .courses
                .iter()
                .enumerate()
                .filter(|(_, course)| course.dept_id == dept_id)
                .map(|(index, _)| index)
                .collect();

            let mut resolver = Resolver {
                courses: &self.courses,
                by_id: &self.by_id,
                memo: &mut self.resolved,
                diagnostics: &mut self.diagnostics,
            };

            let mut views = Vec::with_capacity(members.len());
            for index in members {
                let course_id = resolver.courses[index].course_id.clone();
                let prereq = resolver.resolve(&course_id);
                views.push(CourseView {
                    course: CourseRef::from(&resolver.courses[index]),
                    prereq,
                });
            }

            self.dept_courses.insert(dept_id.to_string(), views);
        }
        &self.dept_courses[dept_id]
    }

    /// One course with its tree expanded, regardless of department. `None`
    /// for unknown ids.
    pub fn expanded(&mut self, course_id: &str) -> Option<CourseView> {
        let index = *self.by_id.get(course_id)?;

        let mut resolver = Resolver {
            courses: &self.courses,
            by_id: &self.by_id,
            memo: &mut self.resolved,
            diagnostics: &mut self.diagnostics,
        };
        let prereq = resolver.resolve(course_id);

        Some(CourseView {
            course: CourseRef::from(&self.courses[index]),
            prereq,
        })
    }

    /// Everything the load and resolution passes had to work around.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
