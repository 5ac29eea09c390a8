//! Prerequisite resolver.
//!
//! Expands a course's parsed expression by replacing each id leaf with the
//! referenced course and that course's own expansion, one level of recursion
//! per catalog course. Resolution builds new tree nodes; it never mutates a
//! `Course` or the index's id map. An explicit in-flight set truncates cyclic
//! chains with a `Cycle` marker, and a per-course memo table makes repeated
//! resolution a lookup.

use crate::catalog::course::{Course, CourseRef};
use crate::catalog::expr::{PrereqExpr, PrereqNode};
use crate::diagnostics::Diagnostic;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Borrows the index's pieces for one resolution pass.
pub(crate) struct Resolver<'a> {
    pub courses: &'a [Course],
    pub by_id: &'a HashMap<String, usize>,
    pub memo: &'a mut BTreeMap<String, Option<PrereqNode>>,
    pub diagnostics: &'a mut Vec<Diagnostic>,
}

impl Resolver<'_> {
    /// Resolve the prerequisite tree of a course already known to exist.
    /// Returns `None` when the course has no prerequisites.
    pub fn resolve(&mut self, course_id: &str) -> Option<PrereqNode> {
        let mut in_flight = BTreeSet::new();
        self.resolve_course(course_id, &mut in_flight)
    }

    fn resolve_course(
        &mut self,
        course_id: &str,
        in_flight: &mut BTreeSet<String>,
    ) -> Option<PrereqNode> {
        if let Some(done) = self.memo.get(course_id) {
            return done.clone();
        }

        let index = self.by_id[course_id];
        let expr = self.courses[index].prereq_expr.clone();

        in_flight.insert(course_id.to_string());
        let resolved = expr
            .as_ref()
            .map(|expr| self.resolve_expr(expr, course_id, in_flight));
        in_flight.remove(course_id);

        self.memo.insert(course_id.to_string(), resolved.clone());
        resolved
    }

    fn resolve_expr(
        &mut self,
        expr: &PrereqExpr,
        source_id: &str,
        in_flight: &mut BTreeSet<String>,
    ) -> PrereqNode {
        match expr {
            PrereqExpr::Group {
                combinator,
                children,
            } => PrereqNode::Group {
                combinator: *combinator,
                children: children
                    .iter()
                    .map(|child| self.resolve_expr(child, source_id, in_flight))
                    .collect(),
            },
            PrereqExpr::Leaf { course_id } => self.resolve_leaf(course_id, source_id, in_flight),
        }
    }

    fn resolve_leaf(
        &mut self,
        course_id: &str,
        source_id: &str,
        in_flight: &mut BTreeSet<String>,
    ) -> PrereqNode {
        if in_flight.contains(course_id) {
            tracing::warn!(course_id, source_id, "cyclic prerequisite chain truncated");
            self.diagnostics.push(Diagnostic::CyclicReference {
                course_id: course_id.to_string(),
            });
            return PrereqNode::Cycle {
                course_id: course_id.to_string(),
            };
        }

        match self.by_id.get(course_id) {
            Some(&index) => {
                let course = CourseRef::from(&self.courses[index]);
                let prereq = self.resolve_course(course_id, in_flight);
                PrereqNode::Course {
                    course,
                    prereq: prereq.map(Box::new),
                }
            }
            None => {
                tracing::warn!(course_id, source_id, "prerequisite not in catalog");
                self.diagnostics.push(Diagnostic::MissingReference {
                    course_id: course_id.to_string(),
                    referenced_by: source_id.to_string(),
                });
                PrereqNode::Missing {
                    course_id: course_id.to_string(),
                }
            }
        }
    }
}
