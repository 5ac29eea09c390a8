//! Reachability over resolved prerequisite trees.
//!
//! Breadth-first traversal from a root course: every catalog course reachable
//! through prerequisite edges ends up in `visited`, and each visited course
//! maps to its ordered direct dependencies, tagged with the combinator of the
//! nearest enclosing operator node. The visited set makes the walk cycle-safe
//! independent of the resolver's own guard.

use crate::Result;
use crate::catalog::{CatalogIndex, Combinator, PrereqNode};
use anyhow::bail;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// One direct prerequisite edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub target: String,
    pub combinator: Combinator,
}

/// Result of a reachability traversal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Traversal {
    pub visited: BTreeSet<String>,
    /// Source course id -> ordered direct edges (empty for leaf courses).
    pub edges: BTreeMap<String, Vec<Edge>>,
}

impl Traversal {
    /// Sources with at least one direct edge whose target lies outside the
    /// given in-scope id set (cross-group edges, e.g. another department).
    pub fn external_sources(&self, in_scope: &BTreeSet<String>) -> BTreeSet<String> {
        self.edges
            .iter()
            .filter(|(_, edges)| edges.iter().any(|e| !in_scope.contains(&e.target)))
            .map(|(source, _)| source.clone())
            .collect()
    }
}

/// Breadth-first reachability from `root_id`.
///
/// Each course is enqueued at most once; a dequeued course's resolved tree is
/// flattened into `{target, combinator}` pairs, and targets present in the
/// catalog join the frontier. Missing references produce no edge.
pub fn reachable_from(index: &mut CatalogIndex, root_id: &str) -> Result<Traversal> {
    if index.lookup(root_id).is_none() {
        bail!("course not in catalog: {}", root_id);
    }

    let mut visited: BTreeSet<String> = BTreeSet::new();
    let mut edges: BTreeMap<String, Vec<Edge>> = BTreeMap::new();
    let mut frontier: VecDeque<String> = VecDeque::new();

    visited.insert(root_id.to_string());
    frontier.push_back(root_id.to_string());

    while let Some(course_id) = frontier.pop_front() {
        let Some(view) = index.expanded(&course_id) else {
            continue;
        };

        let mut direct = Vec::new();
        if let Some(tree) = &view.prereq {
            flatten_edges(tree, &mut direct);
        }

        for edge in &direct {
            if index.lookup(&edge.target).is_some() && visited.insert(edge.target.clone()) {
                frontier.push_back(edge.target.clone());
            }
        }
        edges.insert(course_id, direct);
    }

    Ok(Traversal { visited, edges })
}

/// Flatten a resolved tree into one `{target, combinator}` pair per leaf
/// descendant, source order preserved. Operator nodes pass their combinator
/// down; a nested course's own expansion belongs to that course and is not
/// descended into here.
pub fn flatten_edges(tree: &PrereqNode, out: &mut Vec<Edge>) {
    walk(tree, Combinator::And, out);
}

fn walk(node: &PrereqNode, inherited: Combinator, out: &mut Vec<Edge>) {
    match node {
        PrereqNode::Group {
            combinator,
            children,
        } => {
            for child in children {
                walk(child, *combinator, out);
            }
        }
        PrereqNode::Course { course, .. } => out.push(Edge {
            target: course.course_id.clone(),
            combinator: inherited,
        }),
        // The cycle target is a real catalog course already on the path.
        PrereqNode::Cycle { course_id } => out.push(Edge {
            target: course_id.clone(),
            combinator: inherited,
        }),
        PrereqNode::Missing { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::{RawCourseRecord, RawPrereq};
    use pretty_assertions::assert_eq;

    fn record(dept: &str, number: &str, prereqs: Vec<RawPrereq>) -> RawCourseRecord {
        RawCourseRecord {
            department_code: dept.to_string(),
            department_name: dept.to_string(),
            number: number.to_string(),
            title: String::new(),
            units: "4".to_string(),
            prerequisite_courses: prereqs,
            extra: Default::default(),
        }
    }

    fn tokens(ids: &[&str]) -> Vec<RawPrereq> {
        ids.iter().map(|s| RawPrereq::Token(s.to_string())).collect()
    }

    #[test]
    fn dag_reachability_visits_all_and_keeps_source_order() {
        let records = vec![
            record("CS", "A", tokens(&["CS B", "CS C"])),
            record("CS", "B", vec![]),
            record("CS", "C", vec![]),
        ];
        let mut index = CatalogIndex::build(&records);

        let traversal = reachable_from(&mut index, "CS A").expect("traversal");

        let expected: BTreeSet<String> = ["CS A", "CS B", "CS C"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(traversal.visited, expected);

        assert_eq!(
            traversal.edges["CS A"],
            vec![
                Edge {
                    target: "CS B".to_string(),
                    combinator: Combinator::And,
                },
                Edge {
                    target: "CS C".to_string(),
                    combinator: Combinator::And,
                },
            ]
        );
        assert_eq!(traversal.edges["CS B"], Vec::new());
    }

    #[test]
    fn or_groups_tag_their_edges() {
        let records = vec![
            record(
                "CS",
                "A",
                vec![
                    RawPrereq::Token("or".to_string()),
                    RawPrereq::Seq(tokens(&["CS B", "CS C"])),
                ],
            ),
            record("CS", "B", vec![]),
            record("CS", "C", vec![]),
        ];
        let mut index = CatalogIndex::build(&records);

        let traversal = reachable_from(&mut index, "CS A").expect("traversal");
        assert!(
            traversal.edges["CS A"]
                .iter()
                .all(|e| e.combinator == Combinator::Or)
        );
    }

    #[test]
    fn traversal_terminates_on_cycles() {
        let records = vec![
            record("CS", "A", tokens(&["CS B"])),
            record("CS", "B", tokens(&["CS A"])),
        ];
        let mut index = CatalogIndex::build(&records);

        let traversal = reachable_from(&mut index, "CS A").expect("traversal");
        assert!(traversal.visited.contains("CS A"));
        assert!(traversal.visited.contains("CS B"));
    }

    #[test]
    fn missing_targets_produce_no_edges() {
        let records = vec![record("CS", "A", tokens(&["NOT HERE"]))];
        let mut index = CatalogIndex::build(&records);

        let traversal = reachable_from(&mut index, "CS A").expect("traversal");
        assert_eq!(traversal.edges["CS A"], Vec::new());
        assert_eq!(traversal.visited.len(), 1);
    }

    #[test]
    fn unknown_root_is_an_error() {
        let mut index = CatalogIndex::build(&[]);
        assert!(reachable_from(&mut index, "CS A").is_err());
    }

    #[test]
    fn external_sources_flags_cross_scope_edges() {
        let records = vec![
            record("CS", "A", tokens(&["MATH 2A"])),
            record("MATH", "2A", vec![]),
        ];
        let mut index = CatalogIndex::build(&records);
        let traversal = reachable_from(&mut index, "CS A").expect("traversal");

        let in_scope: BTreeSet<String> = ["CS A".to_string()].into_iter().collect();
        let external = traversal.external_sources(&in_scope);
        assert_eq!(
            external,
            ["CS A".to_string()].into_iter().collect::<BTreeSet<_>>()
        );
    }
}
