//! Prerequisite expression trees.
//!
//! Two representations, kept deliberately separate:
//! - `PrereqExpr`: parsed from the raw token sequence; leaves are course ids.
//! - `PrereqNode`: the resolved view; leaves carry the resolved course (with
//!   its own expansion nested inside) or a missing/cycle marker.
//!
//! Token-sequence convention (left to right, documented because the flat
//! encoding is ambiguous on its own): each sequence starts under the
//! combinator inherited from its enclosing context, AND at top level. A
//! literal "and"/"or" token updates the active combinator for the elements
//! that follow it, and a nested sequence inherits the combinator governing
//! it. A sequence whose elements all fell under one combinator becomes a
//! single operator node; mixed sequences become runs of same-combinator
//! groups joined under top-level AND. No further precedence is assumed.

use crate::catalog::course::CourseRef;
use crate::catalog::record::RawPrereq;
use crate::diagnostics::Diagnostic;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "and" => Some(Combinator::And),
            "or" => Some(Combinator::Or),
            _ => None,
        }
    }
}

/// Parsed prerequisite expression; leaves are unresolved course ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PrereqExpr {
    Leaf {
        course_id: String,
    },
    Group {
        combinator: Combinator,
        children: Vec<PrereqExpr>,
    },
}

/// Resolved prerequisite tree node.
///
/// `Course` leaves embed the referenced course and its own expanded
/// prerequisite tree; `Missing` and `Cycle` are the non-fatal markers the
/// resolver substitutes when a reference cannot be followed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PrereqNode {
    Course {
        #[serde(flatten)]
        course: CourseRef,
        #[serde(skip_serializing_if = "Option::is_none")]
        prereq: Option<Box<PrereqNode>>,
    },
    Missing {
        course_id: String,
    },
    Cycle {
        course_id: String,
    },
    Group {
        combinator: Combinator,
        children: Vec<PrereqNode>,
    },
}

/// Parse a raw prerequisite token sequence into an expression tree.
///
/// Returns `None` for an empty or all-malformed sequence ("no prerequisites").
/// Malformed elements are skipped and recorded, never fatal.
pub fn parse_prereq_tokens(
    tokens: &[RawPrereq],
    course_id: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<PrereqExpr> {
    parse_seq(tokens, Combinator::And, course_id, diagnostics)
}

fn parse_seq(
    elements: &[RawPrereq],
    inherited: Combinator,
    course_id: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<PrereqExpr> {
    let mut active = inherited;
    let mut tagged: Vec<(Combinator, PrereqExpr)> = Vec::new();

    for element in elements {
        match element {
            RawPrereq::Token(token) => {
                if let Some(combinator) = Combinator::from_token(token) {
                    active = combinator;
                } else if token.trim().is_empty() {
                    record_malformed(course_id, "empty course reference", diagnostics);
                } else {
                    tagged.push((
                        active,
                        PrereqExpr::Leaf {
                            course_id: token.clone(),
                        },
                    ));
                }
            }
            RawPrereq::Seq(sub) => {
                if let Some(expr) = parse_seq(sub, active, course_id, diagnostics) {
                    tagged.push((active, expr));
                }
            }
            RawPrereq::Other(value) => {
                record_malformed(course_id, &value.to_string(), diagnostics);
            }
        }
    }

    build_group(tagged)
}

fn record_malformed(course_id: &str, detail: &str, diagnostics: &mut Vec<Diagnostic>) {
    tracing::warn!(course_id, detail, "skipping malformed prerequisite element");
    diagnostics.push(Diagnostic::MalformedExpression {
        course_id: course_id.to_string(),
        detail: detail.to_string(),
    });
}

/// Assemble collected `(combinator, child)` pairs into one expression.
fn build_group(mut tagged: Vec<(Combinator, PrereqExpr)>) -> Option<PrereqExpr> {
    match tagged.len() {
        0 => None,
        1 => {
            let (combinator, expr) = tagged.pop().unwrap();
            // A lone nested group stands on its own; a lone leaf keeps the
            // combinator that governed it.
            Some(match expr {
                group @ PrereqExpr::Group { .. } => group,
                leaf => PrereqExpr::Group {
                    combinator,
                    children: vec![leaf],
                },
            })
        }
        _ => {
            let uniform = tagged.iter().all(|(c, _)| *c == tagged[0].0);
            if uniform {
                let combinator = tagged[0].0;
                let children = tagged.into_iter().map(|(_, e)| e).collect();
                return Some(PrereqExpr::Group {
                    combinator,
                    children,
                });
            }

            // Mixed combinators: consecutive runs under one combinator become
            // nested groups, joined under the top-level AND default.
            let mut top: Vec<PrereqExpr> = Vec::new();
            let mut run: Vec<PrereqExpr> = Vec::new();
            let mut run_combinator = tagged[0].0;
            for (combinator, expr) in tagged {
                if combinator != run_combinator {
                    top.push(close_run(run_combinator, std::mem::take(&mut run)));
                    run_combinator = combinator;
                }
                run.push(expr);
            }
            top.push(close_run(run_combinator, run));

            Some(PrereqExpr::Group {
                combinator: Combinator::And,
                children: top,
            })
        }
    }
}

fn close_run(combinator: Combinator, mut run: Vec<PrereqExpr>) -> PrereqExpr {
    if run.len() == 1 {
        run.pop().unwrap()
    } else {
        PrereqExpr::Group {
            combinator,
            children: run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> RawPrereq {
        RawPrereq::Token(s.to_string())
    }

    fn seq(elements: Vec<RawPrereq>) -> RawPrereq {
        RawPrereq::Seq(elements)
    }

    fn leaf(s: &str) -> PrereqExpr {
        PrereqExpr::Leaf {
            course_id: s.to_string(),
        }
    }

    fn parse(tokens: &[RawPrereq]) -> (Option<PrereqExpr>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let expr = parse_prereq_tokens(tokens, "TEST 1", &mut diagnostics);
        (expr, diagnostics)
    }

    #[test]
    fn empty_sequence_means_no_prerequisites() {
        let (expr, diagnostics) = parse(&[]);
        assert_eq!(expr, None);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn flat_ids_default_to_and() {
        let (expr, _) = parse(&[id("CS 1"), id("CS 2")]);
        assert_eq!(
            expr,
            Some(PrereqExpr::Group {
                combinator: Combinator::And,
                children: vec![leaf("CS 1"), leaf("CS 2")],
            })
        );
    }

    #[test]
    fn or_token_governs_the_nested_sequence_that_follows() {
        // The catalog's canonical shape: ["or", ["A", "B"]].
        let (expr, _) = parse(&[id("or"), seq(vec![id("ANTHRO 2A"), id("ANTHRO 2B")])]);
        assert_eq!(
            expr,
            Some(PrereqExpr::Group {
                combinator: Combinator::Or,
                children: vec![leaf("ANTHRO 2A"), leaf("ANTHRO 2B")],
            })
        );
    }

    #[test]
    fn single_id_wraps_under_and() {
        let (expr, _) = parse(&[id("CS 1")]);
        assert_eq!(
            expr,
            Some(PrereqExpr::Group {
                combinator: Combinator::And,
                children: vec![leaf("CS 1")],
            })
        );
    }

    #[test]
    fn mixed_combinators_group_runs_under_top_level_and() {
        // ["A", "or", ["B", "C"]] => A and (B or C)
        let (expr, _) = parse(&[id("MATH 2A"), id("or"), seq(vec![id("CS 2"), id("CS 3")])]);
        assert_eq!(
            expr,
            Some(PrereqExpr::Group {
                combinator: Combinator::And,
                children: vec![
                    leaf("MATH 2A"),
                    PrereqExpr::Group {
                        combinator: Combinator::Or,
                        children: vec![leaf("CS 2"), leaf("CS 3")],
                    },
                ],
            })
        );
    }

    #[test]
    fn later_combinator_token_governs_later_elements() {
        // ["A", "or", "B", "C"] => A and (B or C): the "or" stays active.
        let (expr, _) = parse(&[id("A 1"), id("or"), id("B 1"), id("C 1")]);
        assert_eq!(
            expr,
            Some(PrereqExpr::Group {
                combinator: Combinator::And,
                children: vec![
                    leaf("A 1"),
                    PrereqExpr::Group {
                        combinator: Combinator::Or,
                        children: vec![leaf("B 1"), leaf("C 1")],
                    },
                ],
            })
        );
    }

    #[test]
    fn malformed_elements_are_skipped_and_recorded() {
        let (expr, diagnostics) = parse(&[
            id("CS 1"),
            RawPrereq::Other(serde_json::json!(42)),
            RawPrereq::Other(serde_json::json!({"oops": true})),
        ]);
        assert_eq!(
            expr,
            Some(PrereqExpr::Group {
                combinator: Combinator::And,
                children: vec![leaf("CS 1")],
            })
        );
        assert_eq!(diagnostics.len(), 2);
        assert!(matches!(
            &diagnostics[0],
            Diagnostic::MalformedExpression { course_id, .. } if course_id == "TEST 1"
        ));
    }

    #[test]
    fn all_malformed_sequence_yields_no_expression() {
        let (expr, diagnostics) = parse(&[RawPrereq::Other(serde_json::json!(null))]);
        assert_eq!(expr, None);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn nested_sequence_without_token_inherits_the_active_combinator() {
        // ["or", ["A", ["B", "C"]]]: the inner pair inherits OR.
        let (expr, _) = parse(&[id("or"), seq(vec![id("A 1"), seq(vec![id("B 1"), id("C 1")])])]);
        assert_eq!(
            expr,
            Some(PrereqExpr::Group {
                combinator: Combinator::Or,
                children: vec![
                    leaf("A 1"),
                    PrereqExpr::Group {
                        combinator: Combinator::Or,
                        children: vec![leaf("B 1"), leaf("C 1")],
                    },
                ],
            })
        );
    }
}
