//! Transition matrix: single-step coverage
//!
//! Every ordered `(from, to)` pair over the canonical state order is
//! classified exactly once:
//! - **excluded**: `to` is the initial state, `from` is final, or an absent
//!   initial→final edge when configured to exclude it
//! - **valid**: at least one transition exists; yields a Valid case carrying
//!   the pair's events
//! - **invalid**: anything else; yields an Invalid case with a reason
//!
//! The canonical order (initial, intermediates in source order, finals)
//! fixes both axes and the numbering of cases.

use super::Transition;
use crate::testgen::CaseKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Valid,
    Invalid,
    Excluded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MatrixCell {
    pub from: String,
    pub to: String,
    pub kind: CellKind,

    /// Case id of an invalid cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MatrixRow {
    pub from: String,
    pub cells: Vec<MatrixCell>,
}

/// A single-step transition case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TransitionCase {
    /// `VC01`... for valid cases, `IC01`... for invalid ones
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: CaseKind,

    /// Events on the pair joined with ` / ` (valid cases)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub event: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TransitionMatrix {
    /// Canonical state order of both axes
    pub order: Vec<String>,
    pub rows: Vec<MatrixRow>,
    pub valid_cases: Vec<TransitionCase>,
    pub invalid_cases: Vec<TransitionCase>,
}

impl TransitionMatrix {
    pub fn count(&self, kind: CellKind) -> usize {
        self.rows
            .iter()
            .flat_map(|r| &r.cells)
            .filter(|c| c.kind == kind)
            .count()
    }

    pub fn cell(&self, from: &str, to: &str) -> Option<&MatrixCell> {
        self.rows
            .iter()
            .find(|r| r.from == from)
            .and_then(|r| r.cells.iter().find(|c| c.to == to))
    }
}

#[derive(Debug, Clone)]
pub struct MatrixOptions {
    /// Treat a missing initial→final edge as excluded rather than invalid
    pub exclude_initial_to_final: bool,
}

impl Default for MatrixOptions {
    fn default() -> Self {
        Self {
            exclude_initial_to_final: true,
        }
    }
}

/// Classify every state pair and emit one case per valid or invalid cell.
///
/// An empty transition list yields an empty matrix.
pub fn build_matrix(
    states: &[String],
    initial: &str,
    finals: &[String],
    transitions: &[Transition],
    options: &MatrixOptions,
) -> TransitionMatrix {
    if transitions.is_empty() || states.is_empty() {
        return TransitionMatrix::default();
    }

    let is_final = |s: &str| finals.iter().any(|f| f == s);

    // (from, to) -> distinct events, first seen first
    let mut edges: HashMap<(&str, &str), Vec<&str>> = HashMap::new();
    for t in transitions {
        let events = edges.entry((t.from.as_str(), t.to.as_str())).or_default();
        if !t.event.is_empty() && !events.contains(&t.event.as_str()) {
            events.push(&t.event);
        }
    }

    let order = canonical_order(states, initial, &is_final);
    let mut matrix = TransitionMatrix {
        order: order.clone(),
        ..Default::default()
    };

    for from in &order {
        let mut row = MatrixRow {
            from: from.clone(),
            cells: Vec::with_capacity(order.len()),
        };

        for to in &order {
            let edge = edges.get(&(from.as_str(), to.as_str()));
            let kind = if to == initial || is_final(from) {
                CellKind::Excluded
            } else if edge.is_some() {
                CellKind::Valid
            } else if options.exclude_initial_to_final && from == initial && is_final(to) {
                CellKind::Excluded
            } else {
                CellKind::Invalid
            };

            let mut cell = MatrixCell {
                from: from.clone(),
                to: to.clone(),
                kind,
                id: None,
            };
            match kind {
                CellKind::Valid => matrix.valid_cases.push(TransitionCase {
                    id: format!("VC{:02}", matrix.valid_cases.len() + 1),
                    from: from.clone(),
                    to: to.clone(),
                    kind: CaseKind::Valid,
                    event: edge.map(|e| e.join(" / ")).unwrap_or_default(),
                    reason: None,
                }),
                CellKind::Invalid => {
                    let id = format!("IC{:02}", matrix.invalid_cases.len() + 1);
                    cell.id = Some(id.clone());
                    matrix.invalid_cases.push(TransitionCase {
                        id,
                        from: from.clone(),
                        to: to.clone(),
                        kind: CaseKind::Invalid,
                        event: String::new(),
                        reason: Some(format!(
                            "No direct transition defined from '{}' to '{}'.",
                            from, to
                        )),
                    });
                }
                CellKind::Excluded => {}
            }
            row.cells.push(cell);
        }
        matrix.rows.push(row);
    }

    tracing::debug!(
        states = order.len(),
        valid = matrix.valid_cases.len(),
        invalid = matrix.invalid_cases.len(),
        "built transition matrix"
    );
    matrix
}

/// Initial first, other non-final states in source order, finals last
fn canonical_order(
    states: &[String],
    initial: &str,
    is_final: &impl Fn(&str) -> bool,
) -> Vec<String> {
    let mut order = vec![initial.to_string()];
    order.extend(
        states
            .iter()
            .filter(|s| s.as_str() != initial && !is_final(s))
            .cloned(),
    );
    order.extend(
        states
            .iter()
            .filter(|s| s.as_str() != initial && is_final(s))
            .cloned(),
    );
    order
}
