//! Path sequences: multi-step coverage scenarios
//!
//! Depth-first exploration from the initial state using an explicit stack.
//! A path is recorded only when it is terminal:
//! - it ends in a final state
//! - every successor has already been visited `max_repeats_per_state` times
//!   on this path (dead end)
//! - it has taken `max_depth` transitions
//!
//! Identical paths are recorded once, in discovery order.

use super::Transition;
use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Exploration bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SequenceLimits {
    /// Maximum transitions per path
    pub max_depth: usize,
    /// Maximum occurrences of one state in a path
    pub max_repeats_per_state: usize,
}

impl Default for SequenceLimits {
    fn default() -> Self {
        Self {
            max_depth: 8,
            max_repeats_per_state: 2,
        }
    }
}

/// One complete path from the initial state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SequenceCase {
    /// `SEQ001`, `SEQ002`, ...
    pub id: String,
    pub sequence: Vec<String>,
}

/// Enumerate terminal paths from `initial`.
///
/// An empty transition list yields no sequences.
pub fn enumerate_sequences(
    initial: &str,
    transitions: &[Transition],
    finals: &[String],
    limits: SequenceLimits,
) -> Result<Vec<SequenceCase>> {
    if initial.is_empty() {
        return Err(Error::MissingNode("initial state id".into()));
    }
    if transitions.is_empty() {
        return Ok(Vec::new());
    }

    // Successors per state, distinct, in transition order
    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
    for t in transitions {
        let next = successors.entry(t.from.as_str()).or_default();
        if !next.contains(&t.to.as_str()) {
            next.push(&t.to);
        }
    }
    let is_final = |s: &str| finals.iter().any(|f| f == s);

    let mut seen: HashSet<Vec<&str>> = HashSet::new();
    let mut paths: Vec<Vec<&str>> = Vec::new();
    let mut stack: Vec<Vec<&str>> = vec![vec![initial]];
    let mut explored = 0usize;

    while let Some(path) = stack.pop() {
        explored += 1;
        let Some(&current) = path.last() else {
            continue;
        };
        let depth = path.len() - 1;

        let eligible: Vec<&str> = successors
            .get(current)
            .map(|next| {
                next.iter()
                    .copied()
                    .filter(|n| {
                        path.iter().filter(|p| *p == n).count() < limits.max_repeats_per_state
                    })
                    .collect()
            })
            .unwrap_or_default();

        if is_final(current) || depth >= limits.max_depth || eligible.is_empty() {
            if seen.insert(path.clone()) {
                paths.push(path);
            }
            continue;
        }

        // Reverse so the first successor is explored first
        for next in eligible.into_iter().rev() {
            let mut extended = path.clone();
            extended.push(next);
            stack.push(extended);
        }
    }

    tracing::debug!(explored, sequences = paths.len(), "enumerated state sequences");

    Ok(paths
        .into_iter()
        .enumerate()
        .map(|(i, path)| SequenceCase {
            id: format!("SEQ{:03}", i + 1),
            sequence: path.into_iter().map(str::to_string).collect(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn finals(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sequences(cases: &[SequenceCase]) -> Vec<Vec<&str>> {
        cases
            .iter()
            .map(|c| c.sequence.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn test_linear_machine_single_sequence() {
        let cases = enumerate_sequences(
            "Initial",
            &[
                Transition::new("Initial", "go", "Mid"),
                Transition::new("Mid", "done", "Final"),
            ],
            &finals(&["Final"]),
            SequenceLimits::default(),
        )
        .unwrap();
        assert_eq!(sequences(&cases), vec![vec!["Initial", "Mid", "Final"]]);
        assert_eq!(cases[0].id, "SEQ001");
    }

    #[test]
    fn test_branches_in_discovery_order() {
        let cases = enumerate_sequences(
            "S",
            &[
                Transition::new("S", "a", "A"),
                Transition::new("S", "b", "B"),
                Transition::new("A", "f", "F"),
                Transition::new("B", "f", "F"),
            ],
            &finals(&["F"]),
            SequenceLimits::default(),
        )
        .unwrap();
        assert_eq!(
            sequences(&cases),
            vec![vec!["S", "A", "F"], vec!["S", "B", "F"]]
        );
    }

    #[test]
    fn test_loop_bounded_by_repeats() {
        let cases = enumerate_sequences(
            "S",
            &[
                Transition::new("S", "go", "A"),
                Transition::new("A", "again", "A"),
                Transition::new("A", "end", "F"),
            ],
            &finals(&["F"]),
            SequenceLimits::default(),
        )
        .unwrap();
        assert_eq!(
            sequences(&cases),
            vec![vec!["S", "A", "A", "F"], vec!["S", "A", "F"]]
        );
    }

    #[test]
    fn test_depth_cap_records_path() {
        let cases = enumerate_sequences(
            "S",
            &[Transition::new("S", "n", "A"), Transition::new("A", "n", "B")],
            &[],
            SequenceLimits {
                max_depth: 1,
                max_repeats_per_state: 2,
            },
        )
        .unwrap();
        assert_eq!(sequences(&cases), vec![vec!["S", "A"]]);
    }

    #[test]
    fn test_duplicate_edges_deduplicated() {
        let cases = enumerate_sequences(
            "S",
            &[Transition::new("S", "x", "F"), Transition::new("S", "y", "F")],
            &finals(&["F"]),
            SequenceLimits::default(),
        )
        .unwrap();
        assert_eq!(cases.len(), 1);
    }

    #[test]
    fn test_empty_transitions_and_missing_initial() {
        assert!(enumerate_sequences("S", &[], &[], SequenceLimits::default())
            .unwrap()
            .is_empty());
        assert!(matches!(
            enumerate_sequences("", &[Transition::new("S", "e", "F")], &[], SequenceLimits::default()),
            Err(Error::MissingNode(_))
        ));
    }
}
