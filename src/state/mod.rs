//! State machines: model, transition matrix, path sequences, event tests
//!
//! ```yaml
//! StateMachine:
//!   initial:
//!     $: { id: Idle }
//!     transition: { $: { event: start, target: Running } }
//!   state:
//!     - $: { id: Running }
//!       transition:
//!         - $: { event: pause, target: Paused }
//!         - $: { event: stop, target: final }
//!     - $: { id: Paused }
//!       transition: { $: { event: resume, target: Running } }
//!   final: { $: { id: Done } }
//! ```
//!
//! A target spelled `final` resolves to the only final state when exactly
//! one is declared.

mod events;
mod matrix;
mod sequence;

pub use events::{generate_event_tests, EventCase, EventTests};
pub use matrix::{build_matrix, CellKind, MatrixCell, MatrixOptions, MatrixRow, TransitionCase, TransitionMatrix};
pub use sequence::{enumerate_sequences, SequenceCase, SequenceLimits};

use crate::error::{Error, Result};
use crate::tree::Node;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Source id used for transitions out of an initial state without an id
const ANONYMOUS_INITIAL: &str = "Initial";

/// A `(from, event, to)` triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Transition {
    pub from: String,
    pub event: String,
    pub to: String,
}

impl Transition {
    pub fn new(from: &str, event: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            event: event.to_string(),
            to: to.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum StateRole {
    Initial,
    Intermediate,
    Final,
}

/// A state and its role in the machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct State {
    pub id: String,
    pub role: StateRole,
}

/// A normalized state machine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StateMachine {
    pub initial: Option<String>,
    pub finals: Vec<String>,

    /// Initial, declared and final states, first appearance wins
    pub states: Vec<String>,

    /// Distinct non-empty events, first appearance wins
    pub events: Vec<String>,
    pub transitions: Vec<Transition>,
}

impl StateMachine {
    /// Build from a `StateMachine` (or `stateMachine`) tree
    pub fn from_tree(root: &Node) -> Result<Self> {
        let machine = root
            .child_any(&["StateMachine", "stateMachine"])
            .ok_or_else(|| Error::MissingNode("StateMachine".into()))?;

        let finals: Vec<String> = machine
            .children("final")
            .iter()
            .filter_map(|f| f.attr("id"))
            .map(str::to_string)
            .collect();

        let mut sm = StateMachine {
            finals,
            ..Default::default()
        };

        if let Some(initial) = machine.child("initial") {
            sm.initial = initial.attr("id").map(str::to_string);
            if let Some(id) = &sm.initial {
                sm.states.push(id.clone());
            }
            let from = sm.initial.clone().unwrap_or_else(|| ANONYMOUS_INITIAL.into());
            sm.add_transitions(&from, initial);
        }

        for state in machine.children("state") {
            let Some(id) = state.attr("id") else {
                continue;
            };
            sm.states.push(id.to_string());
            sm.add_transitions(id, state);
        }

        sm.states.extend(sm.finals.iter().cloned());
        dedupe(&mut sm.states);

        tracing::debug!(
            states = sm.states.len(),
            transitions = sm.transitions.len(),
            events = sm.events.len(),
            "loaded state machine"
        );
        Ok(sm)
    }

    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::from_tree(&Node::from_path(path)?)
    }

    fn add_transitions(&mut self, from: &str, node: &Node) {
        for t in node.children("transition") {
            let event = t.attr("event").unwrap_or_default();
            let to = self.resolve_target(t.attr("target").unwrap_or_default());
            if !event.is_empty() && !self.events.iter().any(|e| e == event) {
                self.events.push(event.to_string());
            }
            self.transitions.push(Transition::new(from, event, &to));
        }
    }

    fn resolve_target(&self, target: &str) -> String {
        match self.finals.as_slice() {
            [only] if target.eq_ignore_ascii_case("final") => only.clone(),
            _ => target.to_string(),
        }
    }

    /// The initial state id, required for matrix and sequence generation
    pub fn initial_id(&self) -> Result<&str> {
        self.initial
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::MissingNode("StateMachine/initial@id".into()))
    }

    pub fn is_final(&self, id: &str) -> bool {
        self.finals.iter().any(|f| f == id)
    }

    pub fn role(&self, id: &str) -> StateRole {
        if self.initial.as_deref() == Some(id) {
            StateRole::Initial
        } else if self.is_final(id) {
            StateRole::Final
        } else {
            StateRole::Intermediate
        }
    }

    /// All states with their roles, in [`Self::states`] order
    pub fn state_list(&self) -> Vec<State> {
        self.states
            .iter()
            .map(|id| State {
                id: id.clone(),
                role: self.role(id),
            })
            .collect()
    }

    /// Transition matrix over this machine's states
    pub fn matrix(&self, options: &MatrixOptions) -> Result<TransitionMatrix> {
        Ok(build_matrix(
            &self.states,
            self.initial_id()?,
            &self.finals,
            &self.transitions,
            options,
        ))
    }

    /// Terminal path sequences from the initial state
    pub fn sequences(&self, limits: SequenceLimits) -> Result<Vec<SequenceCase>> {
        enumerate_sequences(self.initial_id()?, &self.transitions, &self.finals, limits)
    }
}

fn dedupe(items: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    items.retain(|s| seen.insert(s.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn machine() -> StateMachine {
        let tree = Node::from_value(&json!({ "StateMachine": {
            "initial": { "$": { "id": "Idle" },
                         "transition": { "$": { "event": "start", "target": "Running" } } },
            "state": [
                { "$": { "id": "Running" }, "transition": [
                    { "$": { "event": "pause", "target": "Paused" } },
                    { "$": { "event": "stop", "target": "FINAL" } }
                ]},
                { "$": { "id": "Paused" }, "transition":
                    { "$": { "event": "resume", "target": "Running" } } },
                { "transition": { "$": { "event": "ignored", "target": "Idle" } } }
            ],
            "final": { "$": { "id": "Done" } }
        }}))
        .unwrap();
        StateMachine::from_tree(&tree).unwrap()
    }

    #[test]
    fn test_load_machine() {
        let sm = machine();
        assert_eq!(sm.initial.as_deref(), Some("Idle"));
        assert_eq!(sm.finals, vec!["Done"]);
        assert_eq!(sm.states, vec!["Idle", "Running", "Paused", "Done"]);
        assert_eq!(sm.events, vec!["start", "pause", "stop", "resume"]);
        assert_eq!(sm.transitions[2], Transition::new("Running", "stop", "Done"));
        assert_eq!(sm.transitions.len(), 4);
    }

    #[test]
    fn test_roles() {
        let sm = machine();
        let roles: Vec<_> = sm.state_list().into_iter().map(|s| s.role).collect();
        assert_eq!(
            roles,
            vec![
                StateRole::Initial,
                StateRole::Intermediate,
                StateRole::Intermediate,
                StateRole::Final
            ]
        );
    }

    #[test]
    fn test_lowercase_root_and_anonymous_initial() {
        let tree = Node::from_value(&json!({ "stateMachine": {
            "initial": { "transition": { "$": { "event": "go", "target": "A" } } },
            "state": { "$": { "id": "A" } }
        }}))
        .unwrap();
        let sm = StateMachine::from_tree(&tree).unwrap();
        assert_eq!(sm.initial, None);
        assert_eq!(sm.transitions[0].from, "Initial");
        assert!(matches!(sm.initial_id(), Err(Error::MissingNode(_))));
        assert!(sm.sequences(SequenceLimits::default()).is_err());
    }

    #[test]
    fn test_final_alias_needs_single_final() {
        let tree = Node::from_value(&json!({ "StateMachine": {
            "initial": { "$": { "id": "S" },
                         "transition": { "$": { "event": "e", "target": "final" } } },
            "final": [ { "$": { "id": "F1" } }, { "$": { "id": "F2" } } ]
        }}))
        .unwrap();
        let sm = StateMachine::from_tree(&tree).unwrap();
        assert_eq!(sm.transitions[0].to, "final");
    }

    #[test]
    fn test_missing_root() {
        let tree = Node::from_value(&json!({ "Machine": {} })).unwrap();
        assert!(matches!(
            StateMachine::from_tree(&tree),
            Err(Error::MissingNode(_))
        ));
    }
}
