//! State/event tests
//!
//! One Valid case per declared transition, and one Invalid case for every
//! state × event pair the machine does not handle. The expected state of an
//! invalid case is the first target the event leads to anywhere in the
//! machine, or `Unknown`.

use super::StateMachine;
use crate::testgen::CaseKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventCase {
    pub id: String,
    pub start_state: String,
    pub event: String,
    pub expected_state: String,
    #[serde(rename = "type")]
    pub kind: CaseKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EventTests {
    pub valid: Vec<EventCase>,
    pub invalid: Vec<EventCase>,
}

pub fn generate_event_tests(machine: &StateMachine) -> EventTests {
    let handled: HashSet<(&str, &str)> = machine
        .transitions
        .iter()
        .map(|t| (t.from.as_str(), t.event.as_str()))
        .collect();

    let mut first_target: HashMap<&str, &str> = HashMap::new();
    for t in &machine.transitions {
        first_target.entry(t.event.as_str()).or_insert(t.to.as_str());
    }

    let valid = machine
        .transitions
        .iter()
        .enumerate()
        .map(|(i, t)| EventCase {
            id: format!("STV{:03}", i + 1),
            start_state: t.from.clone(),
            event: t.event.clone(),
            expected_state: t.to.clone(),
            kind: CaseKind::Valid,
        })
        .collect();

    let mut invalid = Vec::new();
    for state in &machine.states {
        for event in &machine.events {
            if handled.contains(&(state.as_str(), event.as_str())) {
                continue;
            }
            invalid.push(EventCase {
                id: format!("STI{:03}", invalid.len() + 1),
                start_state: state.clone(),
                event: event.clone(),
                expected_state: first_target
                    .get(event.as_str())
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "Unknown".to_string()),
                kind: CaseKind::Invalid,
            });
        }
    }

    EventTests { valid, invalid }
}
