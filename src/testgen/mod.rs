//! Test generation: functional cases from a dictionary and decision table
//!
//! Produces:
//! - one **Valid** case per decision rule whose references resolve
//! - **Invalid** boundary cases per participating input: just below the
//!   lowest and at the upper edge of a Range variable, null for a
//!   Nominal/Ordinal variable
//!
//! Rules that do not resolve are skipped and reported as diagnostics.

mod boundary;
mod rules;

pub use boundary::{baseline_inputs, boundary_cases};
pub use rules::resolve_rule;

use crate::decision::DecisionTable;
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::dictionary::{CaseValue, DataDictionary};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Whether a case expects normal behavior or a rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum CaseKind {
    Valid,
    Invalid,
}

impl fmt::Display for CaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseKind::Valid => write!(f, "Valid"),
            CaseKind::Invalid => write!(f, "Invalid"),
        }
    }
}

/// A functional test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TestCase {
    /// `TC001`, `TC002`, ...
    pub id: String,
    #[serde(rename = "type")]
    pub kind: CaseKind,
    pub inputs: BTreeMap<String, CaseValue>,
    pub expected: BTreeMap<String, CaseValue>,
}

/// Cases plus the rules that produced none
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DecisionOutcome {
    pub test_cases: Vec<TestCase>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DecisionOutcome {
    pub fn count(&self, kind: CaseKind) -> usize {
        self.test_cases.iter().filter(|c| c.kind == kind).count()
    }
}

/// Format a case id from its 1-based number
pub fn case_id(n: usize) -> String {
    format!("TC{:03}", n)
}

/// Sentinel expected output of a negative case
pub fn invalid_marker(variable: &str) -> CaseValue {
    CaseValue::Text(format!("Invalid {}", variable))
}

/// Generate valid rule cases followed by boundary cases
pub fn generate_test_cases(dd: &DataDictionary, table: &DecisionTable) -> DecisionOutcome {
    let mut outcome = DecisionOutcome::default();

    for numbered in &table.rules {
        match resolve_rule(dd, &numbered.rule) {
            Ok((inputs, expected)) => outcome.test_cases.push(TestCase {
                id: case_id(numbered.position),
                kind: CaseKind::Valid,
                inputs,
                expected,
            }),
            Err(missing) => {
                let d = Diagnostic::warning(
                    DiagnosticCode::UnresolvedReference,
                    format!("Rule {} skipped: {}", numbered.position, missing),
                )
                .with_subject(numbered.position.to_string());
                d.log();
                outcome.diagnostics.push(d);
            }
        }
    }

    for &position in &table.unrecognized {
        let d = Diagnostic::warning(
            DiagnosticCode::UnrecognizedRule,
            format!(
                "Rule {} skipped: neither a single-level nor a nested decision",
                position
            ),
        )
        .with_subject(position.to_string());
        d.log();
        outcome.diagnostics.push(d);
    }

    // Numbering continues after the last source rule so skipped rules never
    // cause an id collision.
    outcome
        .test_cases
        .extend(boundary_cases(dd, table.len() + 1));

    tracing::debug!(
        valid = outcome.count(CaseKind::Valid),
        invalid = outcome.count(CaseKind::Invalid),
        skipped = outcome.diagnostics.len(),
        "generated decision cases"
    );
    outcome
}
