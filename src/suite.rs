//! Suite generation: every generator in one run
//!
//! Loads the model from the input trees, seeds one random source and runs
//! the partition, decision and syntax generators, plus the state generators
//! when a state machine is supplied. The report records the seed and a
//! digest of the inputs so the run can be identified and reproduced.

use crate::config::GenerationConfig;
use crate::decision::DecisionTable;
use crate::diagnostic::Diagnostic;
use crate::dictionary::DataDictionary;
use crate::error::Result;
use crate::partition::{build_partitions, Partition};
use crate::state::{generate_event_tests, EventTests, SequenceCase, StateMachine, TransitionMatrix};
use crate::syntax::{synthesize_all, SyntaxTestCase};
use crate::testgen::{generate_test_cases, CaseKind, TestCase};
use crate::tree::Node;
use rand::rngs::StdRng;
use rand::SeedableRng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Write;

/// Input trees for one run
#[derive(Debug, Clone, Default)]
pub struct SuiteInput {
    pub dictionary: Node,
    pub decisions: Node,
    pub state_machine: Option<Node>,
}

impl SuiteInput {
    pub fn new(dictionary: Node, decisions: Node) -> Self {
        Self {
            dictionary,
            decisions,
            state_machine: None,
        }
    }

    pub fn with_state_machine(mut self, tree: Node) -> Self {
        self.state_machine = Some(tree);
        self
    }

    /// SHA-256 over the canonical JSON of every input tree
    pub fn digest(&self) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_vec(&self.dictionary)?);
        hasher.update(serde_json::to_vec(&self.decisions)?);
        if let Some(sm) = &self.state_machine {
            hasher.update(serde_json::to_vec(sm)?);
        }
        Ok(hex::encode(hasher.finalize()))
    }
}

/// State-machine half of a report
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct StateReport {
    pub matrix: TransitionMatrix,
    pub sequences: Vec<SequenceCase>,
    pub events: EventTests,
}

/// Everything generated in one run
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenerationReport {
    pub version: String,

    /// Seed of the run; pass it back to reproduce the output
    pub seed: u64,

    /// Hex SHA-256 of the input trees
    pub input_digest: String,

    pub partitions: Vec<Partition>,
    pub test_cases: Vec<TestCase>,
    pub syntax_cases: Vec<SyntaxTestCase>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<StateReport>,

    pub diagnostics: Vec<Diagnostic>,
}

/// Run every generator over `input`
pub fn generate_suite(input: &SuiteInput, config: &GenerationConfig) -> Result<GenerationReport> {
    config.validate()?;

    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    tracing::info!(seed, "generating suite");

    let dd = DataDictionary::from_tree(&input.dictionary)?;
    let table = DecisionTable::from_tree(&input.decisions)?;

    let mut diagnostics = dd.diagnostics.clone();
    diagnostics.extend(dd.check_ranges(config.strict_ranges)?);

    let partitions = build_partitions(&dd, &mut rng);

    let decision = generate_test_cases(&dd, &table);
    diagnostics.extend(decision.diagnostics);

    let syntax = synthesize_all(&dd.syntax, &config.syntax_options(), &mut rng);
    diagnostics.extend(syntax.diagnostics);

    let state = match &input.state_machine {
        Some(tree) => {
            let machine = StateMachine::from_tree(tree)?;
            Some(StateReport {
                matrix: machine.matrix(&config.matrix_options())?,
                sequences: machine.sequences(config.sequence_limits())?,
                events: generate_event_tests(&machine),
            })
        }
        None => None,
    };

    let report = GenerationReport {
        version: crate::VERSION.to_string(),
        seed,
        input_digest: input.digest()?,
        partitions,
        test_cases: decision.test_cases,
        syntax_cases: syntax.cases,
        state,
        diagnostics,
    };

    tracing::info!(
        partitions = report.partitions.len(),
        cases = report.test_cases.len(),
        syntax = report.syntax_cases.len(),
        diagnostics = report.diagnostics.len(),
        "suite generated"
    );
    Ok(report)
}

impl GenerationReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_norway::to_string(self)?)
    }

    /// Human-readable summary
    pub fn to_report(&self) -> String {
        let mut out = String::new();
        let valid = self.test_cases.iter().filter(|c| c.kind == CaseKind::Valid).count();

        let _ = writeln!(out, "bbtgen {} (seed {})", self.version, self.seed);
        let _ = writeln!(out, "input digest: {}", self.input_digest);
        let _ = writeln!(out);

        let _ = writeln!(out, "Partitions: {}", self.partitions.len());
        for p in &self.partitions {
            let labels: Vec<_> = p.items.iter().map(|i| i.label.as_str()).collect();
            let _ = writeln!(out, "  {}: {}", p.name, labels.join(" | "));
        }

        let _ = writeln!(
            out,
            "Test cases: {} ({} valid, {} invalid)",
            self.test_cases.len(),
            valid,
            self.test_cases.len() - valid
        );
        let _ = writeln!(out, "Syntax cases: {}", self.syntax_cases.len());

        if let Some(state) = &self.state {
            let _ = writeln!(
                out,
                "Transitions: {} valid, {} invalid over {} states",
                state.matrix.valid_cases.len(),
                state.matrix.invalid_cases.len(),
                state.matrix.order.len()
            );
            let _ = writeln!(out, "Sequences: {}", state.sequences.len());
            let _ = writeln!(
                out,
                "Event tests: {} valid, {} invalid",
                state.events.valid.len(),
                state.events.invalid.len()
            );
        }

        if !self.diagnostics.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Diagnostics:");
            for d in &self.diagnostics {
                let _ = writeln!(out, "  {}", d);
            }
        }
        out
    }
}
