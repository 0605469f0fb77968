// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # bbtgen: black-box test generation
//!
//! Derives black-box test artifacts from three specification documents:
//!
//! - a **data dictionary** (input variables, their conditions, output actions,
//!   pattern-governed fields)
//! - a **decision table** mapping conditions to actions
//! - a **state machine** (initial, intermediate and final states with
//!   labelled transitions)
//!
//! From these it produces equivalence-class partitions, decision cases with
//! boundary probes, syntax strings with mutations, a transition matrix,
//! path sequences and state/event cases.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bbtgen::{generate_suite, GenerationConfig, Node, SuiteInput};
//!
//! let input = SuiteInput::new(
//!     Node::from_path("dictionary.yaml")?,
//!     Node::from_path("decisions.yaml")?,
//! )
//! .with_state_machine(Node::from_path("states.yaml")?);
//!
//! let config = GenerationConfig { seed: Some(42), ..Default::default() };
//! let report = generate_suite(&input, &config)?;
//! println!("{}", report.to_report());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │  TREE (JSON/YAML)                                            │
//! │       │                                                      │
//! │       ├──► DataDictionary ──┬──► build_partitions            │
//! │       │                     ├──► synthesize_all              │
//! │       ├──► DecisionTable ───┴──► generate_test_cases         │
//! │       │                                                      │
//! │       └──► StateMachine ────┬──► build_matrix                │
//! │                             ├──► enumerate_sequences         │
//! │                             └──► generate_event_tests        │
//! │                                                              │
//! │  generate_suite runs all of the above ──► GenerationReport   │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Randomness (partition samples, pattern output, mutations) always comes
//! from a caller-supplied RNG, so a seeded run is reproducible.

pub mod config;
pub mod decision;
pub mod diagnostic;
pub mod dictionary;
pub mod error;
pub mod partition;
pub mod state;
pub mod suite;
pub mod syntax;
pub mod testgen;
pub mod tree;

// Re-exports
pub use config::GenerationConfig;
pub use decision::{DecisionRule, DecisionTable, NumberedRule};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use dictionary::{
    syntax_definitions_from_tree, Action, CaseValue, Condition, ConditionBound, DataDictionary,
    Scale, Variable,
};
pub use error::{Error, Result};
pub use partition::{build_partitions, Partition, PartitionItem, PartitionKind};
pub use state::{
    build_matrix, enumerate_sequences, generate_event_tests, CellKind, EventCase, EventTests,
    MatrixCell, MatrixOptions, MatrixRow, SequenceCase, SequenceLimits, State, StateMachine,
    StateRole, Transition, TransitionCase, TransitionMatrix,
};
pub use suite::{generate_suite, GenerationReport, StateReport, SuiteInput};
pub use syntax::{
    mutate, random_date, synthesize, synthesize_all, PatternGenerator, SyntaxDefinition,
    SyntaxOptions, SyntaxOutcome, SyntaxTestCase, SyntaxVariants,
};
pub use testgen::{generate_test_cases, CaseKind, DecisionOutcome, TestCase};
pub use tree::{Node, TreeFormat};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
