//! CLI command implementations
//!
//! This module contains all CLI command handlers, organized by input:
//! - `dictionary`: partitions, decision cases, syntax cases
//! - `state`: transition matrix, sequences, state/event cases
//! - `suite`: everything in one report
//! - `schema`: JSON schemas of the output records
//! - `util`: Shared utility functions

pub mod dictionary;
pub mod schema;
pub mod state;
pub mod suite;
pub mod util;

pub use dictionary::{cmd_cases, cmd_partitions, cmd_syntax};
pub use schema::cmd_schema;
pub use state::{cmd_events, cmd_matrix, cmd_sequences};
pub use suite::cmd_suite;
