//! State machine commands: matrix, sequences, events

use super::util::{emit, load_config, require_positional};
use bbtgen::*;
use std::fmt::Write;

pub fn cmd_matrix(args: &[String]) -> Result<()> {
    let paths = require_positional(
        args,
        1,
        "bbtgen matrix <statemachine> [--include-initial-final]",
    )?;
    let config = load_config(args)?;

    let machine = StateMachine::from_path(paths[0])?;
    let matrix = machine.matrix(&config.matrix_options())?;

    emit(args, &matrix, || matrix_text(&matrix))
}

pub fn cmd_sequences(args: &[String]) -> Result<()> {
    let paths = require_positional(
        args,
        1,
        "bbtgen sequences <statemachine> [--max-depth N] [--max-repeats N]",
    )?;
    let config = load_config(args)?;

    let machine = StateMachine::from_path(paths[0])?;
    let sequences = machine.sequences(config.sequence_limits())?;

    emit(args, &sequences, || {
        let mut out = String::new();
        for case in &sequences {
            let _ = writeln!(out, "{}: {}", case.id, case.sequence.join(" -> "));
        }
        out
    })
}

pub fn cmd_events(args: &[String]) -> Result<()> {
    let paths = require_positional(args, 1, "bbtgen events <statemachine>")?;
    let machine = StateMachine::from_path(paths[0])?;
    let tests = generate_event_tests(&machine);

    emit(args, &tests, || {
        let mut out = String::new();
        for case in tests.valid.iter().chain(&tests.invalid) {
            let _ = writeln!(
                out,
                "{} {:<7} {} --{}--> {}",
                case.id, case.kind, case.start_state, case.event, case.expected_state
            );
        }
        out
    })
}

/// Grid with `V` for valid, the case id for invalid and `-` for excluded cells
fn matrix_text(matrix: &TransitionMatrix) -> String {
    let mut out = String::new();
    let width = matrix
        .order
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(4);

    let _ = write!(out, "{:<width$}", "", width = width);
    for to in &matrix.order {
        let _ = write!(out, " {:<width$}", to, width = width);
    }
    let _ = writeln!(out);

    for row in &matrix.rows {
        let _ = write!(out, "{:<width$}", row.from, width = width);
        for cell in &row.cells {
            let mark = match cell.kind {
                CellKind::Valid => "V",
                CellKind::Invalid => cell.id.as_deref().unwrap_or("I"),
                CellKind::Excluded => "-",
            };
            let _ = write!(out, " {:<width$}", mark, width = width);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out);
    for case in matrix.valid_cases.iter().chain(&matrix.invalid_cases) {
        let detail = case.reason.as_deref().unwrap_or(&case.event);
        let _ = writeln!(out, "{} {} -> {}: {}", case.id, case.from, case.to, detail);
    }
    out
}
