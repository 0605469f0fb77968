//! bbtgen CLI - Command-line interface
//!
//! Commands:
//!   partitions - Equivalence classes of a data dictionary
//!   cases      - Decision cases with boundary probes
//!   syntax     - Valid and mutated strings for pattern fields
//!   matrix     - Single-step transition coverage
//!   sequences  - Multi-step paths through a state machine
//!   events     - State/event cases
//!   suite      - Everything in one report

mod cli;

use bbtgen::VERSION;
use cli::*;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    init_logging(args.iter().any(|a| a == "--verbose" || a == "-v"));

    let result = match args[1].as_str() {
        "partitions" => cmd_partitions(&args[2..]),
        "cases" => cmd_cases(&args[2..]),
        "syntax" => cmd_syntax(&args[2..]),
        "matrix" => cmd_matrix(&args[2..]),
        "sequences" => cmd_sequences(&args[2..]),
        "events" => cmd_events(&args[2..]),
        "suite" => cmd_suite(&args[2..]),
        "schema" => cmd_schema(&args[2..]),
        "version" | "--version" => {
            println!("bbtgen {}", VERSION);
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            Err("Unknown command".into())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(1)
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    println!(
        r#"
bbtgen - black-box test generation

USAGE:
    bbtgen <COMMAND> [OPTIONS]

COMMANDS:
    partitions <dictionary>                  Equivalence-class partitions
    cases <dictionary> <decisions>           Decision cases with boundary probes
    syntax <dictionary>                      Valid and mutated pattern strings
    matrix <statemachine>                    Transition matrix
    sequences <statemachine>                 State sequences
    events <statemachine>                    State/event cases
    suite <dictionary> <decisions>           All of the above in one report
    schema [name]                            Print JSON schema for an output record
    version                                  Print version

OPTIONS:
    --seed <n>                 Seed the random source (default: drawn and logged)
    --config <file>            Generation config (YAML)
    --json | --yaml            Structured output (default: text)
    --output, -o <file>        Output file (default: stdout)
    --strict                   Abort on overlapping or inverted ranges
    --states <statemachine>    State machine for the suite command
    --include-initial-final    Report a missing initial->final edge as invalid (matrix)
    --max-depth <n>            Maximum transitions per sequence (default: 8)
    --max-repeats <n>          Maximum visits per state in a sequence (default: 2)
    --verbose, -v              Debug logging (RUST_LOG overrides)

Specification documents are attribute-tagged trees in JSON or YAML
(.json, .yaml, .yml).

EXAMPLES:
    bbtgen partitions dictionary.yaml --seed 42
    bbtgen cases dictionary.yaml decisions.yaml --json
    bbtgen sequences states.yaml --max-depth 5
    bbtgen suite dictionary.yaml decisions.yaml --states states.yaml -o suite.json --json
"#
    );
}
