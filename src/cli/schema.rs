//! Schema command: JSON schema of each output record

use bbtgen::*;

const SCHEMAS: &str = "report, partitions, cases, syntax, matrix, sequences, events, config";

pub fn cmd_schema(args: &[String]) -> Result<()> {
    let schema_name = args.first().map(|s| s.as_str()).unwrap_or("list");

    match schema_name {
        "list" => {
            println!("Available schemas: {}", SCHEMAS);
            Ok(())
        }
        "report" => print_schema::<GenerationReport>(),
        "partitions" => print_schema::<Vec<Partition>>(),
        "cases" => print_schema::<DecisionOutcome>(),
        "syntax" => print_schema::<SyntaxOutcome>(),
        "matrix" => print_schema::<TransitionMatrix>(),
        "sequences" => print_schema::<Vec<SequenceCase>>(),
        "events" => print_schema::<EventTests>(),
        "config" => print_schema::<GenerationConfig>(),
        _ => Err(format!("Unknown schema: {} (available: {})", schema_name, SCHEMAS).into()),
    }
}

fn print_schema<T: schemars::JsonSchema>() -> Result<()> {
    let schema = schemars::schema_for!(T);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
