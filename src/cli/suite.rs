//! Suite command: every generator in one report

use super::util::{flag_value, load_config, parse_output_arg, require_positional, write_output, OutputFormat};
use bbtgen::*;

pub fn cmd_suite(args: &[String]) -> Result<()> {
    let paths = require_positional(
        args,
        2,
        "bbtgen suite <dictionary> <decisions> [--states <statemachine>]",
    )?;
    let config = load_config(args)?;

    let mut input = SuiteInput::new(Node::from_path(paths[0])?, Node::from_path(paths[1])?);
    if let Some(states) = flag_value(args, "--states") {
        input = input.with_state_machine(Node::from_path(states)?);
    }

    let report = generate_suite(&input, &config)?;
    let content = match OutputFormat::from_args(args) {
        OutputFormat::Json => report.to_json()?,
        OutputFormat::Yaml => report.to_yaml()?,
        OutputFormat::Text => report.to_report(),
    };
    write_output(&parse_output_arg(args), &content)
}
