//! Dictionary commands: partitions, cases, syntax

use super::util::{emit, load_config, require_positional, seeded_rng};
use bbtgen::*;
use std::fmt::Write;

pub fn cmd_partitions(args: &[String]) -> Result<()> {
    let paths = require_positional(args, 1, "bbtgen partitions <dictionary>")?;
    let config = load_config(args)?;

    let dd = DataDictionary::from_path(paths[0])?;
    dd.check_ranges(config.strict_ranges)?;
    let partitions = build_partitions(&dd, &mut seeded_rng(&config));

    emit(args, &partitions, || partitions_text(&partitions))
}

pub fn cmd_cases(args: &[String]) -> Result<()> {
    let paths = require_positional(args, 2, "bbtgen cases <dictionary> <decisions>")?;
    let config = load_config(args)?;

    let dd = DataDictionary::from_path(paths[0])?;
    let table = DecisionTable::from_path(paths[1])?;
    dd.check_ranges(config.strict_ranges)?;
    let outcome = generate_test_cases(&dd, &table);

    emit(args, &outcome, || cases_text(&outcome))
}

pub fn cmd_syntax(args: &[String]) -> Result<()> {
    let paths = require_positional(args, 1, "bbtgen syntax <dictionary>")?;
    let config = load_config(args)?;

    let (defs, mut diagnostics) = syntax_definitions_from_tree(&Node::from_path(paths[0])?);
    let mut outcome = synthesize_all(&defs, &config.syntax_options(), &mut seeded_rng(&config));
    diagnostics.append(&mut outcome.diagnostics);
    outcome.diagnostics = diagnostics;

    emit(args, &outcome, || syntax_text(&outcome))
}

fn partitions_text(partitions: &[Partition]) -> String {
    let mut out = String::new();
    for p in partitions {
        let _ = writeln!(out, "{}", p.name);
        for item in &p.items {
            let _ = writeln!(out, "  {:<12} {:<20} sample: {}", item.id, item.label, item.sample);
        }
    }
    out
}

fn cases_text(outcome: &DecisionOutcome) -> String {
    let mut out = String::new();
    for case in &outcome.test_cases {
        let inputs: Vec<_> = case
            .inputs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        let expected: Vec<_> = case
            .expected
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        let _ = writeln!(
            out,
            "{} {:<7} {} -> {}",
            case.id,
            case.kind,
            inputs.join(", "),
            expected.join(", ")
        );
    }
    let _ = writeln!(
        out,
        "\n{} valid, {} invalid",
        outcome.count(CaseKind::Valid),
        outcome.count(CaseKind::Invalid)
    );
    for d in &outcome.diagnostics {
        let _ = writeln!(out, "{}", d);
    }
    out
}

fn syntax_text(outcome: &SyntaxOutcome) -> String {
    let mut out = String::new();
    for case in &outcome.cases {
        let v = &case.test_cases;
        let _ = writeln!(out, "{} /{}/", case.name, case.regex);
        let _ = writeln!(out, "  valid:        {}", v.valid);
        let _ = writeln!(out, "  value:        {}", v.invalid_value);
        let _ = writeln!(out, "  substitution: {}", v.invalid_substitution);
        let _ = writeln!(out, "  omission:     {}", v.invalid_omission);
        let _ = writeln!(out, "  addition:     {}", v.invalid_addition);
    }
    for d in &outcome.diagnostics {
        let _ = writeln!(out, "{}", d);
    }
    out
}
