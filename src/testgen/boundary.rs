//! Boundary and invalid-selection cases
//!
//! Every case holds all participating inputs at a fixed baseline and moves
//! exactly one variable out of its domain.

use super::{case_id, invalid_marker, CaseKind, TestCase};
use crate::dictionary::{CaseValue, DataDictionary, Scale};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Deterministic baseline: midpoint of the lowest bucket for Range inputs,
/// first label for Nominal/Ordinal inputs
pub fn baseline_inputs(dd: &DataDictionary) -> BTreeMap<String, CaseValue> {
    dd.participating_inputs()
        .map(|var| {
            let value = match var.scale {
                Some(Scale::Range) => dd
                    .sorted_ranges(&var.name)
                    .first()
                    .and_then(|&(id, _, _)| dd.condition(id))
                    .map(|c| c.representative()),
                _ => dd
                    .conditions_for(&var.name)
                    .find_map(|c| c.label())
                    .map(CaseValue::from),
            };
            (var.name.clone(), value.unwrap_or(CaseValue::Null))
        })
        .collect()
}

/// Invalid cases for each participating input, numbered from `first_id`.
///
/// Ranges are half-open, so the probes are `min - 1` below the lowest
/// bucket and `max` of the highest bucket. Probes that leave `i64` are
/// emitted as [`CaseValue::Number`].
pub fn boundary_cases(dd: &DataDictionary, first_id: usize) -> Vec<TestCase> {
    let baseline = baseline_inputs(dd);
    let mut probes: Vec<(String, CaseValue)> = Vec::new();

    for var in dd.participating_inputs() {
        match var.scale {
            Some(Scale::Range) => {
                let ranges = dd.sorted_ranges(&var.name);
                if let (Some(&(_, min, _)), Some(&(_, _, max))) = (ranges.first(), ranges.last()) {
                    let below = min.saturating_sub(Decimal::ONE);
                    probes.push((var.name.clone(), CaseValue::from_decimal(below)));
                    // `max` itself is outside `[.., max)`, so it is the first
                    // invalid value above (9 and 30 for [10, 20), [20, 30)).
                    probes.push((var.name.clone(), CaseValue::from_decimal(max)));
                }
            }
            Some(Scale::Nominal | Scale::Ordinal) => {
                probes.push((var.name.clone(), CaseValue::Null));
            }
            Some(Scale::Interval) | None => {}
        }
    }

    probes
        .into_iter()
        .enumerate()
        .map(|(i, (name, value))| {
            let mut inputs = baseline.clone();
            let expected = BTreeMap::from([(dd.output.name.clone(), invalid_marker(&name))]);
            inputs.insert(name, value);
            TestCase {
                id: case_id(first_id + i),
                kind: CaseKind::Invalid,
                inputs,
                expected,
            }
        })
        .collect()
}
