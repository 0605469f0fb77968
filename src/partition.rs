//! Equivalence-class partitions
//!
//! Every Range input is split into buckets covering the whole number line:
//!
//! ```text
//! (-∞, 10)   [10, 20)   [20, 30)   [30, ∞)
//! underflow  condition  condition  overflow
//! ```
//!
//! Nominal/Ordinal inputs get one bucket per distinct label plus a `none`
//! bucket for a missing selection. The output variable is partitioned the
//! same way from its actions. A partition left with only the `none` bucket
//! says nothing and is dropped.

use crate::dictionary::{midpoint, CaseValue, DataDictionary, Scale};
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Partition of one variable's domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Partition {
    /// Variable name
    pub name: String,
    pub items: Vec<PartitionItem>,
}

/// One equivalence class and its representative sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PartitionItem {
    pub id: String,
    pub label: String,
    pub sample: CaseValue,
    pub kind: PartitionKind,

    /// Inclusive lower edge of a numeric bucket (`None` = -∞)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<Decimal>,

    /// Exclusive upper edge of a numeric bucket (`None` = +∞)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PartitionKind {
    Underflow,
    Bucket,
    Overflow,
    Category,
    None,
}

impl PartitionItem {
    fn none() -> Self {
        Self {
            id: "none".into(),
            label: "None".into(),
            sample: CaseValue::Null,
            kind: PartitionKind::None,
            lower: None,
            upper: None,
        }
    }

    fn category(id: &str, label: String, sample: &str) -> Self {
        Self {
            id: id.to_string(),
            label,
            sample: CaseValue::Text(sample.to_string()),
            kind: PartitionKind::Category,
            lower: None,
            upper: None,
        }
    }
}

/// Partition every input (source order) and then the output
pub fn build_partitions(dd: &DataDictionary, rng: &mut impl Rng) -> Vec<Partition> {
    let mut partitions = Vec::new();

    for var in &dd.inputs {
        let items = match var.scale {
            Some(Scale::Range) => range_items(dd, &var.name, rng),
            Some(Scale::Nominal | Scale::Ordinal) => category_items(
                dd.conditions_for(&var.name)
                    .filter_map(|c| c.label().map(|l| (c.id.as_str(), l))),
                |label| label.to_string(),
            ),
            Some(Scale::Interval) | None => continue,
        };
        partitions.push(Partition {
            name: var.name.clone(),
            items,
        });
    }

    let percent = dd.output.scale == Some(Scale::Interval);
    partitions.push(Partition {
        name: dd.output.name.clone(),
        items: category_items(
            dd.actions.iter().map(|a| (a.id.as_str(), a.value.as_str())),
            |value| {
                if percent {
                    format!("{}%", value)
                } else {
                    value.to_string()
                }
            },
        ),
    });

    let total = partitions.len();
    partitions.retain(|p| p.items.iter().any(|i| i.kind != PartitionKind::None));
    tracing::debug!(
        kept = partitions.len(),
        dropped = total - partitions.len(),
        "built partitions"
    );
    partitions
}

fn range_items(dd: &DataDictionary, variable: &str, rng: &mut impl Rng) -> Vec<PartitionItem> {
    let ranges = dd.sorted_ranges(variable);
    let (Some(&(_, first_min, _)), Some(&(_, _, last_max))) = (ranges.first(), ranges.last())
    else {
        return Vec::new();
    };

    let mut items = Vec::with_capacity(ranges.len() + 2);
    items.push(PartitionItem {
        id: "underflow".into(),
        label: format!("(-∞, {})", first_min),
        sample: CaseValue::from_decimal(underflow_sample(first_min, rng)),
        kind: PartitionKind::Underflow,
        lower: None,
        upper: Some(first_min),
    });

    for &(id, min, max) in &ranges {
        items.push(PartitionItem {
            id: id.to_string(),
            label: format!("[{}, {})", min, max),
            sample: CaseValue::from_decimal(midpoint(min, max)),
            kind: PartitionKind::Bucket,
            lower: Some(min),
            upper: Some(max),
        });
    }

    items.push(PartitionItem {
        id: "overflow".into(),
        label: format!("[{}, ∞)", last_max),
        sample: CaseValue::from_decimal(overflow_sample(last_max, rng)),
        kind: PartitionKind::Overflow,
        lower: Some(last_max),
        upper: None,
    });
    items
}

/// Integer uniform in `[0, first_min)`, or just below `first_min` when that
/// band is empty
fn underflow_sample(first_min: Decimal, rng: &mut impl Rng) -> Decimal {
    if first_min > Decimal::ZERO {
        let end = first_min.ceil().to_i64().unwrap_or(i64::MAX);
        Decimal::from(rng.gen_range(0..end))
    } else {
        first_min.saturating_sub(Decimal::ONE)
    }
}

/// `last_max` plus an integer offset in `[1, last_max)`, or plus one when
/// that band is empty
fn overflow_sample(last_max: Decimal, rng: &mut impl Rng) -> Decimal {
    let end = last_max.floor().to_i64().unwrap_or(i64::MAX);
    let offset = if end > 1 { rng.gen_range(1..end) } else { 1 };
    last_max.saturating_add(Decimal::from(offset))
}

/// One item per distinct value (first id wins) plus the `none` sentinel
fn category_items<'a>(
    entries: impl Iterator<Item = (&'a str, &'a str)>,
    label: impl Fn(&str) -> String,
) -> Vec<PartitionItem> {
    let mut items: Vec<PartitionItem> = Vec::new();
    for (id, value) in entries {
        if items.iter().any(|i| i.sample == CaseValue::Text(value.to_string())) {
            continue;
        }
        items.push(PartitionItem::category(id, label(value), value));
    }
    items.push(PartitionItem::none());
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Node;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn dictionary(output_scale: &str, actions: serde_json::Value) -> DataDictionary {
        let tree = Node::from_value(&json!({ "UC": { "Usecase": {
            "Input": [
                { "Varname": "Price", "Scale": "Range", "Condition": [
                    { "$": { "id": "C2", "min": "20", "max": "30" } },
                    { "$": { "id": "C1", "min": "10", "max": "20" } }
                ]},
                { "Varname": "Type", "Scale": "Nominal", "Condition": [
                    { "$": { "id": "T1", "value": "Member" } },
                    { "$": { "id": "T2", "value": "Guest" } },
                    { "$": { "id": "T3", "value": "Member" } }
                ]},
                { "Varname": "Empty", "Scale": "Ordinal" }
            ],
            "Output": { "Varname": "Discount", "Scale": output_scale, "Action": actions }
        }}}))
        .unwrap();
        DataDictionary::from_tree(&tree).unwrap()
    }

    #[test]
    fn test_range_partition_sorted_and_contiguous() {
        let dd = dictionary("Ordinal", json!({ "$": { "id": "A1", "value": "5" } }));
        let mut rng = StdRng::seed_from_u64(1);
        let parts = build_partitions(&dd, &mut rng);
        let price = &parts[0];
        let ids: Vec<_> = price.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["underflow", "C1", "C2", "overflow"]);
        assert_eq!(price.items[0].label, "(-∞, 10)");
        assert_eq!(price.items[1].label, "[10, 20)");
        assert_eq!(price.items[3].label, "[30, ∞)");
        assert_eq!(price.items[1].sample, CaseValue::Int(15));
        assert_eq!(price.items[2].sample, CaseValue::Int(25));

        let CaseValue::Int(under) = price.items[0].sample else {
            panic!("underflow sample must be numeric")
        };
        assert!((0..10).contains(&under));
        let CaseValue::Int(over) = price.items[3].sample else {
            panic!("overflow sample must be numeric")
        };
        assert!((31..60).contains(&over));

        for pair in price.items.windows(2) {
            assert_eq!(pair[0].upper, pair[1].lower);
        }
    }

    #[test]
    fn test_category_partition_dedupes_labels() {
        let dd = dictionary("Ordinal", json!({ "$": { "id": "A1", "value": "5" } }));
        let mut rng = StdRng::seed_from_u64(1);
        let parts = build_partitions(&dd, &mut rng);
        let kind = &parts[1];
        let labels: Vec<_> = kind.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Member", "Guest", "None"]);
        assert_eq!(kind.items[2].sample, CaseValue::Null);
    }

    #[test]
    fn test_sentinel_only_partitions_dropped() {
        let dd = dictionary("Ordinal", json!([]));
        let mut rng = StdRng::seed_from_u64(1);
        let names: Vec<_> = build_partitions(&dd, &mut rng)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Price", "Type"]);
    }

    #[test]
    fn test_interval_output_labels() {
        let dd = dictionary(
            "Interval",
            json!([{ "$": { "id": "A1", "value": "0" } }, { "$": { "id": "A2", "value": "10" } }]),
        );
        let mut rng = StdRng::seed_from_u64(1);
        let parts = build_partitions(&dd, &mut rng);
        let out = parts.last().unwrap();
        assert_eq!(out.name, "Discount");
        assert_eq!(out.items[1].label, "10%");
        assert_eq!(out.items[1].sample, CaseValue::Text("10".into()));
    }

    #[test]
    fn test_sample_fallbacks() {
        let mut rng = StdRng::seed_from_u64(1);
        let d = Decimal::from;
        assert_eq!(underflow_sample(d(0), &mut rng), d(-1));
        assert_eq!(underflow_sample(d(-5), &mut rng), d(-6));
        assert_eq!(overflow_sample(d(1), &mut rng), d(2));
        assert_eq!(overflow_sample(d(-4), &mut rng), d(-3));
        assert_eq!(overflow_sample(d(2), &mut rng), d(3));
        // Below one, the only integer under the bound is zero
        assert_eq!(underflow_sample(Decimal::new(5, 1), &mut rng), d(0));
    }

    fn single_range(min: &str, max: &str) -> DataDictionary {
        let tree = Node::from_value(&json!({ "UC": { "Usecase": {
            "Input": { "Varname": "N", "Scale": "Range",
                       "Condition": { "$": { "id": "C1", "min": min, "max": max } } },
            "Output": { "Varname": "Y", "Action": { "$": { "id": "A1", "value": "v" } } }
        }}}))
        .unwrap();
        DataDictionary::from_tree(&tree).unwrap()
    }

    #[test]
    fn test_range_at_i64_limits() {
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let parts = build_partitions(&single_range("0", &i64::MAX.to_string()), &mut rng);
            let items = &parts[0].items;
            assert_eq!(items[1].sample, CaseValue::Int(i64::MAX / 2));
            let over = items[2].sample.as_decimal().unwrap();
            assert!(over > Decimal::from(i64::MAX));

            let parts = build_partitions(&single_range(&i64::MIN.to_string(), "0"), &mut rng);
            let items = &parts[0].items;
            let under = items[0].sample.as_decimal().unwrap();
            assert!(under < Decimal::from(i64::MIN));
            assert_eq!(items[1].sample, CaseValue::Int(i64::MIN / 2));
        }
    }

    #[test]
    fn test_fractional_range_partition() {
        let mut rng = StdRng::seed_from_u64(3);
        let parts = build_partitions(&single_range("0.5", "10.5"), &mut rng);
        let labels: Vec<_> = parts[0].items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["(-∞, 0.5)", "[0.5, 10.5)", "[10.5, ∞)"]);
        assert_eq!(parts[0].items[0].sample, CaseValue::Int(0));
        assert_eq!(parts[0].items[1].sample, CaseValue::Int(5));
        let over = parts[0].items[2].sample.as_decimal().unwrap();
        assert!(over > Decimal::new(105, 1));
    }
}
