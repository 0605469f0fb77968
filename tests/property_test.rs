//! Property-based tests for the generators
//!
//! Uses proptest to generate random specifications and seeds and verify
//! invariants that must hold for every input.

use bbtgen::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};
use std::collections::{BTreeSet, HashSet};

proptest! {
    #[test]
    fn test_range_partitions_are_contiguous(edges in contiguous_edges(), seed in any::<u64>()) {
        let dd = dictionary_from_edges(&edges);
        let partitions = build_partitions(&dd, &mut StdRng::seed_from_u64(seed));
        let items = &partitions[0].items;

        // underflow + one bucket per condition + overflow
        prop_assert_eq!(items.len(), edges.len() + 1);
        prop_assert_eq!(items[0].kind, PartitionKind::Underflow);
        prop_assert_eq!(items[items.len() - 1].kind, PartitionKind::Overflow);

        // Each item starts where the previous one ends
        for pair in items.windows(2) {
            prop_assert_eq!(pair[0].upper, pair[1].lower);
        }

        let first_min = edges[0];
        let last_max = edges[edges.len() - 1];
        match (&items[0].sample, &items[items.len() - 1].sample) {
            (CaseValue::Int(under), CaseValue::Int(over)) => {
                prop_assert!(*under < first_min);
                prop_assert!(*over > last_max);
            }
            other => prop_assert!(false, "non-integer samples {:?}", other),
        }
    }

    #[test]
    fn test_category_partitions_count_distinct_labels(labels in prop::collection::vec("[A-C]", 1..8)) {
        let conditions: Vec<Value> = labels
            .iter()
            .enumerate()
            .map(|(i, l)| json!({ "$": { "id": format!("L{}", i), "value": l } }))
            .collect();
        let dd = DataDictionary::from_tree(&Node::from_value(&json!({ "UC": { "Usecase": {
            "Input": { "Varname": "Tier", "Scale": "Ordinal", "Condition": conditions },
            "Output": { "Varname": "Out", "Action": { "$": { "id": "A1", "value": "x" } } }
        }}})).unwrap()).unwrap();

        let partitions = build_partitions(&dd, &mut StdRng::seed_from_u64(0));
        let distinct: BTreeSet<_> = labels.iter().collect();
        let categories = partitions[0]
            .items
            .iter()
            .filter(|i| i.kind == PartitionKind::Category)
            .count();
        prop_assert_eq!(categories, distinct.len());
    }

    #[test]
    fn test_mutation_lengths(valid in "[a-zA-Z0-9]{1,24}", seed in any::<u64>()) {
        let v = mutate(&valid, &mut StdRng::seed_from_u64(seed));
        let len = valid.chars().count();

        prop_assert_eq!(v.invalid_value.chars().count(), len + 1);
        prop_assert_eq!(v.invalid_addition.chars().count(), len + 1);
        prop_assert_eq!(v.invalid_omission.chars().count(), len - 1);
        prop_assert_eq!(v.invalid_substitution.chars().count(), len);
        prop_assert!(v.invalid_value.starts_with(&valid));
    }

    #[test]
    fn test_generated_strings_match_pattern(seed in any::<u64>()) {
        let generator = PatternGenerator::new(r"[A-Z]{2}\d{2,4}(-[a-z]+)?", 5).unwrap();
        let s = generator.generate(&mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert!(generator.is_match(&s), "{} does not match", s);
    }

    #[test]
    fn test_matrix_covers_every_pair(n in 1usize..7, edges in prop::collection::vec((0usize..7, 0usize..7), 1..12)) {
        let (states, transitions) = machine(n, &edges);
        let finals = if n > 1 { vec![states[n - 1].clone()] } else { vec![] };
        let matrix = build_matrix(&states, &states[0], &finals, &transitions, &MatrixOptions::default());

        let total = matrix.count(CellKind::Valid)
            + matrix.count(CellKind::Invalid)
            + matrix.count(CellKind::Excluded);
        prop_assert_eq!(total, n * n);
        prop_assert_eq!(matrix.valid_cases.len(), matrix.count(CellKind::Valid));
        prop_assert_eq!(matrix.invalid_cases.len(), matrix.count(CellKind::Invalid));

        for case in &matrix.valid_cases {
            prop_assert!(transitions.iter().any(|t| t.from == case.from && t.to == case.to));
        }
    }

    #[test]
    fn test_sequences_respect_limits(
        n in 1usize..6,
        edges in prop::collection::vec((0usize..6, 0usize..6), 1..10),
        max_depth in 1usize..6,
        max_repeats_per_state in 1usize..3,
    ) {
        let (states, transitions) = machine(n, &edges);
        let finals = vec![states[n - 1].clone()];
        let limits = SequenceLimits { max_depth, max_repeats_per_state };
        let cases = enumerate_sequences(&states[0], &transitions, &finals, limits).unwrap();

        let mut seen = HashSet::new();
        for case in &cases {
            prop_assert_eq!(&case.sequence[0], &states[0]);
            prop_assert!(case.sequence.len() - 1 <= max_depth);
            for state in &case.sequence {
                let visits = case.sequence.iter().filter(|s| *s == state).count();
                prop_assert!(visits <= max_repeats_per_state);
            }
            prop_assert!(seen.insert(case.sequence.clone()), "duplicate path");
        }
    }
}

/// Strictly increasing bucket edges, at least two
fn contiguous_edges() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::btree_set(-200i64..1000, 2..7).prop_map(|set| set.into_iter().collect())
}

/// One Range input with buckets `[edges[i], edges[i + 1])`
fn dictionary_from_edges(edges: &[i64]) -> DataDictionary {
    let conditions: Vec<Value> = edges
        .windows(2)
        .enumerate()
        .map(|(i, w)| json!({ "$": { "id": format!("C{}", i), "min": w[0], "max": w[1] } }))
        .collect();
    let tree = Node::from_value(&json!({ "UC": { "Usecase": {
        "Input": { "Varname": "N", "Scale": "Range", "Condition": conditions },
        "Output": { "Varname": "Out", "Action": { "$": { "id": "A1", "value": "x" } } }
    }}}))
    .unwrap();
    DataDictionary::from_tree(&tree).unwrap()
}

/// States `S0..S{n-1}` and transitions from index pairs folded into range
fn machine(n: usize, edges: &[(usize, usize)]) -> (Vec<String>, Vec<Transition>) {
    let states: Vec<String> = (0..n).map(|i| format!("S{}", i)).collect();
    let transitions = edges
        .iter()
        .enumerate()
        .map(|(i, &(a, b))| Transition::new(&states[a % n], &format!("e{}", i), &states[b % n]))
        .collect();
    (states, transitions)
}
