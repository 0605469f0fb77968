//! Data dictionary: the normalized input/output model
//!
//! A data dictionary declares the input variables of one use case, the
//! conditions that split each input's domain, and the actions (values) the
//! output variable may take. Decision rules refer to conditions and actions
//! by id.
//!
//! ## Example (YAML tree)
//!
//! ```yaml
//! UC:
//!   Usecase:
//!     Input:
//!       - Varname: Order Price
//!         Scale: Range
//!         Condition:
//!           - $: { id: C1, min: "0", max: "100" }
//!           - $: { id: C2, min: "100", max: "500" }
//!       - Varname: Customer Type
//!         Scale: Nominal
//!         Condition:
//!           - $: { id: C3, value: Member }
//!           - $: { id: C4, value: Guest }
//!     Output:
//!       Varname: Discount
//!       Scale: Ordinal
//!       Action:
//!         - $: { id: A1, value: "0%" }
//!         - $: { id: A2, value: "5%" }
//! ```

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::error::{Error, Result};
use crate::syntax::SyntaxDefinition;
use crate::tree::Node;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Measurement scale of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Scale {
    /// Numeric, split into `[min, max)` buckets
    Range,
    /// Unordered categories
    Nominal,
    /// Ordered categories
    Ordinal,
    /// Numeric output rendered as a percentage
    Interval,
}

impl Scale {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Range" => Some(Scale::Range),
            "Nominal" => Some(Scale::Nominal),
            "Ordinal" => Some(Scale::Ordinal),
            "Interval" => Some(Scale::Interval),
            _ => None,
        }
    }

    /// Nominal or Ordinal
    pub fn is_categorical(self) -> bool {
        matches!(self, Scale::Nominal | Scale::Ordinal)
    }
}

/// A declared input or output variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Variable {
    pub name: String,

    /// `None` for a field that only carries a syntax pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
}

/// A concrete input or output value in a generated case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CaseValue {
    Int(i64),
    Text(String),
    /// Fractional, or integral but outside `i64`
    Number(
        #[serde(with = "rust_decimal::serde::float")]
        #[schemars(with = "f64")]
        Decimal,
    ),
    Null,
}

impl CaseValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CaseValue::Null)
    }

    /// `Int` when the value is integral and fits, `Number` otherwise
    pub fn from_decimal(d: Decimal) -> Self {
        match d.fract().is_zero().then(|| d.to_i64()).flatten() {
            Some(n) => CaseValue::Int(n),
            None => CaseValue::Number(d.normalize()),
        }
    }

    /// Numeric value of an `Int` or `Number`
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            CaseValue::Int(n) => Some(Decimal::from(*n)),
            CaseValue::Number(d) => Some(*d),
            CaseValue::Text(_) | CaseValue::Null => None,
        }
    }
}

impl fmt::Display for CaseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseValue::Int(n) => write!(f, "{}", n),
            CaseValue::Text(s) => write!(f, "{}", s),
            CaseValue::Number(d) => write!(f, "{}", d),
            CaseValue::Null => write!(f, "null"),
        }
    }
}

impl From<i64> for CaseValue {
    fn from(n: i64) -> Self {
        CaseValue::Int(n)
    }
}

impl From<&str> for CaseValue {
    fn from(s: &str) -> Self {
        CaseValue::Text(s.to_string())
    }
}

/// What a condition selects within its variable's domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ConditionBound {
    /// Half-open numeric interval `[min, max)`
    Range { min: Decimal, max: Decimal },
    /// One category of a Nominal/Ordinal variable
    Label { label: String },
}

/// A condition on one input variable, referenced by decision rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Condition {
    pub id: String,
    pub variable: String,
    pub bound: ConditionBound,
}

impl Condition {
    pub fn range(&self) -> Option<(Decimal, Decimal)> {
        match self.bound {
            ConditionBound::Range { min, max } => Some((min, max)),
            ConditionBound::Label { .. } => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match &self.bound {
            ConditionBound::Label { label } => Some(label),
            ConditionBound::Range { .. } => None,
        }
    }

    /// The value standing in for the whole condition: midpoint or label
    pub fn representative(&self) -> CaseValue {
        match &self.bound {
            ConditionBound::Range { min, max } => CaseValue::from_decimal(midpoint(*min, *max)),
            ConditionBound::Label { label } => CaseValue::Text(label.clone()),
        }
    }
}

/// Floor of the arithmetic mean
pub fn midpoint(min: Decimal, max: Decimal) -> Decimal {
    let sum = match min.checked_add(max) {
        Some(sum) => sum / Decimal::TWO,
        None => min / Decimal::TWO + max / Decimal::TWO,
    };
    sum.floor()
}

/// A possible output value, referenced by decision rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Action {
    pub id: String,
    pub value: String,
}

/// A loaded data dictionary
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DataDictionary {
    pub inputs: Vec<Variable>,
    pub output: Variable,

    /// All input conditions in source order
    pub conditions: Vec<Condition>,
    pub actions: Vec<Action>,

    /// Pattern-governed fields
    #[serde(default)]
    pub syntax: Vec<SyntaxDefinition>,

    /// Problems found while loading
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl DataDictionary {
    /// Build the dictionary from a `UC/Usecase` tree
    pub fn from_tree(root: &Node) -> Result<Self> {
        let usecase = usecase(root).ok_or_else(|| Error::MissingNode("UC/Usecase".into()))?;

        let mut inputs = Vec::new();
        let mut conditions = Vec::new();
        let mut diagnostics = Vec::new();

        for input in usecase.children("Input") {
            let name = var_name(input)?;
            let Some(scale_text) = scale_text(input) else {
                // Syntax-only field: kept, never partitioned
                inputs.push(Variable { name, scale: None });
                continue;
            };
            let Some(scale) = Scale::parse(scale_text) else {
                let d = Diagnostic::warning(
                    DiagnosticCode::UnknownScale,
                    format!(
                        "Input '{}' has unknown scale '{}'; its conditions are ignored",
                        name, scale_text
                    ),
                )
                .with_subject(name.clone());
                d.log();
                diagnostics.push(d);
                continue;
            };

            for cond in input.children("Condition") {
                match scale {
                    Scale::Range => conditions.push(parse_range_condition(cond, &name)?),
                    Scale::Nominal | Scale::Ordinal => {
                        conditions.push(parse_label_condition(cond, &name)?)
                    }
                    Scale::Interval => {}
                }
            }
            inputs.push(Variable {
                name,
                scale: Some(scale),
            });
        }

        let output_node = usecase
            .child("Output")
            .ok_or_else(|| Error::MissingNode("UC/Usecase/Output".into()))?;
        let output_name = var_name(output_node)?;
        let output_scale = scale_text(output_node).and_then(Scale::parse).unwrap_or(Scale::Nominal);
        let actions = output_node
            .children("Action")
            .iter()
            .map(parse_action)
            .collect::<Result<Vec<_>>>()?;

        diagnostics.extend(duplicate_ids(&conditions));
        let (syntax, syntax_diags) = syntax_from_usecase(usecase);
        diagnostics.extend(syntax_diags);

        tracing::debug!(
            inputs = inputs.len(),
            conditions = conditions.len(),
            actions = actions.len(),
            syntax = syntax.len(),
            "loaded data dictionary"
        );

        Ok(Self {
            inputs,
            output: Variable {
                name: output_name,
                scale: Some(output_scale),
            },
            conditions,
            actions,
            syntax,
            diagnostics,
        })
    }

    /// Load from a `.json`/`.yaml` tree file
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::from_tree(&Node::from_path(path)?)
    }

    /// First condition with this id
    pub fn condition(&self, id: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.id == id)
    }

    /// First Range condition with this id
    pub fn range_condition(&self, id: &str) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|c| c.id == id && c.range().is_some())
    }

    /// First Nominal/Ordinal condition with this id
    pub fn label_condition(&self, id: &str) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|c| c.id == id && c.label().is_some())
    }

    pub fn action(&self, id: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Conditions of one variable, source order
    pub fn conditions_for<'a>(&'a self, variable: &'a str) -> impl Iterator<Item = &'a Condition> {
        self.conditions.iter().filter(move |c| c.variable == variable)
    }

    /// Range conditions of one variable as `(id, min, max)`, ascending by min
    pub fn sorted_ranges<'a>(&'a self, variable: &str) -> Vec<(&'a str, Decimal, Decimal)> {
        let mut ranges: Vec<_> = self
            .conditions
            .iter()
            .filter(|c| c.variable == variable)
            .filter_map(|c| c.range().map(|(min, max)| (c.id.as_str(), min, max)))
            .collect();
        ranges.sort_by_key(|&(_, min, _)| min);
        ranges
    }

    /// Inputs that carry at least one condition, source order
    pub fn participating_inputs(&self) -> impl Iterator<Item = &Variable> {
        self.inputs
            .iter()
            .filter(|v| self.conditions.iter().any(|c| c.variable == v.name))
    }

    /// Report inverted and overlapping range conditions
    pub fn validate_ranges(&self) -> Vec<Diagnostic> {
        self.range_findings(false)
    }

    /// Run [`Self::validate_ranges`]; in strict mode any finding is an error
    /// and aborts
    pub fn check_ranges(&self, strict: bool) -> Result<Vec<Diagnostic>> {
        let diagnostics = self.range_findings(strict);
        for d in &diagnostics {
            d.log();
        }
        if strict && !diagnostics.is_empty() {
            let messages: Vec<_> = diagnostics.iter().map(|d| d.message.clone()).collect();
            return Err(Error::InvalidSpec(messages.join("; ")));
        }
        Ok(diagnostics)
    }

    fn range_findings(&self, strict: bool) -> Vec<Diagnostic> {
        let finding = |code, message: String| {
            if strict {
                Diagnostic::error(code, message)
            } else {
                Diagnostic::warning(code, message)
            }
        };
        let mut diagnostics = Vec::new();

        for var in self.inputs.iter().filter(|v| v.scale == Some(Scale::Range)) {
            let ranges = self.sorted_ranges(&var.name);
            for &(id, min, max) in &ranges {
                if min >= max {
                    diagnostics.push(
                        finding(
                            DiagnosticCode::InvertedRange,
                            format!(
                                "Condition '{}' of '{}' has min {} >= max {}",
                                id, var.name, min, max
                            ),
                        )
                        .with_subject(id),
                    );
                }
            }
            for pair in ranges.windows(2) {
                let (prev_id, _, prev_max) = pair[0];
                let (next_id, next_min, _) = pair[1];
                if next_min < prev_max {
                    diagnostics.push(
                        finding(
                            DiagnosticCode::OverlappingRanges,
                            format!(
                                "Conditions '{}' and '{}' of '{}' overlap ({} < {})",
                                prev_id, next_id, var.name, next_min, prev_max
                            ),
                        )
                        .with_subject(var.name.clone()),
                    );
                }
            }
        }

        diagnostics
    }
}

/// Extract only the syntax definitions from a dictionary tree.
///
/// Unlike [`DataDictionary::from_tree`], a tree without `UC/Usecase` yields
/// no definitions instead of an error.
pub fn syntax_definitions_from_tree(root: &Node) -> (Vec<SyntaxDefinition>, Vec<Diagnostic>) {
    match usecase(root) {
        Some(usecase) => syntax_from_usecase(usecase),
        None => (Vec::new(), Vec::new()),
    }
}

fn usecase(root: &Node) -> Option<&Node> {
    root.child("UC").and_then(|uc| uc.child("Usecase"))
}

fn var_name(node: &Node) -> Result<String> {
    node.child_text("Varname")
        .or_else(|| node.attr("Varname"))
        .map(|s| s.trim().to_string())
        .ok_or_else(|| Error::InvalidSpec("Variable without Varname".into()))
}

/// `Scale`, falling back to the older `Type` element
fn scale_text(node: &Node) -> Option<&str> {
    node.child_text("Scale").or_else(|| node.child_text("Type"))
}

fn required_attr<'a>(node: &'a Node, name: &str, what: &str) -> Result<&'a str> {
    node.attr(name)
        .ok_or_else(|| Error::InvalidSpec(format!("{} is missing attribute '{}'", what, name)))
}

/// Decimal bound; plain (`0.5`) and scientific (`1e3`) notation both parse
fn parse_bound(raw: &str, id: &str, which: &str) -> Result<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| {
            Error::InvalidSpec(format!(
                "Condition '{}' has non-numeric {} '{}'",
                id, which, raw
            ))
        })
}

fn parse_range_condition(node: &Node, variable: &str) -> Result<Condition> {
    let what = format!("Range condition of '{}'", variable);
    let id = required_attr(node, "id", &what)?;
    let min = parse_bound(required_attr(node, "min", &what)?, id, "min")?;
    let max = parse_bound(required_attr(node, "max", &what)?, id, "max")?;
    Ok(Condition {
        id: id.to_string(),
        variable: variable.to_string(),
        bound: ConditionBound::Range { min, max },
    })
}

fn parse_label_condition(node: &Node, variable: &str) -> Result<Condition> {
    let what = format!("Condition of '{}'", variable);
    let id = required_attr(node, "id", &what)?;
    let label = required_attr(node, "value", &what)?;
    Ok(Condition {
        id: id.to_string(),
        variable: variable.to_string(),
        bound: ConditionBound::Label {
            label: label.to_string(),
        },
    })
}

fn parse_action(node: &Node) -> Result<Action> {
    let id = required_attr(node, "id", "Action")?;
    let value = required_attr(node, "value", "Action")?;
    Ok(Action {
        id: id.to_string(),
        value: value.to_string(),
    })
}

fn duplicate_ids(conditions: &[Condition]) -> Vec<Diagnostic> {
    let mut seen = HashSet::new();
    let mut diagnostics = Vec::new();
    for c in conditions {
        if !seen.insert(c.id.as_str()) {
            let d = Diagnostic::warning(
                DiagnosticCode::DuplicateConditionId,
                format!(
                    "Condition id '{}' is defined more than once; the first definition is used",
                    c.id
                ),
            )
            .with_subject(c.id.clone());
            d.log();
            diagnostics.push(d);
        }
    }
    diagnostics
}

fn syntax_from_usecase(usecase: &Node) -> (Vec<SyntaxDefinition>, Vec<Diagnostic>) {
    let mut defs = Vec::new();
    let mut diagnostics = Vec::new();

    for input in usecase.children("Input") {
        let syntaxes = input.children("Syntax");
        if syntaxes.is_empty() {
            continue;
        }
        let name = input.child_text("Varname").unwrap_or_default().trim();

        for syn in syntaxes {
            let pattern = syn
                .attr("Pattern")
                .or_else(|| syn.child_text("Pattern"))
                .or_else(|| syn.text());
            let Some(pattern) = pattern else {
                let d = Diagnostic::warning(
                    DiagnosticCode::InvalidPattern,
                    format!("Syntax definition of '{}' has no pattern", name),
                )
                .with_subject(name);
                d.log();
                diagnostics.push(d);
                continue;
            };

            defs.push(SyntaxDefinition {
                name: name.to_string(),
                description: name.to_string(),
                pattern: pattern.to_string(),
                data_type: syn
                    .attr("Type")
                    .or_else(|| input.child_text("DataType"))
                    .unwrap_or_default()
                    .to_string(),
                length: syn.attr("Length").unwrap_or_default().to_string(),
            });
        }
    }

    (defs, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_tree() -> Node {
        Node::from_value(&json!({
            "UC": { "Usecase": {
                "Input": [
                    { "Varname": "Order Price", "Scale": "Range", "Condition": [
                        { "$": { "id": "C1", "min": "0", "max": "100" } },
                        { "$": { "id": "C2", "min": "100", "max": "501" } }
                    ]},
                    { "Varname": "Customer Type", "Scale": "Nominal", "Condition": [
                        { "$": { "id": "C3", "value": "Member" } },
                        { "$": { "id": "C4", "value": "Guest" } }
                    ]},
                    { "Varname": "Code", "DataType": "string",
                      "Syntax": { "$": { "Pattern": "[A-Z]{3}[0-9]{2}", "Length": "5" } } }
                ],
                "Output": { "Varname": "Discount", "Scale": "Ordinal", "Action": [
                    { "$": { "id": "A1", "value": "0%" } },
                    { "$": { "id": "A2", "value": "5%" } }
                ]}
            }}
        }))
        .unwrap()
    }

    #[test]
    fn test_load_dictionary() {
        let dd = DataDictionary::from_tree(&sample_tree()).unwrap();
        assert_eq!(dd.inputs.len(), 3);
        assert_eq!(dd.output.name, "Discount");
        assert_eq!(dd.output.scale, Some(Scale::Ordinal));
        assert_eq!(dd.conditions.len(), 4);
        assert_eq!(dd.actions.len(), 2);
        assert_eq!(dd.range_condition("C2").unwrap().range(), Some((Decimal::from(100), Decimal::from(501))));
        assert_eq!(dd.label_condition("C3").unwrap().label(), Some("Member"));
        assert!(dd.range_condition("C3").is_none());
        assert!(dd.diagnostics.is_empty());
        assert_eq!(dd.inputs[2].name, "Code");
        assert_eq!(dd.inputs[2].scale, None);
    }

    #[test]
    fn test_representative_values() {
        let dd = DataDictionary::from_tree(&sample_tree()).unwrap();
        assert_eq!(dd.condition("C1").unwrap().representative(), CaseValue::Int(50));
        // (100 + 501) / 2 = 300.5 floors to 300
        assert_eq!(dd.condition("C2").unwrap().representative(), CaseValue::Int(300));
        assert_eq!(
            dd.condition("C4").unwrap().representative(),
            CaseValue::Text("Guest".into())
        );
    }

    #[test]
    fn test_midpoint_floors_negative() {
        let mid = |a: i64, b: i64| midpoint(Decimal::from(a), Decimal::from(b));
        assert_eq!(mid(-3, 0), Decimal::from(-2));
        assert_eq!(mid(1, 2), Decimal::ONE);
    }

    #[test]
    fn test_midpoint_at_extremes() {
        let mid = |a: i64, b: i64| CaseValue::from_decimal(midpoint(Decimal::from(a), Decimal::from(b)));
        assert_eq!(mid(0, i64::MAX), CaseValue::Int(i64::MAX / 2));
        assert_eq!(mid(i64::MIN, 0), CaseValue::Int(i64::MIN / 2));
        assert_eq!(mid(i64::MAX - 1, i64::MAX), CaseValue::Int(i64::MAX - 1));
        // Decimal's own limits fall back to halving each side
        assert_eq!(
            midpoint(Decimal::MAX, Decimal::MAX),
            (Decimal::MAX / Decimal::TWO + Decimal::MAX / Decimal::TWO).floor()
        );
    }

    #[test]
    fn test_case_value_from_decimal() {
        assert_eq!(CaseValue::from_decimal(Decimal::new(50, 1)), CaseValue::Int(5));
        assert_eq!(
            CaseValue::from_decimal(Decimal::new(55, 1)),
            CaseValue::Number(Decimal::new(55, 1))
        );
        let beyond = Decimal::from(i64::MAX) + Decimal::ONE;
        assert_eq!(CaseValue::from_decimal(beyond), CaseValue::Number(beyond));
        assert_eq!(CaseValue::Number(Decimal::new(25, 1)).to_string(), "2.5");
        assert_eq!(
            serde_json::to_value(CaseValue::Number(Decimal::new(25, 1))).unwrap(),
            json!(2.5)
        );
    }

    #[test]
    fn test_participating_inputs_skip_syntax_only() {
        let dd = DataDictionary::from_tree(&sample_tree()).unwrap();
        let names: Vec<_> = dd.participating_inputs().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Order Price", "Customer Type"]);
    }

    #[test]
    fn test_syntax_definitions() {
        let dd = DataDictionary::from_tree(&sample_tree()).unwrap();
        assert_eq!(dd.syntax.len(), 1);
        assert_eq!(dd.syntax[0].name, "Code");
        assert_eq!(dd.syntax[0].pattern, "[A-Z]{3}[0-9]{2}");
        assert_eq!(dd.syntax[0].data_type, "string");
        assert_eq!(dd.syntax[0].length, "5");
    }

    #[test]
    fn test_missing_usecase_is_fatal() {
        let tree = Node::from_value(&json!({ "UC": {} })).unwrap();
        let err = DataDictionary::from_tree(&tree).unwrap_err();
        assert!(matches!(err, Error::MissingNode(_)));
        let (defs, diags) = syntax_definitions_from_tree(&tree);
        assert!(defs.is_empty() && diags.is_empty());
    }

    #[test]
    fn test_missing_output_is_fatal() {
        let tree = Node::from_value(&json!({ "UC": { "Usecase": { "Input": [] } } })).unwrap();
        let err = DataDictionary::from_tree(&tree).unwrap_err();
        assert!(err.to_string().contains("Output"));
    }

    #[test]
    fn test_non_numeric_bound() {
        let tree = Node::from_value(&json!({ "UC": { "Usecase": {
            "Input": { "Varname": "X", "Scale": "Range",
                       "Condition": { "$": { "id": "C1", "min": "a", "max": "3" } } },
            "Output": { "Varname": "Y", "Action": { "$": { "id": "A1", "value": "v" } } }
        }}}))
        .unwrap();
        let err = DataDictionary::from_tree(&tree).unwrap_err();
        assert!(matches!(err, Error::InvalidSpec(_)));
    }

    #[test]
    fn test_fractional_bounds() {
        let tree = Node::from_value(&json!({ "UC": { "Usecase": {
            "Input": { "Varname": "Price", "Scale": "Range", "Condition": [
                { "$": { "id": "C1", "min": "0.5", "max": "10.5" } },
                { "$": { "id": "C2", "min": 10.5, "max": "2e1" } }
            ]},
            "Output": { "Varname": "Y", "Action": { "$": { "id": "A1", "value": "v" } } }
        }}}))
        .unwrap();
        let dd = DataDictionary::from_tree(&tree).unwrap();
        assert_eq!(
            dd.condition("C1").unwrap().range(),
            Some((Decimal::new(5, 1), Decimal::new(105, 1)))
        );
        // (0.5 + 10.5) / 2 = 5.5 floors to 5
        assert_eq!(dd.condition("C1").unwrap().representative(), CaseValue::Int(5));
        assert_eq!(dd.condition("C2").unwrap().representative(), CaseValue::Int(15));
        assert!(dd.validate_ranges().is_empty());
    }

    #[test]
    fn test_strict_range_findings_are_errors() {
        let tree = Node::from_value(&json!({ "UC": { "Usecase": {
            "Input": { "Varname": "X", "Scale": "Range", "Condition": [
                { "$": { "id": "C1", "min": "0", "max": "20" } },
                { "$": { "id": "C2", "min": "10", "max": "30" } }
            ]},
            "Output": { "Varname": "Y", "Action": { "$": { "id": "A1", "value": "v" } } }
        }}}))
        .unwrap();
        let dd = DataDictionary::from_tree(&tree).unwrap();
        assert!(dd.validate_ranges().iter().all(|d| !d.is_error()));
        let strict = dd.range_findings(true);
        assert_eq!(strict.len(), 1);
        assert!(strict[0].is_error());
        assert!(strict[0].to_string().starts_with("error[OverlappingRanges]"));
    }

    #[test]
    fn test_validate_ranges_reports_overlap() {
        let tree = Node::from_value(&json!({ "UC": { "Usecase": {
            "Input": { "Varname": "X", "Scale": "Range", "Condition": [
                { "$": { "id": "C1", "min": "0", "max": "20" } },
                { "$": { "id": "C2", "min": "10", "max": "30" } },
                { "$": { "id": "C3", "min": "40", "max": "40" } }
            ]},
            "Output": { "Varname": "Y", "Action": { "$": { "id": "A1", "value": "v" } } }
        }}}))
        .unwrap();
        let dd = DataDictionary::from_tree(&tree).unwrap();
        let codes: Vec<_> = dd.validate_ranges().iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![DiagnosticCode::InvertedRange, DiagnosticCode::OverlappingRanges]
        );
        assert!(dd.check_ranges(true).is_err());
        assert_eq!(dd.check_ranges(false).unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_and_unknown_scale_reported() {
        let tree = Node::from_value(&json!({ "UC": { "Usecase": {
            "Input": [
                { "Varname": "X", "Scale": "Range", "Condition": [
                    { "$": { "id": "C1", "min": "0", "max": "20" } } ]},
                { "Varname": "Z", "Scale": "Nominal", "Condition": [
                    { "$": { "id": "C1", "value": "dup" } } ]},
                { "Varname": "W", "Scale": "Ratio" }
            ],
            "Output": { "Varname": "Y", "Action": { "$": { "id": "A1", "value": "v" } } }
        }}}))
        .unwrap();
        let dd = DataDictionary::from_tree(&tree).unwrap();
        let codes: Vec<_> = dd.diagnostics.iter().map(|d| d.code).collect();
        assert!(codes.contains(&DiagnosticCode::DuplicateConditionId));
        assert!(codes.contains(&DiagnosticCode::UnknownScale));
        assert_eq!(dd.inputs.len(), 2);
    }

    #[test]
    fn test_legacy_type_element() {
        let tree = Node::from_value(&json!({ "UC": { "Usecase": {
            "Input": { "Varname": "Tier", "Type": "Ordinal",
                       "Condition": { "$": { "id": "T1", "value": "Gold" } } },
            "Output": { "Varname": "Y", "Type": "Ordinal",
                        "Action": { "$": { "id": "A1", "value": "v" } } }
        }}}))
        .unwrap();
        let dd = DataDictionary::from_tree(&tree).unwrap();
        assert_eq!(dd.inputs[0].scale, Some(Scale::Ordinal));
        assert_eq!(dd.conditions.len(), 1);
    }
}
