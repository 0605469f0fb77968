//! Decision rule resolution

use crate::decision::DecisionRule;
use crate::dictionary::{CaseValue, Condition, DataDictionary};
use std::collections::BTreeMap;

type CaseMaps = (BTreeMap<String, CaseValue>, BTreeMap<String, CaseValue>);

/// Resolve one rule into its inputs and expected output.
///
/// Returns a description of the first missing reference when the rule
/// cannot be resolved.
pub fn resolve_rule(dd: &DataDictionary, rule: &DecisionRule) -> Result<CaseMaps, String> {
    let mut inputs = BTreeMap::new();

    let action_ref = match rule {
        DecisionRule::Single { condition, action } => {
            let cond = lookup(dd, condition.as_deref(), "condition", |_| true)?;
            inputs.insert(cond.variable.clone(), cond.representative());
            action
        }
        DecisionRule::Nested {
            outer,
            inner,
            action,
        } => {
            let outer = lookup(dd, outer.as_deref(), "range condition", |c| {
                c.range().is_some()
            })?;
            let inner = lookup(dd, inner.as_deref(), "nominal/ordinal condition", |c| {
                c.label().is_some()
            })?;
            inputs.insert(outer.variable.clone(), outer.representative());
            inputs.insert(inner.variable.clone(), inner.representative());
            action
        }
    };

    let action = match action_ref.as_deref() {
        None => return Err("action has no refid".into()),
        Some(id) => dd
            .action(id)
            .ok_or_else(|| format!("action '{}' not found", id))?,
    };

    let mut expected = BTreeMap::new();
    expected.insert(dd.output.name.clone(), CaseValue::Text(action.value.clone()));
    Ok((inputs, expected))
}

/// First condition with the id, which must also satisfy `accept`
fn lookup<'a>(
    dd: &'a DataDictionary,
    id: Option<&str>,
    what: &str,
    accept: impl Fn(&Condition) -> bool,
) -> Result<&'a Condition, String> {
    let id = id.ok_or_else(|| format!("{} has no refid", what))?;
    dd.condition(id)
        .filter(|c| accept(c))
        .ok_or_else(|| format!("{} '{}' not found", what, id))
}
