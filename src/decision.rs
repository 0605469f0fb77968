//! Decision tables
//!
//! A decision table lists rules that map conditions (by `refid`) to an
//! action. Two rule shapes exist:
//!
//! ```yaml
//! DecisionTree:
//!   DecisionS:
//!     Decision:
//!       # single-level: one condition guards one action
//!       - Condition: { $: { refid: C3 } }
//!         ACTION: { $: { refid: A1 } }
//!       # nested: Range condition > Nominal/Ordinal condition > action
//!       - Condition:
//!           $: { refid: C1 }
//!           Condition:
//!             $: { refid: C4 }
//!             ACTION: { $: { refid: A2 } }
//! ```

use crate::error::{Error, Result};
use crate::tree::Node;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A decision rule, by shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum DecisionRule {
    /// One condition guards one action
    Single {
        condition: Option<String>,
        action: Option<String>,
    },
    /// An outer Range condition containing an inner Nominal/Ordinal
    /// condition, which guards the action
    Nested {
        outer: Option<String>,
        inner: Option<String>,
        action: Option<String>,
    },
}

/// A rule with its 1-based position in the source list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NumberedRule {
    pub position: usize,
    pub rule: DecisionRule,
}

/// A loaded decision table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DecisionTable {
    pub rules: Vec<NumberedRule>,

    /// Positions of decision nodes matching neither shape
    #[serde(default)]
    pub unrecognized: Vec<usize>,
}

impl DecisionTable {
    /// Build the table from a `DecisionTree/DecisionS` tree
    pub fn from_tree(root: &Node) -> Result<Self> {
        let decisions = root
            .child("DecisionTree")
            .and_then(|t| t.child("DecisionS"))
            .ok_or_else(|| Error::MissingNode("DecisionTree/DecisionS".into()))?;

        let mut table = DecisionTable::default();
        for (idx, decision) in decisions.children("Decision").iter().enumerate() {
            let position = idx + 1;
            match classify(decision) {
                Some(rule) => table.rules.push(NumberedRule { position, rule }),
                None => table.unrecognized.push(position),
            }
        }

        tracing::debug!(
            rules = table.rules.len(),
            unrecognized = table.unrecognized.len(),
            "loaded decision table"
        );
        Ok(table)
    }

    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::from_tree(&Node::from_path(path)?)
    }

    /// Number of decision nodes in the source, recognized or not
    pub fn len(&self) -> usize {
        self.rules.len() + self.unrecognized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn refid(node: Option<&Node>) -> Option<String> {
    node.and_then(|n| n.attr("refid")).map(str::to_string)
}

fn classify(decision: &Node) -> Option<DecisionRule> {
    let outer = decision.child("Condition");

    if decision.has_child("ACTION") {
        return Some(DecisionRule::Single {
            condition: refid(outer),
            action: refid(decision.child("ACTION")),
        });
    }

    let inner = outer.and_then(|o| o.child("Condition"))?;
    Some(DecisionRule::Nested {
        outer: refid(outer),
        inner: refid(Some(inner)),
        action: refid(inner.child("ACTION")),
    })
}
