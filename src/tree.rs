//! Input trees: the normalized input boundary
//!
//! Every specification document (data dictionary, decision table, state
//! machine) arrives as an attribute-tagged tree in the shape a generic
//! XML-to-object converter produces with single elements left unwrapped:
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
//! ```
//!
//! - `$` holds the element's attributes
//! - `_` holds text content when the element also has attributes
//! - any other key is a child tag, mapping to one element, a list of
//!   elements, or a bare scalar (a text-only element)
//!
//! The XML parsing itself happens upstream; this module only accepts the
//! resulting tree as JSON or YAML.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

const ATTRS_KEY: &str = "$";
const TEXT_KEY: &str = "_";

/// One element of a specification tree
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Node {
    /// Attributes (`$` in the source tree)
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,

    /// Text content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Child elements grouped by tag, each group in source order
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, Vec<Node>>,
}

/// Serialized form of a tree document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    Json,
    Yaml,
}

impl TreeFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(TreeFormat::Json),
            Some("yaml") | Some("yml") => Ok(TreeFormat::Yaml),
            other => Err(Error::TreeParse(format!(
                "Unsupported tree format for {}: {}",
                path.display(),
                other.unwrap_or("<none>")
            ))),
        }
    }
}

impl Node {
    /// Parse a tree from an in-memory document
    pub fn parse(input: &str, format: TreeFormat) -> Result<Self> {
        let value: Value = match format {
            TreeFormat::Json => {
                serde_json::from_str(input).map_err(|e| Error::TreeParse(e.to_string()))?
            }
            TreeFormat::Yaml => {
                serde_norway::from_str(input).map_err(|e| Error::TreeParse(e.to_string()))?
            }
        };
        Self::from_value(&value)
    }

    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Self::parse(json, TreeFormat::Json)
    }

    /// Parse a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::parse(yaml, TreeFormat::Yaml)
    }

    /// Load a tree from a `.json`, `.yaml` or `.yml` file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = TreeFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        Self::parse(&content, format)
    }

    /// Convert a generic value; the root must be a map
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(_) => convert(value, "<root>"),
            other => Err(Error::TreeParse(format!(
                "Tree root must be a map, found {}",
                value_kind(other)
            ))),
        }
    }

    /// Attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Text content
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// First child with the given tag
    pub fn child(&self, tag: &str) -> Option<&Node> {
        self.children.get(tag).and_then(|c| c.first())
    }

    /// All children with the given tag, in source order
    pub fn children(&self, tag: &str) -> &[Node] {
        self.children.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Text of a text-only child (`<Varname>Order Price</Varname>`)
    pub fn child_text(&self, tag: &str) -> Option<&str> {
        self.child(tag).and_then(Node::text)
    }

    /// First child matching any of the given tags
    pub fn child_any(&self, tags: &[&str]) -> Option<&Node> {
        tags.iter().find_map(|t| self.child(t))
    }

    pub fn has_child(&self, tag: &str) -> bool {
        !self.children(tag).is_empty()
    }
}

fn convert(value: &Value, path: &str) -> Result<Node> {
    match value {
        Value::Null => Ok(Node::default()),
        Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(Node {
            text: scalar_text(value),
            ..Default::default()
        }),
        Value::Array(_) => Err(Error::TreeParse(format!(
            "Nested list at {} (lists are only allowed as child groups)",
            path
        ))),
        Value::Object(map) => {
            let mut node = Node::default();
            for (key, child) in map {
                match key.as_str() {
                    ATTRS_KEY => node.attrs = convert_attrs(child, path)?,
                    TEXT_KEY => node.text = scalar_text(child),
                    tag => {
                        let child_path = format!("{}/{}", path, tag);
                        let group = match child {
                            Value::Array(items) => items
                                .iter()
                                .map(|item| convert(item, &child_path))
                                .collect::<Result<Vec<_>>>()?,
                            single => vec![convert(single, &child_path)?],
                        };
                        node.children.insert(tag.to_string(), group);
                    }
                }
            }
            Ok(node)
        }
    }
}

fn convert_attrs(value: &Value, path: &str) -> Result<BTreeMap<String, String>> {
    let Value::Object(map) = value else {
        return Err(Error::TreeParse(format!(
            "Attributes at {} must be a map, found {}",
            path,
            value_kind(value)
        )));
    };

    let mut attrs = BTreeMap::new();
    for (name, v) in map {
        let text = scalar_text(v).ok_or_else(|| {
            Error::TreeParse(format!(
                "Attribute {}@{} must be a scalar, found {}",
                path,
                name,
                value_kind(v)
            ))
        })?;
        attrs.insert(name.clone(), text);
    }
    Ok(attrs)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}
