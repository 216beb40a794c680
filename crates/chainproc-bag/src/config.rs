//! Declarative bag configuration.
//!
//! A [`BagConfig`] is the serde model of the configuration source: group
//! declarations per action plus a flat list of processor tags.
//!
//! ```json
//! {
//!   "actions": { "get": { "processing_groups": { "load": { "priority": 10 } } } },
//!   "processors": [ { "id": "p1", "action": "get", "group": "load", "disabled": true } ]
//! }
//! ```
//!
//! Tag attributes other than `id` and `action` are kept as raw JSON and
//! converted to [`AttributeValue`]s by [`ProcessorTag::to_entry`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use chainproc_core::{keys, AttributeValue, ProcessorAttributes, ProcessorEntry};

use crate::bag::BagError;
use crate::groups::GroupPriorities;
use crate::normalize::ActionKind;

/// Root of the configuration source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BagConfig {
    /// Per-action group declarations.
    #[serde(default)]
    pub actions: IndexMap<String, ActionConfig>,
    /// Processor registrations, in declaration order.
    #[serde(default)]
    pub processors: Vec<ProcessorTag>,
}

/// Group declarations of one action.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    /// `group name → declaration`.
    #[serde(default)]
    pub processing_groups: IndexMap<String, GroupConfig>,
}

/// A single group declaration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Higher runs earlier.
    #[serde(default)]
    pub priority: i32,
}

/// One processor registration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessorTag {
    /// Processor id.
    pub id: String,
    /// Action the processor belongs to.
    pub action: String,
    /// Remaining tag attributes, in source order.
    #[serde(flatten)]
    pub attributes: IndexMap<String, Value>,
}

impl BagConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Declared group priorities per action.
    pub fn group_priorities(&self) -> IndexMap<String, GroupPriorities> {
        self.actions
            .iter()
            .map(|(action, config)| {
                let groups = config
                    .processing_groups
                    .iter()
                    .map(|(group, g)| (group.clone(), g.priority))
                    .collect();
                (action.clone(), groups)
            })
            .collect()
    }

    /// Convert every tag, grouped by action in first-seen order.
    pub fn processor_entries(&self) -> Result<IndexMap<String, Vec<ProcessorEntry>>, BagError> {
        let mut out: IndexMap<String, Vec<ProcessorEntry>> = IndexMap::new();
        for tag in &self.processors {
            out.entry(tag.action.clone()).or_default().push(tag.to_entry()?);
        }
        Ok(out)
    }
}

impl ProcessorTag {
    /// Convert the tag into a processor entry.
    ///
    /// For actions that take their groups from the tag, `group` must be a
    /// single group name. Actions that compute their groups leave the check
    /// to the normalizer, which rejects any `group` tag it does not expect.
    pub fn to_entry(&self) -> Result<ProcessorEntry, BagError> {
        let generic = ActionKind::of(&self.action) == ActionKind::Generic;
        let mut attrs = ProcessorAttributes::new();
        for (key, raw) in &self.attributes {
            let invalid = |reason: &str| BagError::InvalidAttribute {
                processor: self.id.clone(),
                attribute: key.clone(),
                reason: reason.to_string(),
            };
            let value = parse_value(raw).map_err(invalid)?;
            if generic && key == keys::GROUP && value.as_str().is_none() {
                return Err(invalid("a single group name is expected"));
            }
            attrs.insert(key.clone(), value);
        }
        Ok(ProcessorEntry::new(self.id.as_str(), attrs))
    }
}

/// Convert a raw JSON tag value.
///
/// Strings use a small expression syntax: `a|b` is any-of, `a&b` is
/// all-of and `!a` is a negation.
pub fn parse_value(raw: &Value) -> Result<AttributeValue, &'static str> {
    match raw {
        Value::Null => Ok(AttributeValue::Null),
        Value::Bool(b) => Ok(AttributeValue::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(AttributeValue::Int)
            .ok_or("only integer numbers are supported"),
        Value::String(s) => Ok(parse_expression(s)),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(AttributeValue::List)
            .ok_or("arrays must contain only strings"),
        Value::Object(_) => Err("objects are not supported"),
    }
}

fn parse_expression(s: &str) -> AttributeValue {
    let split = |sep: char| -> Vec<String> { s.split(sep).map(|p| p.trim().to_string()).collect() };
    if s.contains('|') {
        AttributeValue::AnyOf(split('|'))
    } else if s.contains('&') {
        AttributeValue::AllOf(split('&'))
    } else if let Some(name) = s.strip_prefix('!') {
        AttributeValue::Not(name.to_string())
    } else {
        AttributeValue::Str(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_document() {
        let config = BagConfig::from_json(
            r#"{
                "actions": {
                    "get": { "processing_groups": { "load": { "priority": 10 }, "normalize": {} } }
                },
                "processors": [
                    { "id": "p1", "action": "get", "group": "load", "disabled": true },
                    { "id": "p2", "action": "get" }
                ]
            }"#,
        )
        .unwrap();

        let groups = config.group_priorities();
        assert_eq!(groups["get"]["load"], 10);
        assert_eq!(groups["get"]["normalize"], 0);

        let entries = config.processor_entries().unwrap();
        let get = &entries["get"];
        assert_eq!(get.len(), 2);
        assert_eq!(get[0].group(), Some("load"));
        assert!(get[0].attributes().is_disabled());
        assert!(get[1].attributes().is_empty());
    }

    #[test]
    fn empty_document_is_valid() {
        let config = BagConfig::from_json("{}").unwrap();
        assert!(config.actions.is_empty());
        assert!(config.processors.is_empty());
    }

    #[test]
    fn tag_attributes_keep_source_order() {
        let config = BagConfig::from_json(
            r#"{ "processors": [ { "id": "p", "action": "a", "z": 1, "b": 2, "m": 3 } ] }"#,
        )
        .unwrap();
        let entry = config.processors[0].to_entry().unwrap();
        let keys: Vec<&str> = entry.attributes().keys().collect();
        assert_eq!(keys, vec!["z", "b", "m"]);
    }

    // ── Value syntax ───────────────────────────────────────────

    #[test]
    fn scalar_values() {
        assert_eq!(parse_value(&json!(null)), Ok(AttributeValue::Null));
        assert_eq!(parse_value(&json!(false)), Ok(AttributeValue::Bool(false)));
        assert_eq!(parse_value(&json!(-7)), Ok(AttributeValue::Int(-7)));
        assert_eq!(parse_value(&json!("rest")), Ok(AttributeValue::from("rest")));
    }

    #[test]
    fn expression_values() {
        assert_eq!(
            parse_value(&json!("submit|post_submit")),
            Ok(AttributeValue::AnyOf(vec!["submit".into(), "post_submit".into()]))
        );
        assert_eq!(
            parse_value(&json!("rest & json_api")),
            Ok(AttributeValue::AllOf(vec!["rest".into(), "json_api".into()]))
        );
        assert_eq!(
            parse_value(&json!("!rest")),
            Ok(AttributeValue::Not("rest".into()))
        );
        assert_eq!(
            parse_value(&json!(["a", "b"])),
            Ok(AttributeValue::List(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn unsupported_values_rejected() {
        assert!(parse_value(&json!(1.5)).is_err());
        assert!(parse_value(&json!({"a": 1})).is_err());
        assert!(parse_value(&json!([1, 2])).is_err());
    }

    #[test]
    fn invalid_tag_names_processor_and_key() {
        let tag = ProcessorTag {
            id: "p1".into(),
            action: "get".into(),
            attributes: [(keys::EVENT.to_string(), json!({"x": 1}))].into_iter().collect(),
        };
        match tag.to_entry() {
            Err(BagError::InvalidAttribute {
                processor,
                attribute,
                ..
            }) => {
                assert_eq!(processor, "p1");
                assert_eq!(attribute, keys::EVENT);
            }
            other => panic!("expected InvalidAttribute, got {other:?}"),
        }
    }

    #[test]
    fn generic_group_must_be_a_name() {
        for raw in [json!(["x"]), json!("load|normalize"), json!(true)] {
            let tag = ProcessorTag {
                id: "p1".into(),
                action: "get".into(),
                attributes: [(keys::GROUP.to_string(), raw)].into_iter().collect(),
            };
            match tag.to_entry() {
                Err(BagError::InvalidAttribute { attribute, .. }) => {
                    assert_eq!(attribute, keys::GROUP);
                }
                other => panic!("expected InvalidAttribute, got {other:?}"),
            }
        }
    }

    #[test]
    fn computed_group_actions_defer_group_checks() {
        let tag = ProcessorTag {
            id: "p1".into(),
            action: "customize_loaded_data".into(),
            attributes: [(keys::GROUP.to_string(), json!(["x"]))].into_iter().collect(),
        };
        let entry = tag.to_entry().unwrap();
        assert_eq!(entry.group(), None);
        assert!(entry.attributes().contains(keys::GROUP));
    }
}
