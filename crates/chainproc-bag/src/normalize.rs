//! Processor normalization.
//!
//! Rewrites the raw per-action processor registrations before the bag is
//! frozen. Most actions pass through untouched; two built-in actions
//! derive the `group` attribute from a semantic attribute instead:
//!
//! - [`CUSTOMIZE_LOADED_DATA`] splits processors into an `item` and a
//!   `collection` group by the boolean `collection` attribute and
//!   normalizes `identifier_only` on item processors.
//! - [`CUSTOMIZE_FORM_DATA`] clones every processor into one group per
//!   form event named by its `event` attribute.
//!
//! Entries that already carry the group the normalizer would compute are
//! accepted as-is, so normalizing normalized output is a no-op.

use indexmap::IndexMap;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use tracing::debug;

use chainproc_core::{keys, AttributeValue, ConfigError, ProcessorEntry, ProcessorId};

use crate::groups::{
    GroupRegistry, COLLECTION_GROUP, CUSTOMIZE_FORM_DATA, CUSTOMIZE_LOADED_DATA, ITEM_GROUP,
};

/// How an action's processors are normalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    /// Processors pass through unchanged.
    Generic,
    /// Processors are split into `item` and `collection` groups.
    ItemCollectionSplit,
    /// Processors are cloned into one group per event.
    EventFanout,
}

impl ActionKind {
    /// The kind of the named action.
    pub fn of(action: &str) -> Self {
        match action {
            CUSTOMIZE_LOADED_DATA => Self::ItemCollectionSplit,
            CUSTOMIZE_FORM_DATA => Self::EventFanout,
            _ => Self::Generic,
        }
    }

    /// The attribute the normalizer maps to `group`, if any.
    pub fn semantic_attribute(self) -> Option<&'static str> {
        match self {
            Self::Generic => None,
            Self::ItemCollectionSplit => Some(keys::COLLECTION),
            Self::EventFanout => Some(keys::EVENT),
        }
    }
}

/// Parsed value of the `event` attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventSelector {
    /// A single event.
    Single(String),
    /// Any of several events.
    AnyOf(Vec<String>),
}

impl EventSelector {
    /// Interpret an attribute value. Only strings and any-of lists are
    /// event selectors.
    pub fn from_attribute(value: AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Str(name) => Some(Self::Single(name)),
            AttributeValue::AnyOf(names) => Some(Self::AnyOf(names)),
            _ => None,
        }
    }

    /// The selected event names, in declaration order of the selector.
    pub fn names(&self) -> &[String] {
        match self {
            Self::Single(name) => std::slice::from_ref(name),
            Self::AnyOf(names) => names,
        }
    }
}

/// Normalize the raw processors of every action.
///
/// The output is keyed by action name in lexicographic order. Any
/// [`ConfigError`] aborts the whole normalization.
pub fn normalize_processors(
    processors: IndexMap<String, Vec<ProcessorEntry>>,
    groups: &GroupRegistry,
) -> Result<BTreeMap<String, Vec<ProcessorEntry>>, ConfigError> {
    let mut out = BTreeMap::new();
    for (action, entries) in processors {
        let normalized = match ActionKind::of(&action) {
            ActionKind::Generic => entries,
            ActionKind::ItemCollectionSplit => split_item_collection(&action, entries)?,
            ActionKind::EventFanout => {
                fan_out_events(&action, entries, groups.resolve_groups(&action))?
            }
        };
        debug!(
            action = %action,
            processors = normalized.len(),
            "normalized action processors"
        );
        out.insert(action, normalized);
    }
    Ok(out)
}

fn group_not_allowed(id: &ProcessorId, action: &str) -> ConfigError {
    let expected = ActionKind::of(action).semantic_attribute().unwrap_or(keys::GROUP);
    ConfigError::GroupAttributeNotAllowed {
        processor: id.to_string(),
        action: action.to_string(),
        expected_attribute: expected.to_string(),
    }
}

// ── Item / collection split ────────────────────────────────────────

fn split_item_collection(
    action: &str,
    entries: Vec<ProcessorEntry>,
) -> Result<Vec<ProcessorEntry>, ConfigError> {
    let mut items = Vec::new();
    let mut collections = Vec::new();

    for entry in entries {
        let (id, mut attrs) = entry.into_parts();
        if attrs.contains(keys::GROUP) {
            return Err(group_not_allowed(&id, action));
        }
        let preset = attrs.clear_group();
        let flag = attrs.remove(keys::COLLECTION);

        let (is_collection, normalized) = match (preset, flag) {
            (Some(_), Some(_)) => return Err(group_not_allowed(&id, action)),
            (Some(group), None) if group == ITEM_GROUP => (false, true),
            (Some(group), None) if group == COLLECTION_GROUP => (true, true),
            (Some(_), None) => return Err(group_not_allowed(&id, action)),
            (None, Some(AttributeValue::Bool(b))) => (b, false),
            (None, Some(AttributeValue::Null)) | (None, None) => (false, false),
            (None, Some(other)) => {
                return Err(ConfigError::InvalidCollectionAttribute {
                    processor: id.to_string(),
                    found: other.kind().to_string(),
                })
            }
        };

        if is_collection {
            if attrs.contains(keys::IDENTIFIER_ONLY) {
                return Err(ConfigError::IdentifierOnlyNotSupported {
                    processor: id.to_string(),
                });
            }
            attrs.set_group(COLLECTION_GROUP);
            collections.push(ProcessorEntry::new(id, attrs));
        } else {
            if !normalized {
                match attrs.get(keys::IDENTIFIER_ONLY) {
                    None => attrs.prepend(keys::IDENTIFIER_ONLY, false),
                    Some(AttributeValue::Null) => {
                        attrs.remove(keys::IDENTIFIER_ONLY);
                    }
                    Some(_) => {}
                }
            }
            attrs.set_group(ITEM_GROUP);
            items.push(ProcessorEntry::new(id, attrs));
        }
    }

    items.append(&mut collections);
    Ok(items)
}

// ── Event fan-out ──────────────────────────────────────────────────

fn fan_out_events(
    action: &str,
    entries: Vec<ProcessorEntry>,
    events: &[String],
) -> Result<Vec<ProcessorEntry>, ConfigError> {
    let mut buckets: IndexMap<&str, Vec<ProcessorEntry>> =
        events.iter().map(|e| (e.as_str(), Vec::new())).collect();

    for entry in entries {
        let (id, mut attrs) = entry.into_parts();
        if attrs.contains(keys::GROUP) {
            return Err(group_not_allowed(&id, action));
        }
        let preset = attrs.clear_group();
        let selector = match (preset, attrs.remove(keys::EVENT)) {
            (Some(_), Some(_)) => return Err(group_not_allowed(&id, action)),
            (Some(group), None) => {
                if !events.contains(&group) {
                    return Err(group_not_allowed(&id, action));
                }
                Some(EventSelector::Single(group))
            }
            (None, Some(value)) => Some(EventSelector::from_attribute(value).ok_or_else(|| {
                ConfigError::InvalidEventAttribute {
                    processor: id.to_string(),
                    action: action.to_string(),
                }
            })?),
            (None, None) => None,
        };

        let mut targets: SmallVec<[&str; 5]> = SmallVec::new();
        match &selector {
            None => targets.extend(events.iter().map(String::as_str)),
            Some(selector) => {
                for name in selector.names() {
                    let Some(event) = events.iter().find(|e| *e == name) else {
                        return Err(ConfigError::UnknownEvent {
                            processor: id.to_string(),
                            action: action.to_string(),
                            event: name.clone(),
                            supported: events.to_vec(),
                        });
                    };
                    if !targets.contains(&event.as_str()) {
                        targets.push(event.as_str());
                    }
                }
            }
        }

        for event in targets {
            let mut clone = attrs.clone();
            clone.set_group(event);
            if let Some(bucket) = buckets.get_mut(event) {
                bucket.push(ProcessorEntry::new(id.clone(), clone));
            }
        }
    }

    Ok(buckets.into_values().flatten().collect())
}
