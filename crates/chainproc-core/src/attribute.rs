//! Typed processor attributes.
//!
//! Processors are registered with a bag of key/value attributes. The
//! values are a closed set of variants ([`AttributeValue`]) and the
//! `group` attribute, which every scheduling decision consults, lives in
//! a dedicated typed slot of [`ProcessorAttributes`] instead of the map.

use indexmap::IndexMap;
use std::fmt;

use crate::id::ProcessorId;

/// Well-known attribute keys.
pub mod keys {
    /// Group the processor belongs to. Stored in the typed group slot.
    pub const GROUP: &str = "group";
    /// Target sub-phase(s) of an event fan-out action.
    pub const EVENT: &str = "event";
    /// Marks an item/collection-split processor as a collection processor.
    pub const COLLECTION: &str = "collection";
    /// Restricts an item processor to identifier-only (or full) loads.
    pub const IDENTIFIER_ONLY: &str = "identifier_only";
    /// Disables a processor unconditionally.
    pub const DISABLED: &str = "disabled";
    /// Processor priority inside its group. Higher runs earlier.
    pub const PRIORITY: &str = "priority";
}

/// A single attribute value.
///
/// `AnyOf`, `AllOf` and `Not` are matcher expressions: they describe which
/// context values a processor accepts rather than a plain value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeValue {
    /// Explicit "no value". Meaningful for `identifier_only`.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Plain string.
    Str(String),
    /// Ordered list of strings (a plain value, not a matcher).
    List(Vec<String>),
    /// Matches when any of the names matches.
    AnyOf(Vec<String>),
    /// Matches when all of the names match.
    AllOf(Vec<String>),
    /// Matches when the name does not match.
    Not(String),
}

impl AttributeValue {
    /// The boolean payload, if this is a [`AttributeValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The string payload, if this is a [`AttributeValue::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is [`AttributeValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::AnyOf(_) => "any-of",
            Self::AllOf(_) => "all-of",
            Self::Not(_) => "not",
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
            Self::AnyOf(items) => write!(f, "{}", items.join("|")),
            Self::AllOf(items) => write!(f, "{}", items.join("&")),
            Self::Not(name) => write!(f, "!{name}"),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// The attributes a processor was registered with.
///
/// Insertion order of the non-group attributes is preserved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessorAttributes {
    group: Option<String>,
    values: IndexMap<String, AttributeValue>,
}

impl ProcessorAttributes {
    /// Create an empty attribute set (ungrouped, no attributes).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style [`set_group`](Self::set_group).
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.set_group(group);
        self
    }

    /// The group this processor belongs to, if any.
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Assign the processor to a group, returning the previous group.
    pub fn set_group(&mut self, group: impl Into<String>) -> Option<String> {
        self.group.replace(group.into())
    }

    /// Remove the group assignment, returning it.
    pub fn clear_group(&mut self) -> Option<String> {
        self.group.take()
    }

    /// Insert an attribute, returning the previous value under that key.
    ///
    /// A string value under [`keys::GROUP`] is routed to the typed group
    /// slot. Any other value under that key is kept as a plain attribute;
    /// it never takes part in group scheduling and the bag normalizer
    /// rejects it for actions that compute their groups.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        let key = key.into();
        match value.into() {
            AttributeValue::Str(group) if key == keys::GROUP => {
                self.group.replace(group).map(AttributeValue::Str)
            }
            value => self.values.insert(key, value),
        }
    }

    /// Insert an attribute in front of all other attributes.
    ///
    /// An existing entry under `key` is moved to the front.
    pub fn prepend(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.values.shift_insert(0, key.into(), value.into());
    }

    /// Remove an attribute, preserving the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        self.values.shift_remove(key)
    }

    /// Look up a (non-group) attribute.
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.values.get(key)
    }

    /// Whether a (non-group) attribute is present, including `Null` values.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Whether the processor is flagged with `disabled = true`.
    pub fn is_disabled(&self) -> bool {
        self.get(keys::DISABLED).and_then(AttributeValue::as_bool) == Some(true)
    }

    /// Iterate the (non-group) attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Attribute keys in insertion order, excluding the group.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of (non-group) attributes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are neither attributes nor a group.
    pub fn is_empty(&self) -> bool {
        self.group.is_none() && self.values.is_empty()
    }
}

/// A registered processor: its id plus the attributes it was tagged with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessorEntry {
    id: ProcessorId,
    attributes: ProcessorAttributes,
}

impl ProcessorEntry {
    /// Create an entry.
    pub fn new(id: impl Into<ProcessorId>, attributes: ProcessorAttributes) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }

    /// The processor id.
    pub fn id(&self) -> &ProcessorId {
        &self.id
    }

    /// The processor attributes.
    pub fn attributes(&self) -> &ProcessorAttributes {
        &self.attributes
    }

    /// Shorthand for `self.attributes().group()`.
    pub fn group(&self) -> Option<&str> {
        self.attributes.group()
    }

    /// Split the entry into its id and attributes.
    pub fn into_parts(self) -> (ProcessorId, ProcessorAttributes) {
        (self.id, self.attributes)
    }
}
