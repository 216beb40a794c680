//! Per-operation execution context.
//!
//! An [`ExecutionContext`] is created for one logical operation, carries
//! the action being executed plus the group directives that steer
//! iteration, and is discarded when the operation completes. It is never
//! shared between concurrent iterations.

use indexmap::{IndexMap, IndexSet};

use crate::attribute::AttributeValue;

/// State consulted by the scheduler and by applicability checkers.
///
/// # Group directives
///
/// - **skipped groups**: processors of these groups are never yielded.
/// - **first group**: groups ordered before it are not executed.
/// - **last group**: groups ordered after it are not executed.
///
/// Directives are read on every advance of an iterator, so a processor
/// may change them for the remainder of the current run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    action: String,
    skipped_groups: IndexSet<String>,
    first_group: Option<String>,
    last_group: Option<String>,
    attributes: IndexMap<String, AttributeValue>,
}

impl ExecutionContext {
    /// Create a context for the given action with no directives.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    /// The action being executed.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Change the action being executed.
    pub fn set_action(&mut self, action: impl Into<String>) {
        self.action = action.into();
    }

    // ── Skipped groups ─────────────────────────────────────────

    /// Exclude all processors of `group`. Skipping twice is a no-op.
    pub fn skip_group(&mut self, group: impl Into<String>) {
        self.skipped_groups.insert(group.into());
    }

    /// Re-enable a previously skipped group.
    pub fn undo_group_skipping(&mut self, group: &str) {
        self.skipped_groups.shift_remove(group);
    }

    /// Re-enable all skipped groups.
    pub fn reset_skipped_groups(&mut self) {
        self.skipped_groups.clear();
    }

    /// Whether `group` is currently skipped.
    pub fn is_skipped_group(&self, group: &str) -> bool {
        self.skipped_groups.contains(group)
    }

    /// Whether any group is skipped.
    pub fn has_skipped_groups(&self) -> bool {
        !self.skipped_groups.is_empty()
    }

    /// Skipped groups, in the order they were first skipped.
    pub fn skipped_groups(&self) -> impl Iterator<Item = &str> {
        self.skipped_groups.iter().map(String::as_str)
    }

    // ── First / last group ─────────────────────────────────────

    /// The group execution starts at, if set.
    pub fn first_group(&self) -> Option<&str> {
        self.first_group.as_deref()
    }

    /// Start execution at `group`.
    pub fn set_first_group(&mut self, group: impl Into<String>) {
        self.first_group = Some(group.into());
    }

    /// Remove the first-group directive.
    pub fn clear_first_group(&mut self) {
        self.first_group = None;
    }

    /// The group execution stops after, if set.
    pub fn last_group(&self) -> Option<&str> {
        self.last_group.as_deref()
    }

    /// Stop execution after `group`.
    pub fn set_last_group(&mut self, group: impl Into<String>) {
        self.last_group = Some(group.into());
    }

    /// Remove the last-group directive.
    pub fn clear_last_group(&mut self) {
        self.last_group = None;
    }

    // ── Attributes ─────────────────────────────────────────────

    /// Set a request-scoped attribute.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Look up a request-scoped attribute.
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Whether a request-scoped attribute is present.
    pub fn has(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Remove a request-scoped attribute.
    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        self.attributes.shift_remove(key)
    }

    /// Iterate request-scoped attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }
}
