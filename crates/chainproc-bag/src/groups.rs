//! Group registry: per-action group order.
//!
//! Groups are declared per action with an integer priority. The registry
//! resolves them into an order from highest to lowest priority; groups
//! with equal priority keep their declaration order, so resolution never
//! fails on ties.

use indexmap::IndexMap;
use std::cmp::Reverse;

use chainproc_core::ConfigError;

/// Action whose processors are split into `item` and `collection` groups.
pub const CUSTOMIZE_LOADED_DATA: &str = "customize_loaded_data";
/// Action whose processors are fanned out into one group per form event.
pub const CUSTOMIZE_FORM_DATA: &str = "customize_form_data";

/// Group of item processors of [`CUSTOMIZE_LOADED_DATA`].
pub const ITEM_GROUP: &str = "item";
/// Group of collection processors of [`CUSTOMIZE_LOADED_DATA`].
pub const COLLECTION_GROUP: &str = "collection";

/// Form events of [`CUSTOMIZE_FORM_DATA`], in execution order.
pub mod events {
    /// Before submitted data is applied.
    pub const PRE_SUBMIT: &str = "pre_submit";
    /// While submitted data is applied.
    pub const SUBMIT: &str = "submit";
    /// After submitted data is applied.
    pub const POST_SUBMIT: &str = "post_submit";
    /// Before validation.
    pub const PRE_VALIDATE: &str = "pre_validate";
    /// After validation.
    pub const POST_VALIDATE: &str = "post_validate";
}

/// `group name → priority`, in declaration order.
pub type GroupPriorities = IndexMap<String, i32>;

/// The resolved group order of one action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionGroups {
    /// `group name → priority`, iterated in rank order.
    groups: IndexMap<String, i32>,
    names: Vec<String>,
}

impl ActionGroups {
    /// Resolve declared priorities into an order (stable, descending).
    pub fn resolve(declared: &GroupPriorities) -> Self {
        let mut sorted: Vec<(&String, i32)> = declared.iter().map(|(g, &p)| (g, p)).collect();
        sorted.sort_by_key(|&(_, priority)| Reverse(priority));

        let names: Vec<String> = sorted.iter().map(|(g, _)| (*g).clone()).collect();
        let groups = sorted.into_iter().map(|(g, p)| (g.clone(), p)).collect();
        Self { groups, names }
    }

    /// Group names from highest to lowest priority.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of `group` in the resolved order (0 runs first).
    pub fn rank(&self, group: &str) -> Option<usize> {
        self.groups.get_index_of(group)
    }

    /// Declared priority of `group`.
    pub fn priority(&self, group: &str) -> Option<i32> {
        self.groups.get(group).copied()
    }

    /// Whether `group` is declared for this action.
    pub fn contains(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no groups are declared.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Resolved group order for every action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupRegistry {
    actions: IndexMap<String, ActionGroups>,
}

impl GroupRegistry {
    /// Build a registry from declared priorities only.
    pub fn from_declared(declared: &IndexMap<String, GroupPriorities>) -> Self {
        let actions = declared
            .iter()
            .map(|(action, groups)| (action.clone(), ActionGroups::resolve(groups)))
            .collect();
        Self { actions }
    }

    /// Build a registry from declared priorities plus the synthetic groups
    /// of [`CUSTOMIZE_LOADED_DATA`] and [`CUSTOMIZE_FORM_DATA`].
    ///
    /// Synthetic groups replace any groups declared for those actions.
    pub fn with_synthetic_groups(declared: &IndexMap<String, GroupPriorities>) -> Self {
        let mut merged = declared.clone();
        for (action, groups) in synthetic_groups() {
            merged.insert(action, groups);
        }
        Self::from_declared(&merged)
    }

    /// Build a registry (with synthetic groups) from flat
    /// `(action, group, priority)` declarations.
    ///
    /// Declaring the same group twice for one action is an error.
    pub fn from_declarations<I, A, G>(declarations: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (A, G, i32)>,
        A: Into<String>,
        G: Into<String>,
    {
        let mut declared: IndexMap<String, GroupPriorities> = IndexMap::new();
        for (action, group, priority) in declarations {
            let action = action.into();
            let group = group.into();
            let groups = declared.entry(action.clone()).or_default();
            if groups.contains_key(&group) {
                return Err(ConfigError::DuplicateGroup { action, group });
            }
            groups.insert(group, priority);
        }
        Ok(Self::with_synthetic_groups(&declared))
    }

    /// Group names of `action`, from highest to lowest priority.
    ///
    /// Unknown actions have no groups.
    pub fn resolve_groups(&self, action: &str) -> &[String] {
        self.actions
            .get(action)
            .map(ActionGroups::names)
            .unwrap_or(&[])
    }

    /// The resolved groups of `action`, if any were declared.
    pub fn action_groups(&self, action: &str) -> Option<&ActionGroups> {
        self.actions.get(action)
    }

    /// Position of `group` in the resolved order of `action`.
    pub fn rank(&self, action: &str, group: &str) -> Option<usize> {
        self.actions.get(action)?.rank(group)
    }

    /// Actions with declared groups, in declaration order.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }
}

/// Fixed-priority groups injected for the built-in split actions.
pub fn synthetic_groups() -> IndexMap<String, GroupPriorities> {
    let loaded: GroupPriorities = [(ITEM_GROUP, 0), (COLLECTION_GROUP, -1)]
        .into_iter()
        .map(|(g, p)| (g.to_string(), p))
        .collect();
    let form: GroupPriorities = [
        (events::PRE_SUBMIT, 0),
        (events::SUBMIT, -1),
        (events::POST_SUBMIT, -2),
        (events::PRE_VALIDATE, -3),
        (events::POST_VALIDATE, -4),
    ]
    .into_iter()
    .map(|(g, p)| (g.to_string(), p))
    .collect();

    let mut out = IndexMap::new();
    out.insert(CUSTOMIZE_LOADED_DATA.to_string(), loaded);
    out.insert(CUSTOMIZE_FORM_DATA.to_string(), form);
    out
}
