//! The immutable processor bag.
//!
//! A [`ProcessorBag`] is assembled once at build time: group declarations
//! are resolved, processors are normalized, and every action's processors
//! are sorted into group-priority order and laid out against it. After construction the bag is
//! read-only and can be shared between threads.

use indexmap::IndexMap;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use chainproc_core::{ConfigError, ProcessorEntry};

use crate::config::BagConfig;
use crate::groups::{GroupPriorities, GroupRegistry};
use crate::layout::{order_by_group_priority, ActionProcessors};
use crate::normalize::normalize_processors;

/// Errors raised while loading or building a bag.
#[derive(Debug, Error)]
pub enum BagError {
    /// The configuration source is not valid JSON for [`BagConfig`].
    #[error("invalid bag configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A tag attribute has a value that cannot be represented.
    #[error("the \"{processor}\" processor has an invalid \"{attribute}\" tag attribute: {reason}")]
    InvalidAttribute {
        /// Offending processor.
        processor: String,
        /// Offending attribute key.
        attribute: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The configuration is well-formed but inconsistent.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Normalized processors and resolved group orders of every action.
#[derive(Clone, Debug, Default)]
pub struct ProcessorBag {
    registry: GroupRegistry,
    actions: BTreeMap<String, ActionProcessors>,
    empty: ActionProcessors,
}

impl ProcessorBag {
    /// Build a bag from declared group priorities and raw processors.
    ///
    /// Synthetic groups are injected and processors normalized before the
    /// layout is computed.
    pub fn build(
        declared: &IndexMap<String, GroupPriorities>,
        processors: IndexMap<String, Vec<ProcessorEntry>>,
    ) -> Result<Self, ConfigError> {
        Self::assemble(GroupRegistry::with_synthetic_groups(declared), processors)
    }

    /// Build a bag from a parsed configuration.
    pub fn from_config(config: &BagConfig) -> Result<Self, BagError> {
        let processors = config.processor_entries()?;
        Ok(Self::build(&config.group_priorities(), processors)?)
    }

    /// Parse a JSON configuration and build the bag.
    pub fn from_json(json: &str) -> Result<Self, BagError> {
        Self::from_config(&BagConfig::from_json(json)?)
    }

    /// Start an incremental build.
    pub fn builder() -> ProcessorBagBuilder {
        ProcessorBagBuilder::default()
    }

    fn assemble(
        registry: GroupRegistry,
        processors: IndexMap<String, Vec<ProcessorEntry>>,
    ) -> Result<Self, ConfigError> {
        let normalized = normalize_processors(processors, &registry)?;
        let actions: BTreeMap<String, ActionProcessors> = normalized
            .into_iter()
            .map(|(action, entries)| {
                let groups = registry.action_groups(&action).cloned().unwrap_or_default();
                let layout = ActionProcessors::new(order_by_group_priority(entries, &groups), groups);
                (action, layout)
            })
            .collect();

        debug!(
            actions = actions.len(),
            processors = actions.values().map(ActionProcessors::len).sum::<usize>(),
            "processor bag built"
        );

        Ok(Self {
            registry,
            actions,
            empty: ActionProcessors::default(),
        })
    }

    /// The resolved group orders.
    pub fn groups(&self) -> &GroupRegistry {
        &self.registry
    }

    /// Group names of `action`, from highest to lowest priority.
    pub fn resolve_groups(&self, action: &str) -> &[String] {
        self.registry.resolve_groups(action)
    }

    /// Normalized processors of `action` in execution order. Unknown
    /// actions have none.
    pub fn processors(&self, action: &str) -> &ActionProcessors {
        self.actions.get(action).unwrap_or(&self.empty)
    }

    /// Actions that have processors, in lexicographic order.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }
}

/// Incremental builder for [`ProcessorBag`].
///
/// # Examples
///
/// ```
/// use chainproc_bag::ProcessorBag;
/// use chainproc_core::{ProcessorAttributes, ProcessorEntry};
///
/// let bag = ProcessorBag::builder()
///     .add_group("get", "load", 10)
///     .add_group("get", "normalize", -10)
///     .add_processor("get", ProcessorEntry::new("loader", ProcessorAttributes::new().with_group("load")))
///     .build()
///     .unwrap();
/// assert_eq!(bag.resolve_groups("get"), &["load", "normalize"]);
/// assert_eq!(bag.processors("get").len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ProcessorBagBuilder {
    groups: Vec<(String, String, i32)>,
    processors: IndexMap<String, Vec<ProcessorEntry>>,
}

impl ProcessorBagBuilder {
    /// Declare a group for an action.
    pub fn add_group(
        mut self,
        action: impl Into<String>,
        group: impl Into<String>,
        priority: i32,
    ) -> Self {
        self.groups.push((action.into(), group.into(), priority));
        self
    }

    /// Register a processor for an action.
    pub fn add_processor(mut self, action: impl Into<String>, entry: ProcessorEntry) -> Self {
        self.processors.entry(action.into()).or_default().push(entry);
        self
    }

    /// Validate the declarations and build the bag.
    pub fn build(self) -> Result<ProcessorBag, ConfigError> {
        let registry = GroupRegistry::from_declarations(self.groups)?;
        ProcessorBag::assemble(registry, self.processors)
    }
}
