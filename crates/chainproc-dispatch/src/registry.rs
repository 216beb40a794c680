//! Owned processor registry.

use indexmap::IndexMap;
use std::sync::Arc;

use chainproc_bag::ProcessorBag;
use chainproc_core::{Processor, ProcessorId, ProcessorResolver};

/// Maps processor ids to shared processor instances.
///
/// The same instance may be registered under several ids.
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    processors: IndexMap<ProcessorId, Arc<dyn Processor>>,
}

impl ProcessorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the processor for `id`.
    pub fn register(&mut self, id: impl Into<ProcessorId>, processor: impl Processor + 'static) {
        self.processors.insert(id.into(), Arc::new(processor));
    }

    /// Register an already shared processor.
    pub fn register_shared(&mut self, id: impl Into<ProcessorId>, processor: Arc<dyn Processor>) {
        self.processors.insert(id.into(), processor);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, id: impl Into<ProcessorId>, processor: impl Processor + 'static) -> Self {
        self.register(id, processor);
        self
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.processors.contains_key(id)
    }

    /// Ids scheduled in `bag` that have no registered processor, in
    /// action order and without duplicates.
    pub fn missing<'b>(&self, bag: &'b ProcessorBag) -> Vec<&'b ProcessorId> {
        let mut missing: Vec<&ProcessorId> = Vec::new();
        for action in bag.actions() {
            for entry in bag.processors(action).entries() {
                if !self.contains(entry.id().as_str()) && !missing.contains(&entry.id()) {
                    missing.push(entry.id());
                }
            }
        }
        missing
    }

    /// Number of registered ids.
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl ProcessorResolver for ProcessorRegistry {
    fn resolve(&self, id: &ProcessorId) -> Option<&dyn Processor> {
        self.processors.get(id).map(|p| p.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainproc_test_utils::{entry, grouped, CallLog, RecordingProcessor};

    #[test]
    fn resolves_registered_ids() {
        let log = CallLog::new();
        let registry = ProcessorRegistry::new().with("p1", RecordingProcessor::new("p1", log));
        assert_eq!(registry.len(), 1);
        assert!(registry.resolve(&ProcessorId::new("p1")).is_some());
        assert!(registry.resolve(&ProcessorId::new("p2")).is_none());
    }

    #[test]
    fn shared_instance_under_two_ids() {
        let log = CallLog::new();
        let shared: Arc<dyn Processor> = Arc::new(RecordingProcessor::new("shared", log));
        let mut registry = ProcessorRegistry::new();
        registry.register_shared("a", Arc::clone(&shared));
        registry.register_shared("b", shared);
        assert!(registry.contains("a") && registry.contains("b"));
    }

    #[test]
    fn reports_missing_ids_once() {
        let bag = ProcessorBag::builder()
            .add_group("get", "load", 0)
            .add_processor("get", entry("known"))
            .add_processor("get", grouped("ghost", "load"))
            .add_processor("get_list", entry("ghost"))
            .build()
            .unwrap();
        let registry =
            ProcessorRegistry::new().with("known", RecordingProcessor::new("known", CallLog::new()));
        let missing: Vec<&str> = registry.missing(&bag).iter().map(|id| id.as_str()).collect();
        assert_eq!(missing, vec!["ghost"]);
    }
}
