//! Test utilities and mock types for chainproc development.
//!
//! Provides entry fixtures ([`entry`], [`grouped`], [`entry_with`]), a
//! [`MockResolver`] mapping ids to boxed processors, and the reusable
//! processors in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use indexmap::IndexMap;

use chainproc_core::{
    Processor, ProcessorAttributes, ProcessorEntry, ProcessorId, ProcessorResolver,
};

pub use fixtures::{CallLog, FailingProcessor, FnProcessor, RecordingProcessor};

/// An ungrouped entry with no attributes.
pub fn entry(id: &str) -> ProcessorEntry {
    ProcessorEntry::new(id, ProcessorAttributes::new())
}

/// An entry belonging to `group`.
pub fn grouped(id: &str, group: &str) -> ProcessorEntry {
    ProcessorEntry::new(id, ProcessorAttributes::new().with_group(group))
}

/// An entry with the given attributes.
pub fn entry_with(id: &str, attributes: ProcessorAttributes) -> ProcessorEntry {
    ProcessorEntry::new(id, attributes)
}

/// The ids of `entries`, in order.
pub fn ids(entries: &[ProcessorEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.id().as_str()).collect()
}

/// Mock implementation of [`ProcessorResolver`].
///
/// Backed by an `IndexMap<ProcessorId, Box<dyn Processor>>`. Register
/// processors with [`insert`](MockResolver::insert) before handing the
/// resolver to code under test.
#[derive(Default)]
pub struct MockResolver {
    processors: IndexMap<ProcessorId, Box<dyn Processor>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver with a [`RecordingProcessor`] for every id, all writing
    /// to `log`.
    pub fn recording<'a>(ids: impl IntoIterator<Item = &'a str>, log: &CallLog) -> Self {
        let mut resolver = Self::new();
        for id in ids {
            resolver.insert(id, RecordingProcessor::new(id, log.clone()));
        }
        resolver
    }

    /// Register (or replace) the processor for `id`.
    pub fn insert(&mut self, id: impl Into<ProcessorId>, processor: impl Processor + 'static) {
        self.processors.insert(id.into(), Box::new(processor));
    }

    /// Number of registered processors.
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl ProcessorResolver for MockResolver {
    fn resolve(&self, id: &ProcessorId) -> Option<&dyn Processor> {
        self.processors.get(id).map(|p| p.as_ref())
    }
}
