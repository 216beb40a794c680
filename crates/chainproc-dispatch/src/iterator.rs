//! Optimized processor iterator.
//!
//! [`ProcessorIterator`] walks an action's normalized processors in the
//! execution order fixed by the bag and yields the ones that should run, honoring the
//! context's group directives:
//!
//! - ungrouped processors are always candidates;
//! - processors of a skipped group are never yielded;
//! - groups ordered before the first group, or after the last group, are
//!   excluded (an unknown first or last group is ignored);
//! - if the first group is ordered after the last group, only ungrouped
//!   processors remain.
//!
//! Excluded runs of same-group processors are jumped over using the
//! layout precomputed by the bag, so the applicability checker is only
//! consulted for candidates, one processor per advance.
//!
//! The iterator does not borrow the context. Every advance takes it
//! anew, so a processor executed between two advances may change the
//! directives for the rest of the run.

use std::iter::FusedIterator;

use chainproc_bag::{ActionProcessors, ProcessorBag};
use chainproc_core::{
    ApplicableChecker, ExecutionContext, Processor, ProcessorAttributes, ProcessorEntry,
    ProcessorId, ProcessorResolver,
};

use crate::error::DispatchError;

/// Position of a [`ProcessorIterator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IteratorState {
    /// Created or rewound; nothing inspected yet.
    PositionedBeforeFirst,
    /// At least one advance made, entries remain.
    Scanning,
    /// Every entry has been inspected.
    Exhausted,
}

/// A yielded processor together with its registration.
#[derive(Clone, Copy)]
pub struct ResolvedProcessor<'a> {
    entry: &'a ProcessorEntry,
    processor: &'a dyn Processor,
}

impl<'a> ResolvedProcessor<'a> {
    /// The processor id.
    pub fn id(&self) -> &'a ProcessorId {
        self.entry.id()
    }

    /// The group the processor runs in, if any.
    pub fn group(&self) -> Option<&'a str> {
        self.entry.group()
    }

    /// The processor's normalized attributes.
    pub fn attributes(&self) -> &'a ProcessorAttributes {
        self.entry.attributes()
    }

    /// The resolved processor.
    pub fn processor(&self) -> &'a dyn Processor {
        self.processor
    }
}

impl std::fmt::Debug for ResolvedProcessor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedProcessor")
            .field("id", self.entry.id())
            .field("group", &self.entry.group())
            .finish()
    }
}

/// Group-aware, lazily filtered iteration over one action's processors.
pub struct ProcessorIterator<'a> {
    action: String,
    processors: &'a ActionProcessors,
    checker: &'a dyn ApplicableChecker,
    resolver: &'a dyn ProcessorResolver,
    index: usize,
    state: IteratorState,
}

/// Create an iterator over the processors of `context.action()`.
///
/// The context is only consulted for the action name here; directives
/// are read on every advance.
pub fn create_iterator<'a>(
    bag: &'a ProcessorBag,
    context: &ExecutionContext,
    checker: &'a dyn ApplicableChecker,
    resolver: &'a dyn ProcessorResolver,
) -> ProcessorIterator<'a> {
    ProcessorIterator::new(
        context.action(),
        bag.processors(context.action()),
        checker,
        resolver,
    )
}

impl<'a> ProcessorIterator<'a> {
    /// Create an iterator over a laid-out processor list.
    pub fn new(
        action: impl Into<String>,
        processors: &'a ActionProcessors,
        checker: &'a dyn ApplicableChecker,
        resolver: &'a dyn ProcessorResolver,
    ) -> Self {
        Self {
            action: action.into(),
            processors,
            checker,
            resolver,
            index: 0,
            state: IteratorState::PositionedBeforeFirst,
        }
    }

    /// The action being iterated.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Current position.
    pub fn state(&self) -> IteratorState {
        self.state
    }

    /// Return to the start. The next advance re-reads the directives.
    pub fn rewind(&mut self) {
        self.index = 0;
        self.state = IteratorState::PositionedBeforeFirst;
    }

    /// Advance to the next applicable processor.
    ///
    /// Returns `None` once exhausted. A scheduled id the resolver does not
    /// know is reported as [`DispatchError::UnknownProcessor`]; iteration
    /// may continue past it.
    pub fn next_applicable(
        &mut self,
        context: &ExecutionContext,
    ) -> Option<Result<ResolvedProcessor<'a>, DispatchError>> {
        if self.state == IteratorState::Exhausted {
            return None;
        }
        self.state = IteratorState::Scanning;

        let bounds = Bounds::read(self.processors, context);
        let processors = self.processors;
        let entries = processors.entries();
        while let Some(entry) = entries.get(self.index) {
            let i = self.index;
            if let Some(group) = entry.group() {
                if bounds.excludes(group, processors.rank(i), context) {
                    self.index = processors.span_end(i);
                    continue;
                }
            }
            self.index = i + 1;
            if self.checker.is_applicable(entry.attributes(), context) {
                return Some(self.resolve(entry));
            }
        }

        self.state = IteratorState::Exhausted;
        None
    }

    /// Borrow the iterator as a [`std::iter::Iterator`] bound to `context`.
    pub fn with_context<'i>(&'i mut self, context: &'i ExecutionContext) -> WithContext<'i, 'a> {
        WithContext {
            iter: self,
            context,
        }
    }

    fn resolve(&self, entry: &'a ProcessorEntry) -> Result<ResolvedProcessor<'a>, DispatchError> {
        let processor =
            self.resolver
                .resolve(entry.id())
                .ok_or_else(|| DispatchError::UnknownProcessor {
                    processor: entry.id().to_string(),
                    action: self.action.clone(),
                })?;
        Ok(ResolvedProcessor { entry, processor })
    }
}

/// First/last group ranks in effect for one advance.
struct Bounds {
    first: Option<usize>,
    last: Option<usize>,
}

impl Bounds {
    fn read(processors: &ActionProcessors, context: &ExecutionContext) -> Self {
        let groups = processors.groups();
        Self {
            first: context.first_group().and_then(|g| groups.rank(g)),
            last: context.last_group().and_then(|g| groups.rank(g)),
        }
    }

    /// Groups not declared for the action have no rank and are only
    /// subject to skipping.
    fn excludes(&self, group: &str, rank: Option<usize>, context: &ExecutionContext) -> bool {
        if context.is_skipped_group(group) {
            return true;
        }
        match rank {
            Some(rank) => {
                self.first.is_some_and(|first| rank < first)
                    || self.last.is_some_and(|last| rank > last)
            }
            None => false,
        }
    }
}

/// [`Iterator`] adapter returned by [`ProcessorIterator::with_context`].
pub struct WithContext<'i, 'a> {
    iter: &'i mut ProcessorIterator<'a>,
    context: &'i ExecutionContext,
}

impl<'a> Iterator for WithContext<'_, 'a> {
    type Item = Result<ResolvedProcessor<'a>, DispatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next_applicable(self.context)
    }
}

impl FusedIterator for WithContext<'_, '_> {}
