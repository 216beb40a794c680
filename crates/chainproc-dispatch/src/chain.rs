//! Chain execution.
//!
//! [`ChainProcessor`] executes one action: it creates an iterator for
//! `context.action()` and runs every yielded processor in turn, handing
//! each one the context mutably. Directive changes made by a processor
//! apply to the rest of the run.

use std::sync::Arc;
use tracing::trace;

use chainproc_bag::ProcessorBag;
use chainproc_core::{ApplicableChecker, ExecutionContext, ProcessorResolver};

use crate::error::DispatchError;
use crate::iterator::{create_iterator, ProcessorIterator};

/// Executes the processors of an action against a context.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use chainproc_bag::ProcessorBag;
/// use chainproc_core::{ExecutionContext, Processor, ProcessorError};
/// use chainproc_dispatch::{ChainProcessor, NotDisabledApplicableChecker, ProcessorRegistry};
///
/// struct MarkLoaded;
///
/// impl Processor for MarkLoaded {
///     fn process(&self, ctx: &mut ExecutionContext) -> Result<(), ProcessorError> {
///         ctx.set("loaded", true);
///         Ok(())
///     }
/// }
///
/// let bag = ProcessorBag::from_json(
///     r#"{ "processors": [ { "id": "load", "action": "get" } ] }"#,
/// )
/// .unwrap();
/// let registry = ProcessorRegistry::new().with("load", MarkLoaded);
/// let chain = ChainProcessor::new(Arc::new(bag), NotDisabledApplicableChecker, registry);
///
/// let mut ctx = ExecutionContext::new("get");
/// assert_eq!(chain.process(&mut ctx).unwrap(), 1);
/// assert!(ctx.has("loaded"));
/// ```
pub struct ChainProcessor<C, R> {
    bag: Arc<ProcessorBag>,
    checker: C,
    resolver: R,
}

impl<C, R> ChainProcessor<C, R>
where
    C: ApplicableChecker,
    R: ProcessorResolver,
{
    /// Create a chain processor over `bag`.
    pub fn new(bag: Arc<ProcessorBag>, checker: C, resolver: R) -> Self {
        Self {
            bag,
            checker,
            resolver,
        }
    }

    /// The shared bag.
    pub fn bag(&self) -> &Arc<ProcessorBag> {
        &self.bag
    }

    /// The applicability checker.
    pub fn checker(&self) -> &C {
        &self.checker
    }

    /// The processor resolver.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// An iterator over the processors of `context.action()`.
    pub fn iterator(&self, context: &ExecutionContext) -> ProcessorIterator<'_> {
        create_iterator(&self.bag, context, &self.checker, &self.resolver)
    }

    /// Run every applicable processor of `context.action()`.
    ///
    /// Returns the number of processors executed. The first failure
    /// aborts the run; processors executed before it keep their effects
    /// on the context.
    pub fn process(&self, context: &mut ExecutionContext) -> Result<usize, DispatchError> {
        let mut iter = self.iterator(context);
        let mut executed = 0;
        while let Some(next) = iter.next_applicable(context) {
            let resolved = next?;
            trace!(
                action = iter.action(),
                processor = %resolved.id(),
                group = resolved.group().unwrap_or_default(),
                "executing processor"
            );
            resolved
                .processor()
                .process(context)
                .map_err(|source| DispatchError::ProcessorFailed {
                    processor: resolved.id().to_string(),
                    action: iter.action().to_string(),
                    source,
                })?;
            executed += 1;
        }
        Ok(executed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicable::{ChainApplicableChecker, NotDisabledApplicableChecker};
    use chainproc_core::{keys, ProcessorAttributes, ProcessorError};
    use chainproc_test_utils::{entry, entry_with, grouped, CallLog, FailingProcessor, FnProcessor, MockResolver};

    fn bag() -> Arc<ProcessorBag> {
        Arc::new(
            ProcessorBag::builder()
                .add_group("get", "security", 10)
                .add_group("get", "load", 0)
                .add_group("get", "normalize", -10)
                .add_processor("get", entry("init"))
                .add_processor("get", grouped("check", "security"))
                .add_processor("get", grouped("load", "load"))
                .add_processor(
                    "get",
                    entry_with(
                        "legacy",
                        ProcessorAttributes::new()
                            .with_group("load")
                            .with(keys::DISABLED, true),
                    ),
                )
                .add_processor("get", grouped("normalize", "normalize"))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn runs_applicable_processors_in_order() {
        let log = CallLog::new();
        let resolver =
            MockResolver::recording(["init", "check", "load", "legacy", "normalize"], &log);
        let chain = ChainProcessor::new(bag(), NotDisabledApplicableChecker, resolver);

        let mut ctx = ExecutionContext::new("get");
        assert_eq!(chain.process(&mut ctx).unwrap(), 4);
        assert_eq!(log.calls(), vec!["init", "check", "load", "normalize"]);
    }

    #[test]
    fn processor_can_cut_the_run_short() {
        let log = CallLog::new();
        let mut resolver = MockResolver::recording(["init", "load", "normalize"], &log);
        resolver.insert(
            "check",
            FnProcessor::new("check", log.clone(), |ctx: &mut ExecutionContext| {
                ctx.set_last_group("security");
            }),
        );
        let chain = ChainProcessor::new(bag(), ChainApplicableChecker::new(), resolver);

        let mut ctx = ExecutionContext::new("get");
        assert_eq!(chain.process(&mut ctx).unwrap(), 2);
        assert_eq!(log.calls(), vec!["init", "check"]);
    }

    #[test]
    fn failure_aborts_with_processor_name() {
        let log = CallLog::new();
        let mut resolver = MockResolver::recording(["init", "check", "normalize"], &log);
        resolver.insert("load", FailingProcessor::new(0));
        let chain = ChainProcessor::new(bag(), NotDisabledApplicableChecker, resolver);

        let mut ctx = ExecutionContext::new("get");
        let err = chain.process(&mut ctx).unwrap_err();
        assert_eq!(
            err,
            DispatchError::ProcessorFailed {
                processor: "load".into(),
                action: "get".into(),
                source: ProcessorError::ExecutionFailed {
                    reason: "failed on call 0".into(),
                },
            }
        );
        assert_eq!(log.calls(), vec!["init", "check"]);
    }

    #[test]
    fn unknown_processor_aborts() {
        let log = CallLog::new();
        let resolver = MockResolver::recording(["init"], &log);
        let chain = ChainProcessor::new(bag(), NotDisabledApplicableChecker, resolver);

        let mut ctx = ExecutionContext::new("get");
        let err = chain.process(&mut ctx).unwrap_err();
        assert!(matches!(err, DispatchError::UnknownProcessor { ref processor, .. } if processor == "check"));
        assert_eq!(log.calls(), vec!["init"]);
    }

    #[test]
    fn unknown_action_runs_nothing() {
        let chain = ChainProcessor::new(bag(), ChainApplicableChecker::new(), MockResolver::new());
        let mut ctx = ExecutionContext::new("delete");
        assert_eq!(chain.process(&mut ctx).unwrap(), 0);
    }

    #[test]
    fn chain_processor_shares_the_bag() {
        let shared = bag();
        let a = ChainProcessor::new(Arc::clone(&shared), ChainApplicableChecker::new(), MockResolver::new());
        assert_eq!(Arc::strong_count(a.bag()), 2);
        assert!(a.checker().is_empty());
        assert!(a.resolver().is_empty());
    }
}
