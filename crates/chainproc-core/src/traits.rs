//! Collaborator traits.
//!
//! The scheduler only orders and filters processor ids. Executing work
//! and deciding applicability are delegated through these traits, which
//! callers inject explicitly.

use crate::attribute::ProcessorAttributes;
use crate::context::ExecutionContext;
use crate::error::ProcessorError;
use crate::id::ProcessorId;

/// A unit of work executed as part of an action.
///
/// Processors receive the context mutably and may change its group
/// directives; the change applies to the rest of the current run.
///
/// # Examples
///
/// ```
/// use chainproc_core::{ExecutionContext, Processor, ProcessorError};
///
/// struct SkipValidation;
///
/// impl Processor for SkipValidation {
///     fn process(&self, ctx: &mut ExecutionContext) -> Result<(), ProcessorError> {
///         ctx.skip_group("validate");
///         Ok(())
///     }
/// }
///
/// let mut ctx = ExecutionContext::new("create");
/// SkipValidation.process(&mut ctx).unwrap();
/// assert!(ctx.is_skipped_group("validate"));
/// ```
pub trait Processor: Send + Sync {
    /// Execute the processor against the context.
    fn process(&self, context: &mut ExecutionContext) -> Result<(), ProcessorError>;
}

/// Maps a processor id to the processor to invoke.
pub trait ProcessorResolver {
    /// Resolve `id`. Returns `None` if no such processor is registered.
    fn resolve(&self, id: &ProcessorId) -> Option<&dyn Processor>;
}

/// Decides whether a processor takes part in the current run.
///
/// Implementations must be pure functions of their inputs.
pub trait ApplicableChecker {
    /// Whether the processor with `attributes` should be executed.
    fn is_applicable(&self, attributes: &ProcessorAttributes, context: &ExecutionContext) -> bool;
}

impl<T: ApplicableChecker + ?Sized> ApplicableChecker for Box<T> {
    fn is_applicable(&self, attributes: &ProcessorAttributes, context: &ExecutionContext) -> bool {
        (**self).is_applicable(attributes, context)
    }
}

impl<T: ProcessorResolver + ?Sized> ProcessorResolver for Box<T> {
    fn resolve(&self, id: &ProcessorId) -> Option<&dyn Processor> {
        (**self).resolve(id)
    }
}
