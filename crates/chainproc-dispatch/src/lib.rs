//! Run-time side of the chainproc scheduler.
//!
//! Given a frozen [`ProcessorBag`](chainproc_bag::ProcessorBag), this
//! crate decides which processors run for an
//! [`ExecutionContext`](chainproc_core::ExecutionContext) and in which
//! order:
//!
//! - [`applicable`]: the applicability chain and built-in checkers.
//! - [`iterator`]: the optimized, group-aware processor iterator.
//! - [`chain`]: [`ChainProcessor`], which drives an iterator and executes
//!   every yielded processor.
//! - [`registry`]: [`ProcessorRegistry`], an owned id → processor map.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod applicable;
pub mod chain;
pub mod error;
pub mod iterator;
pub mod registry;

pub use applicable::{ChainApplicableChecker, MatchApplicableChecker, NotDisabledApplicableChecker};
pub use chain::ChainProcessor;
pub use error::DispatchError;
pub use iterator::{create_iterator, IteratorState, ProcessorIterator, ResolvedProcessor};
pub use registry::ProcessorRegistry;
