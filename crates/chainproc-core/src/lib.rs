//! Core types and traits for the chainproc processor scheduler.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the workspace:
//! processor identifiers, typed attribute values, the per-operation
//! [`ExecutionContext`], error types, and the collaborator traits.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod attribute;
pub mod context;
pub mod error;
pub mod id;
pub mod traits;

pub use attribute::{keys, AttributeValue, ProcessorAttributes, ProcessorEntry};
pub use context::ExecutionContext;
pub use error::{ConfigError, ProcessorError};
pub use id::ProcessorId;
pub use traits::{ApplicableChecker, Processor, ProcessorResolver};
