//! chainproc: group-aware processor pipeline scheduling.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all chainproc sub-crates. For most users, adding `chainproc` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use chainproc::prelude::*;
//!
//! // Stops the run after the security groups when the caller is anonymous.
//! struct RequireUser;
//! impl Processor for RequireUser {
//!     fn process(&self, ctx: &mut ExecutionContext) -> Result<(), ProcessorError> {
//!         if !ctx.has("user") {
//!             ctx.set_last_group("security_check");
//!         }
//!         Ok(())
//!     }
//! }
//!
//! struct Load;
//! impl Processor for Load {
//!     fn process(&self, ctx: &mut ExecutionContext) -> Result<(), ProcessorError> {
//!         ctx.set("loaded", true);
//!         Ok(())
//!     }
//! }
//!
//! let bag = ProcessorBag::builder()
//!     .add_group("get", "security_check", 10)
//!     .add_group("get", "load_data", 0)
//!     .add_processor("get", ProcessorEntry::new("require_user", ProcessorAttributes::new().with_group("security_check")))
//!     .add_processor("get", ProcessorEntry::new("load", ProcessorAttributes::new().with_group("load_data")))
//!     .build()
//!     .unwrap();
//!
//! let registry = ProcessorRegistry::new()
//!     .with("require_user", RequireUser)
//!     .with("load", Load);
//! let checker = ChainApplicableChecker::new().with_checker(NotDisabledApplicableChecker);
//! let chain = ChainProcessor::new(Arc::new(bag), checker, registry);
//!
//! let mut anonymous = ExecutionContext::new("get");
//! assert_eq!(chain.process(&mut anonymous).unwrap(), 1);
//! assert!(!anonymous.has("loaded"));
//!
//! let mut signed_in = ExecutionContext::new("get");
//! signed_in.set("user", "alice");
//! assert_eq!(chain.process(&mut signed_in).unwrap(), 2);
//! assert!(signed_in.has("loaded"));
//! ```
//!
//! Grouped processors run in group-priority order, then by their own
//! `priority` attribute; ungrouped processors keep their declared
//! position. First/last directives exclude groups by the same order.
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `chainproc-core` | ids, attributes, context, errors, core traits |
//! | [`bag`] | `chainproc-bag` | group registry, normalization, config, `ProcessorBag` |
//! | [`dispatch`] | `chainproc-dispatch` | applicability checkers, iterator, `ChainProcessor` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and traits (`chainproc-core`).
///
/// Contains [`types::ProcessorId`], the typed [`types::AttributeValue`]s,
/// the per-operation [`types::ExecutionContext`] and the collaborator
/// traits.
pub use chainproc_core as types;

/// Build-time configuration (`chainproc-bag`).
///
/// Resolve group orders with [`bag::GroupRegistry`], normalize processors
/// with [`bag::normalize_processors`] and freeze everything into a
/// [`bag::ProcessorBag`].
pub use chainproc_bag as bag;

/// Run-time dispatch (`chainproc-dispatch`).
///
/// [`dispatch::ProcessorIterator`] for pull-based iteration,
/// [`dispatch::ChainProcessor`] to execute a whole action.
pub use chainproc_dispatch as dispatch;

/// Common imports for typical chainproc usage.
///
/// ```rust
/// use chainproc::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use chainproc_core::{
        keys, ApplicableChecker, AttributeValue, ExecutionContext, Processor,
        ProcessorAttributes, ProcessorEntry, ProcessorId, ProcessorResolver,
    };

    // Errors
    pub use chainproc_bag::BagError;
    pub use chainproc_core::{ConfigError, ProcessorError};
    pub use chainproc_dispatch::DispatchError;

    // Bag
    pub use chainproc_bag::{BagConfig, GroupRegistry, ProcessorBag};

    // Dispatch
    pub use chainproc_dispatch::{
        create_iterator, ChainApplicableChecker, ChainProcessor, MatchApplicableChecker,
        NotDisabledApplicableChecker, ProcessorIterator, ProcessorRegistry,
    };
}
