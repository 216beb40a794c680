//! Build-time side of the chainproc scheduler.
//!
//! Everything in this crate runs once, while the application assembles
//! its configuration: groups are resolved into a priority order
//! ([`GroupRegistry`]), raw processor registrations are normalized
//! ([`normalize_processors`]), and the result is frozen into an immutable
//! [`ProcessorBag`] with a precomputed group layout per action.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bag;
pub mod config;
pub mod groups;
pub mod layout;
pub mod normalize;

pub use bag::{BagError, ProcessorBag, ProcessorBagBuilder};
pub use config::{ActionConfig, BagConfig, GroupConfig, ProcessorTag};
pub use groups::{ActionGroups, GroupRegistry};
pub use layout::{order_by_group_priority, ActionProcessors};
pub use normalize::{normalize_processors, ActionKind, EventSelector};
