//! Error types shared across the workspace.
//!
//! [`ConfigError`] covers build-time configuration failures, which abort
//! construction of a processor bag. [`ProcessorError`] is returned by
//! processors at run time. Filtering a processor out of an iteration is
//! never an error.

use thiserror::Error;

/// Fatal configuration errors detected while building a processor bag.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A processor uses the raw `group` attribute for an action whose
    /// groups are computed from a different attribute.
    #[error(
        "the \"{processor}\" processor uses the \"group\" tag attribute that is not allowed \
         for the \"{action}\" action; use the \"{expected_attribute}\" tag attribute instead"
    )]
    GroupAttributeNotAllowed {
        /// Offending processor.
        processor: String,
        /// Action the processor is registered for.
        action: String,
        /// Attribute that should be used instead.
        expected_attribute: String,
    },

    /// A collection processor declares `identifier_only`.
    #[error(
        "the \"{processor}\" processor uses the \"identifier_only\" tag attribute that is not \
         supported in case the \"collection\" tag attribute equals to true"
    )]
    IdentifierOnlyNotSupported {
        /// Offending processor.
        processor: String,
    },

    /// The `collection` attribute is neither a boolean nor null.
    #[error(
        "the \"{processor}\" processor has the \"collection\" tag attribute with a {found} value; \
         a boolean is expected"
    )]
    InvalidCollectionAttribute {
        /// Offending processor.
        processor: String,
        /// Kind of the value that was found.
        found: String,
    },

    /// The `event` attribute has an unsupported shape.
    #[error(
        "the \"{processor}\" processor has the \"event\" tag attribute with a value that is not \
         valid for the \"{action}\" action; the value must be an event name or event names \
         delimited by \"|\""
    )]
    InvalidEventAttribute {
        /// Offending processor.
        processor: String,
        /// Action the processor is registered for.
        action: String,
    },

    /// The `event` attribute names an event the action does not declare.
    #[error(
        "the \"{processor}\" processor has the \"event\" tag attribute with a value that is not \
         valid for the \"{action}\" action; the event \"{event}\" is not supported, the \
         supported events: {}",
        .supported.join(", ")
    )]
    UnknownEvent {
        /// Offending processor.
        processor: String,
        /// Action the processor is registered for.
        action: String,
        /// The unsupported event name.
        event: String,
        /// Events declared for the action, in order.
        supported: Vec<String>,
    },

    /// A group is declared twice for the same action.
    #[error("the \"{group}\" group is declared more than once for the \"{action}\" action")]
    DuplicateGroup {
        /// Action with the duplicate declaration.
        action: String,
        /// The duplicated group.
        group: String,
    },
}

/// Errors returned by [`Processor::process`](crate::Processor::process).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProcessorError {
    /// The processor could not complete its work.
    #[error("execution failed: {reason}")]
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The context lacks state the processor depends on.
    #[error("missing context attribute \"{key}\"")]
    MissingAttribute {
        /// The attribute that was expected.
        key: String,
    },
}
