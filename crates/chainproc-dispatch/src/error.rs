//! Run-time dispatch errors.

use thiserror::Error;

use chainproc_core::ProcessorError;

/// Errors raised while iterating or executing an action's processors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// A scheduled processor id has no registered processor.
    #[error("the \"{processor}\" processor of the \"{action}\" action is not registered")]
    UnknownProcessor {
        /// The unresolved id.
        processor: String,
        /// Action being executed.
        action: String,
    },

    /// A processor returned an error; the run was aborted.
    #[error("the \"{processor}\" processor of the \"{action}\" action failed: {source}")]
    ProcessorFailed {
        /// The failing processor.
        processor: String,
        /// Action being executed.
        action: String,
        /// The processor's error.
        #[source]
        source: ProcessorError,
    },
}
