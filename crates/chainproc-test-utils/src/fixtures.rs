//! Reusable processor test fixtures.
//!
//! - [`RecordingProcessor`] appends its id to a shared [`CallLog`].
//! - [`FailingProcessor`] fails deterministically after N calls.
//! - [`FnProcessor`] runs a closure against the context, typically to
//!   change group directives mid-run.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chainproc_core::{ExecutionContext, Processor, ProcessorError};

/// Shared, ordered record of processor invocations.
#[derive(Clone, Debug, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, id: &str) {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push(id.to_string());
    }

    /// Snapshot of the recorded ids, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("call log poisoned").clone()
    }

    pub fn clear(&self) {
        self.calls.lock().expect("call log poisoned").clear();
    }
}

/// Records every invocation in a [`CallLog`].
pub struct RecordingProcessor {
    pub id: String,
    log: CallLog,
}

impl RecordingProcessor {
    pub fn new(id: impl Into<String>, log: CallLog) -> Self {
        Self { id: id.into(), log }
    }
}

impl Processor for RecordingProcessor {
    fn process(&self, _context: &mut ExecutionContext) -> Result<(), ProcessorError> {
        self.log.push(&self.id);
        Ok(())
    }
}

/// Succeeds `succeed_count` times, then fails on every later call.
pub struct FailingProcessor {
    succeed_count: usize,
    call_count: AtomicUsize,
}

impl FailingProcessor {
    pub fn new(succeed_count: usize) -> Self {
        Self {
            succeed_count,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Number of calls so far.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl Processor for FailingProcessor {
    fn process(&self, _context: &mut ExecutionContext) -> Result<(), ProcessorError> {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            return Err(ProcessorError::ExecutionFailed {
                reason: format!("failed on call {n}"),
            });
        }
        Ok(())
    }
}

/// Runs a closure against the context and records the call.
pub struct FnProcessor<F> {
    id: String,
    log: CallLog,
    f: F,
}

impl<F> FnProcessor<F>
where
    F: Fn(&mut ExecutionContext) + Send + Sync,
{
    pub fn new(id: impl Into<String>, log: CallLog, f: F) -> Self {
        Self {
            id: id.into(),
            log,
            f,
        }
    }
}

impl<F> Processor for FnProcessor<F>
where
    F: Fn(&mut ExecutionContext) + Send + Sync,
{
    fn process(&self, context: &mut ExecutionContext) -> Result<(), ProcessorError> {
        self.log.push(&self.id);
        (self.f)(context);
        Ok(())
    }
}
