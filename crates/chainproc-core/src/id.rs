//! Strongly-typed processor identifier.

use std::borrow::Borrow;
use std::fmt;

/// Identifies a processor within a processor bag.
///
/// The id is the only handle the scheduler keeps for a unit of work;
/// turning it into something invocable is the job of a
/// [`ProcessorResolver`](crate::ProcessorResolver).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessorId(String);

impl ProcessorId {
    /// Create an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProcessorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProcessorId {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

impl From<String> for ProcessorId {
    fn from(v: String) -> Self {
        Self(v)
    }
}

impl Borrow<str> for ProcessorId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProcessorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
