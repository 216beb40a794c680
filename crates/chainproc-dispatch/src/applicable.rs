//! Applicability checkers.
//!
//! A [`ChainApplicableChecker`] combines any number of checkers with a
//! short-circuiting logical AND. Two checkers are built in:
//! [`NotDisabledApplicableChecker`] and [`MatchApplicableChecker`].

use indexmap::IndexSet;

use chainproc_core::{keys, ApplicableChecker, AttributeValue, ExecutionContext, ProcessorAttributes};

/// Ordered AND of sub-checkers. An empty chain accepts every processor.
#[derive(Default)]
pub struct ChainApplicableChecker {
    checkers: Vec<Box<dyn ApplicableChecker + Send + Sync>>,
}

impl ChainApplicableChecker {
    /// An empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a checker. Checkers are consulted in insertion order.
    pub fn add_checker(&mut self, checker: impl ApplicableChecker + Send + Sync + 'static) {
        self.checkers.push(Box::new(checker));
    }

    /// Builder-style [`add_checker`](Self::add_checker).
    pub fn with_checker(mut self, checker: impl ApplicableChecker + Send + Sync + 'static) -> Self {
        self.add_checker(checker);
        self
    }

    /// Number of sub-checkers.
    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    /// Whether the chain has no sub-checkers.
    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }
}

impl ApplicableChecker for ChainApplicableChecker {
    fn is_applicable(&self, attributes: &ProcessorAttributes, context: &ExecutionContext) -> bool {
        self.checkers
            .iter()
            .all(|c| c.is_applicable(attributes, context))
    }
}

/// Rejects processors tagged `disabled = true`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NotDisabledApplicableChecker;

impl ApplicableChecker for NotDisabledApplicableChecker {
    fn is_applicable(&self, attributes: &ProcessorAttributes, _context: &ExecutionContext) -> bool {
        !attributes.is_disabled()
    }
}

/// Matches processor attributes against context attributes.
///
/// Every processor attribute whose key is not ignored must match the
/// context attribute of the same key:
///
/// | processor value | matches when the context value |
/// |---|---|
/// | `Null` | always (the key may be absent) |
/// | `Str(a)` / `List` | is `a` (or one of the list), or is a list containing it |
/// | `Bool` / `Int` | is equal |
/// | `Not(a)` | does not match `a` |
/// | `AnyOf` / `AllOf` | matches any / all of the names |
///
/// A missing context attribute fails every non-`Null` expectation. The
/// typed group slot is never consulted.
#[derive(Clone, Debug)]
pub struct MatchApplicableChecker {
    ignored: IndexSet<String>,
}

impl Default for MatchApplicableChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchApplicableChecker {
    /// A checker ignoring `group`, `disabled` and `priority`.
    pub fn new() -> Self {
        Self::with_ignored([keys::GROUP, keys::DISABLED, keys::PRIORITY])
    }

    /// A checker ignoring exactly `keys`.
    pub fn with_ignored<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Also ignore `key`.
    pub fn ignore(mut self, key: impl Into<String>) -> Self {
        self.ignored.insert(key.into());
        self
    }

    /// Whether `key` is ignored.
    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignored.contains(key)
    }
}

impl ApplicableChecker for MatchApplicableChecker {
    fn is_applicable(&self, attributes: &ProcessorAttributes, context: &ExecutionContext) -> bool {
        attributes
            .iter()
            .filter(|(key, _)| !self.is_ignored(key))
            .all(|(key, expected)| match (expected, context.get(key)) {
                (AttributeValue::Null, _) => true,
                (_, None) => false,
                (expected, Some(actual)) => matches(expected, actual),
            })
    }
}

fn matches(expected: &AttributeValue, actual: &AttributeValue) -> bool {
    match expected {
        AttributeValue::Null => true,
        AttributeValue::Bool(_) | AttributeValue::Int(_) => expected == actual,
        AttributeValue::Str(name) => contains(actual, name),
        AttributeValue::Not(name) => !contains(actual, name),
        AttributeValue::List(names) | AttributeValue::AnyOf(names) => {
            names.iter().any(|n| contains(actual, n))
        }
        AttributeValue::AllOf(names) => names.iter().all(|n| contains(actual, n)),
    }
}

fn contains(actual: &AttributeValue, name: &str) -> bool {
    match actual {
        AttributeValue::Str(value) => value == name,
        AttributeValue::List(values) => values.iter().any(|v| v == name),
        _ => false,
    }
}
