//! Benchmark profiles for the chainproc scheduler.
//!
//! - [`reference_profile`]: one action with 8 groups of 8 processors plus
//!   interleaved ungrouped processors.
//! - [`form_profile`]: raw `customize_form_data` registrations for
//!   normalization benchmarks.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use indexmap::IndexMap;

use chainproc_bag::groups::{GroupPriorities, CUSTOMIZE_FORM_DATA};
use chainproc_bag::ProcessorBag;
use chainproc_core::{keys, AttributeValue, ConfigError, ProcessorAttributes, ProcessorEntry};

/// Action used by [`reference_profile`].
pub const REFERENCE_ACTION: &str = "get";

/// Group names `g0..g{n}`, highest priority first.
pub fn group_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("g{i}")).collect()
}

/// Build a bag for [`REFERENCE_ACTION`] with `groups` groups of
/// `per_group` processors each. Every group is followed by one ungrouped
/// processor and every fourth processor is disabled.
pub fn reference_profile(groups: usize, per_group: usize) -> Result<ProcessorBag, ConfigError> {
    let names = group_names(groups);
    let mut builder = ProcessorBag::builder();
    for (i, name) in names.iter().enumerate() {
        builder = builder.add_group(REFERENCE_ACTION, name.as_str(), -(i as i32));
    }
    let mut n = 0usize;
    for name in &names {
        for _ in 0..per_group {
            let mut attrs = ProcessorAttributes::new().with_group(name.as_str());
            if n % 4 == 3 {
                attrs.insert(keys::DISABLED, true);
            }
            builder = builder.add_processor(REFERENCE_ACTION, ProcessorEntry::new(format!("p{n}"), attrs));
            n += 1;
        }
        builder = builder.add_processor(
            REFERENCE_ACTION,
            ProcessorEntry::new(format!("p{n}"), ProcessorAttributes::new()),
        );
        n += 1;
    }
    builder.build()
}

/// `count` raw form-data processors cycling through single events, an
/// any-of pair, and no event at all.
pub fn form_profile(count: usize) -> IndexMap<String, Vec<ProcessorEntry>> {
    let entries = (0..count)
        .map(|i| {
            let attrs = match i % 3 {
                0 => ProcessorAttributes::new().with(keys::EVENT, "submit"),
                1 => ProcessorAttributes::new().with(
                    keys::EVENT,
                    AttributeValue::AnyOf(vec!["pre_submit".into(), "post_validate".into()]),
                ),
                _ => ProcessorAttributes::new(),
            };
            ProcessorEntry::new(format!("f{i}"), attrs)
        })
        .collect();
    let mut out = IndexMap::new();
    out.insert(CUSTOMIZE_FORM_DATA.to_string(), entries);
    out
}

/// No declared groups; the synthetic ones are enough for [`form_profile`].
pub fn no_declared_groups() -> IndexMap<String, GroupPriorities> {
    IndexMap::new()
}
