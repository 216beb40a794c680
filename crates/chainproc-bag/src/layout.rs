//! Precomputed group layout of an action's processors.
//!
//! [`ActionProcessors`] is built once per action when the bag is frozen.
//! Besides the normalized entries it records, for every entry, the rank of
//! its group in the action's resolved order and the end of the contiguous
//! run of entries sharing that group. Iterators use the run ends to jump
//! over excluded groups without looking at each member.
//!
//! [`order_by_group_priority`] puts an action's grouped entries into
//! execution order before the layout is computed.

use std::cmp::Reverse;

use chainproc_core::{keys, AttributeValue, ProcessorEntry};

use crate::groups::ActionGroups;

/// Stable-sort the entries that belong to a declared group by group rank,
/// then by descending `priority` attribute (missing or non-integer counts
/// as 0).
///
/// Only the slots occupied by ranked entries are permuted. Ungrouped
/// entries and entries of undeclared groups keep their positions.
pub fn order_by_group_priority(
    entries: Vec<ProcessorEntry>,
    groups: &ActionGroups,
) -> Vec<ProcessorEntry> {
    let mut slots: Vec<Option<ProcessorEntry>> = Vec::with_capacity(entries.len());
    let mut ranked = Vec::new();
    for entry in entries {
        match entry.group().and_then(|g| groups.rank(g)) {
            Some(rank) => {
                ranked.push((slots.len(), rank, Reverse(priority(&entry)), entry));
                slots.push(None);
            }
            None => slots.push(Some(entry)),
        }
    }

    let positions: Vec<usize> = ranked.iter().map(|(slot, ..)| *slot).collect();
    ranked.sort_by_key(|(_, rank, prio, _)| (*rank, *prio));
    for (slot, (_, _, _, entry)) in positions.into_iter().zip(ranked) {
        slots[slot] = Some(entry);
    }
    slots.into_iter().flatten().collect()
}

fn priority(entry: &ProcessorEntry) -> i64 {
    match entry.attributes().get(keys::PRIORITY) {
        Some(AttributeValue::Int(p)) => *p,
        _ => 0,
    }
}

/// Normalized processors of one action plus their group layout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionProcessors {
    entries: Vec<ProcessorEntry>,
    groups: ActionGroups,
    /// `ranks[i]` is the rank of entry `i`'s group; `None` if the entry is
    /// ungrouped or its group is not declared for the action.
    ranks: Vec<Option<usize>>,
    /// `span_ends[i]` is one past the last entry of the same-group run
    /// containing entry `i`. Ungrouped entries form runs of length 1.
    span_ends: Vec<usize>,
}

impl ActionProcessors {
    /// Compute the layout of `entries` against the action's `groups`.
    ///
    /// `entries` are taken in execution order; see
    /// [`order_by_group_priority`].
    pub fn new(entries: Vec<ProcessorEntry>, groups: ActionGroups) -> Self {
        let ranks = entries
            .iter()
            .map(|e| e.group().and_then(|g| groups.rank(g)))
            .collect();

        let mut span_ends = vec![0; entries.len()];
        for i in (0..entries.len()).rev() {
            let continues = match (entries[i].group(), entries.get(i + 1).and_then(|e| e.group())) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            };
            span_ends[i] = if continues { span_ends[i + 1] } else { i + 1 };
        }

        Self {
            entries,
            groups,
            ranks,
            span_ends,
        }
    }

    /// The normalized entries, in execution order.
    pub fn entries(&self) -> &[ProcessorEntry] {
        &self.entries
    }

    /// The action's resolved group order.
    pub fn groups(&self) -> &ActionGroups {
        &self.groups
    }

    /// Rank of entry `index`'s group, if the entry has a declared group.
    pub fn rank(&self, index: usize) -> Option<usize> {
        self.ranks.get(index).copied().flatten()
    }

    /// One past the last entry of the same-group run containing `index`.
    pub fn span_end(&self, index: usize) -> usize {
        self.span_ends.get(index).copied().unwrap_or(self.entries.len())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the action has no processors.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
