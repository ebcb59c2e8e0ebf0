//! Ordering invariants over observed transport traffic.
//!
//! Pure predicates comparing what callers invoked with what the transport
//! saw. Used by the test suites to check runs of concurrent writers.

use std::collections::HashMap;
use std::hash::Hash;

/// Call order:
/// The transport saw exactly the invoked sequence.
pub fn invariant_call_order<T: PartialEq>(invoked: &[T], issued: &[T]) -> bool {
    invoked == issued
}

/// Per-writer order:
/// Each writer's own messages reach the transport in the order that writer
/// invoked them. Nothing is promised about interleaving between writers.
pub fn invariant_per_writer_order<T: PartialEq>(per_writer: &[Vec<T>], issued: &[T]) -> bool {
    per_writer.iter().all(|sequence| is_subsequence(sequence, issued))
}

/// Exactly once:
/// Every invoked message was issued once, and nothing else was issued.
pub fn invariant_exactly_once<T: Eq + Hash>(invoked: &[T], issued: &[T]) -> bool {
    if invoked.len() != issued.len() {
        return false;
    }

    let mut counts: HashMap<&T, i64> = HashMap::new();
    for item in invoked {
        *counts.entry(item).or_insert(0) += 1;
    }
    for item in issued {
        *counts.entry(item).or_insert(0) -= 1;
    }
    counts.values().all(|count| *count == 0)
}

fn is_subsequence<T: PartialEq>(needle: &[T], haystack: &[T]) -> bool {
    let mut remaining = haystack.iter();
    needle
        .iter()
        .all(|wanted| remaining.any(|candidate| candidate == wanted))
}
