//! Identifier ordering
//!
//! Two ids that both parse as base-10 integers compare numerically; any
//! other pair compares byte-wise as strings. That comparator is not
//! transitive once numeric and non-numeric ids mix (`9 < 10`, `10 < 1a`,
//! `1a < 9`), so records are ordered with a stable merge sort that only
//! ever asks the comparator about adjacent runs and never panics on an
//! inconsistent answer.

use crate::record::Record;
use std::cmp::Ordering;

fn parse_id(id: &str) -> Option<i64> {
    id.parse().ok()
}

/// Compare two item ids
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (parse_id(a), parse_id(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

/// Order records by id, keeping input order for equal ids
pub fn sort_by_id(records: Vec<Record>) -> Vec<Record> {
    merge_sort_by(records, &|a: &Record, b: &Record| compare_ids(&a.id, &b.id))
}

fn merge_sort_by<T, F>(mut items: Vec<T>, compare: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort_by(items, compare);
    let right = merge_sort_by(right, compare);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        // Only a strictly smaller right element may overtake the left run.
        if compare(r, l) == Ordering::Less {
            merged.extend(right.next());
        } else {
            merged.extend(left.next());
        }
    }
    merged.extend(left);
    merged.extend(right);
    merged
}
