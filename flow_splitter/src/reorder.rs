//! Restoring a caller-defined record order after a merge.

use serde_json::Value;
use tracing::debug;

use crate::Record;

/// The record's `id`, when it has a string one.
#[must_use]
pub fn record_id(record: &Record) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

/// Place the records named by `order` first, then every other record in its
/// original relative order.
///
/// Each identifier claims the first record with a matching `id` that has not
/// been claimed yet; identifiers with no remaining match are skipped. Records
/// without an `id` are never claimed. A record is emitted exactly once, so the
/// result is always a permutation of `merged`. An empty `order` returns
/// `merged` unchanged.
#[must_use]
pub fn reorder<S: AsRef<str>>(merged: Vec<Record>, order: &[S]) -> Vec<Record> {
    if order.is_empty() {
        return merged;
    }

    let mut slots: Vec<Option<Record>> = merged.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(slots.len());
    for id in order {
        let wanted: &str = id.as_ref();
        let claimed = slots
            .iter_mut()
            .find(|slot| matches!(slot, Some(record) if record_id(record) == Some(wanted)))
            .and_then(Option::take);
        match claimed {
            Some(record) => ordered.push(record),
            None => debug!(id = wanted, "ordered id has no unclaimed record"),
        }
    }
    ordered.extend(slots.into_iter().flatten());
    ordered
}

/// Identifiers of `document`'s records in document order.
///
/// Passing the result to [`reorder`] after a split and merge restores the
/// original order of every record that carries an `id`.
#[must_use]
pub fn capture_order(document: &[Record]) -> Vec<String> {
    document
        .iter()
        .filter_map(record_id)
        .map(str::to_owned)
        .collect()
}
