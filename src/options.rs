//! Option list rendering and client-side matching
//!
//! Options are derived from records and never mutated; a new record set or a
//! new selection produces a new list.

use crate::records::{PickRecord, RecordId};
use rayon::prelude::*;
use std::sync::Arc;

/// Record sets at least this large are matched in parallel
const PARALLEL_FILTER_THRESHOLD: usize = 4096;

/// Display-ready form of a record
#[derive(Debug, Clone, PartialEq)]
pub struct OptionDescriptor<R> {
    pub id: RecordId,
    pub label: String,
    pub subtitle: String,
    pub source: R,
}

/// An option annotated for display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionView<'a, R> {
    pub option: &'a OptionDescriptor<R>,
    pub is_selected: bool,
}

/// Maps a record to its option; swap in a custom one to change presentation
pub type OptionMapper<R> = Arc<dyn Fn(&R) -> OptionDescriptor<R> + Send + Sync>;

/// Default mapping through [`PickRecord`]
pub fn describe<R: PickRecord>(record: &R) -> OptionDescriptor<R> {
    OptionDescriptor {
        id: record.id(),
        label: record.label(),
        subtitle: record.subtitle(),
        source: record.clone(),
    }
}

pub fn default_mapper<R: PickRecord>() -> OptionMapper<R> {
    Arc::new(describe::<R>)
}

pub fn to_options<R>(records: &[R], mapper: &OptionMapper<R>) -> Vec<OptionDescriptor<R>> {
    records.iter().map(|r| mapper(r)).collect()
}

/// Flag the option whose id equals the committed selection
pub fn mark_selected<'a, R>(
    options: &'a [OptionDescriptor<R>],
    selected: Option<&RecordId>,
) -> Vec<OptionView<'a, R>> {
    options
        .iter()
        .map(|option| OptionView {
            option,
            is_selected: selected == Some(&option.id),
        })
        .collect()
}

fn matches_query<R: PickRecord>(record: &R, needle: &str) -> bool {
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Indices of records whose search fields contain `query`, ignoring case.
///
/// An empty (or blank) query matches everything. Input order is preserved.
pub fn filter_indices<R: PickRecord>(records: &[R], query: &str) -> Vec<usize> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return (0..records.len()).collect();
    }

    if records.len() >= PARALLEL_FILTER_THRESHOLD {
        records
            .par_iter()
            .enumerate()
            .filter(|(_, r)| matches_query(*r, &needle))
            .map(|(i, _)| i)
            .collect()
    } else {
        records
            .iter()
            .enumerate()
            .filter(|(_, r)| matches_query(*r, &needle))
            .map(|(i, _)| i)
            .collect()
    }
}

pub fn filter_records<'a, R: PickRecord>(records: &'a [R], query: &str) -> Vec<&'a R> {
    filter_indices(records, query)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}
