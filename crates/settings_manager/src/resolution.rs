//! Level-agnostic precedence and merge algorithms.
//!
//! Everything here is pure: candidates in, resolved/grouped entries out.
//! The single ordering contract (level descending, then key token
//! ascending) lives in [`entry_order`] and is shared by every sort and
//! merge site instead of being re-derived ad hoc.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use tracing::warn;

use crate::keys::{ConfigurationKey, SettingCategory};
use crate::path::{ConfigurationEntry, PathLevel};

#[cfg(test)]
#[path = "resolution_tests.rs"]
mod tests;

/// A UI-ready view: category → ordered list of entries.
pub type SettingsView = BTreeMap<SettingCategory, Vec<ConfigurationEntry>>;

/// The shared merge/sort ordering: more specific level first, then key
/// token ascending.
///
/// Two entries compare equal only when both level and key match; entries
/// for the *same setting* (same key, any level) are deduplicated
/// explicitly by the merge algorithms, not through this ordering.
pub fn entry_order(a: &ConfigurationEntry, b: &ConfigurationEntry) -> Ordering {
    b.path_level
        .cmp(&a.path_level)
        .then_with(|| a.key.cmp(&b.key))
}

/// Selects the most specific entry among candidates for a single key.
///
/// A single candidate is returned without comparison. Ties on level keep
/// the first candidate in input order; a physical lookup returns at most
/// one row per level, so true ties only arise from tolerated duplicate
/// rows. An empty candidate set means "no value at this level chain" and
/// yields `None`.
pub fn select_most_specific(
    candidates: Vec<ConfigurationEntry>,
) -> Option<ConfigurationEntry> {
    let mut candidates = candidates;
    if candidates.len() == 1 {
        return candidates.pop();
    }
    candidates.into_iter().reduce(|best, candidate| {
        if candidate.path_level > best.path_level {
            candidate
        } else {
            best
        }
    })
}

/// Groups entries by their key's catalog category, preserving input
/// order within each category.
///
/// Rows whose key token is not in the catalog are dropped with a
/// warning; a stray row must never abort a whole view.
pub fn group_entries(entries: impl IntoIterator<Item = ConfigurationEntry>) -> SettingsView {
    let mut view = SettingsView::new();
    for entry in entries {
        match entry.configuration_key() {
            Some(key) => view.entry(key.category()).or_default().push(entry),
            None => warn!(key = %entry.key, "skipping row with unknown configuration key"),
        }
    }
    view
}

/// Expands the catalog into placeholder entries for every requested
/// level and unions them: entries are sorted by [`entry_order`] and
/// deduplicated by key keeping the first occurrence, so a key settable
/// at several of the requested levels survives at the most specific one.
pub fn union(levels: &[PathLevel]) -> SettingsView {
    let mut placeholders: Vec<ConfigurationEntry> = levels
        .iter()
        .flat_map(|level| {
            ConfigurationKey::settable_at(*level)
                .into_iter()
                .map(|key| ConfigurationEntry::placeholder(key, *level))
        })
        .collect();
    placeholders.sort_by(entry_order);

    let mut seen: HashSet<String> = HashSet::new();
    placeholders.retain(|entry| seen.insert(entry.key.clone()));

    group_entries(placeholders)
}

/// The non-admin catalog slice for a level: placeholders for every
/// user-visible key settable there, grouped by category.
pub fn collect_keys_by_category(level: PathLevel) -> SettingsView {
    let mut placeholders: Vec<ConfigurationEntry> = ConfigurationKey::settable_at(level)
        .into_iter()
        .filter(ConfigurationKey::is_user_visible)
        .map(|key| ConfigurationEntry::placeholder(key, level))
        .collect();
    placeholders.sort_by(entry_order);
    group_entries(placeholders)
}

/// Merges a defaults view ("what can be configured") with stored rows
/// ("what is configured").
///
/// For every category in `defaults`, stored entries replace the
/// placeholder with the same key and the result is re-sorted by
/// [`entry_order`], so real values supersede placeholders while the
/// ordering contract is preserved. Categories present only in
/// `existing` are not added: the defaults view is authoritative for
/// which categories and keys can ever appear.
pub fn merge_with_existing(defaults: &SettingsView, existing: &SettingsView) -> SettingsView {
    defaults
        .iter()
        .map(|(category, default_entries)| {
            let mut entries = default_entries.clone();
            if let Some(stored) = existing.get(category) {
                let stored_keys: HashSet<&str> =
                    stored.iter().map(|entry| entry.key.as_str()).collect();
                entries.retain(|entry| !stored_keys.contains(entry.key.as_str()));
                entries.extend(stored.iter().cloned());
                entries.sort_by(entry_order);
                entries.dedup_by(|a, b| entry_order(a, b) == Ordering::Equal);
            }
            (*category, entries)
        })
        .collect()
}
