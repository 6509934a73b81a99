//! Journal store.
//!
//! # Responsibility
//! - Keep one free-text entry per calendar day.
//! - Upsert, read, delete and list entries by date.
//!
//! # Invariants
//! - Saving on an existing date replaces the entry.
//! - Deleting an absent date is a no-op and does not touch the document.
//! - Every successful mutation rewrites the full journal document.

use crate::model::journal::{date_key, parse_date_key};
use crate::model::order::{Ordered, SortOrder};
use crate::repo::{load_json, save_json, DocumentGateway, DocumentKind, PersistenceError};
use crate::store::{StoreError, StoreResult};
use chrono::NaiveDate;
use log::{error, info};
use std::collections::{btree_map, BTreeMap};
use std::iter::Copied;

/// Journal document: `"YYYY-MM-DD"` → entry text.
pub type JournalDocument = BTreeMap<String, String>;

/// Lazy listing of journal dates; clone to restart.
pub type JournalDates<'a> = Ordered<Copied<btree_map::Keys<'a, NaiveDate, String>>>;

/// Lazy listing of `(date, content)` pairs; clone to restart.
pub type JournalEntries<'a> = Ordered<btree_map::Iter<'a, NaiveDate, String>>;

/// Date-keyed journal entries.
pub struct JournalStore<G: DocumentGateway> {
    gateway: G,
    entries: BTreeMap<NaiveDate, String>,
}

impl<G: DocumentGateway> JournalStore<G> {
    /// Loads the journal document strictly.
    pub fn open(gateway: G) -> StoreResult<Self> {
        let entries = load_entries(&gateway)?;
        info!(
            "event=store_open module=store store=journal status=ok entries={}",
            entries.len()
        );
        Ok(Self { gateway, entries })
    }

    /// Loads the journal document, falling back to an empty store on failure.
    pub fn open_or_empty(gateway: G) -> (Self, Option<StoreError>) {
        match load_entries(&gateway) {
            Ok(entries) => {
                info!(
                    "event=store_open module=store store=journal status=ok entries={}",
                    entries.len()
                );
                (Self { gateway, entries }, None)
            }
            Err(err) => {
                error!(
                    "event=store_open module=store store=journal status=fallback_empty error={}",
                    err
                );
                (
                    Self {
                        gateway,
                        entries: BTreeMap::new(),
                    },
                    Some(err),
                )
            }
        }
    }

    /// Creates or replaces the entry for `date`.
    pub fn save(&mut self, date: NaiveDate, content: impl Into<String>) -> StoreResult<()> {
        let previous = self.entries.insert(date, content.into());
        if let Err(err) = self.persist() {
            match previous {
                Some(old) => {
                    self.entries.insert(date, old);
                }
                None => {
                    self.entries.remove(&date);
                }
            }
            error!(
                "event=journal_save module=store status=rolled_back date={} error={}",
                date_key(date),
                err
            );
            return Err(err.into());
        }
        info!(
            "event=journal_save module=store status=ok date={} replaced={}",
            date_key(date),
            previous.is_some()
        );
        Ok(())
    }

    pub fn get(&self, date: NaiveDate) -> Option<&str> {
        self.entries.get(&date).map(String::as_str)
    }

    /// Removes the entry for `date`.
    ///
    /// Returns `Ok(false)` without persisting when no entry exists.
    pub fn delete(&mut self, date: NaiveDate) -> StoreResult<bool> {
        let Some(previous) = self.entries.remove(&date) else {
            return Ok(false);
        };
        if let Err(err) = self.persist() {
            self.entries.insert(date, previous);
            error!(
                "event=journal_delete module=store status=rolled_back date={} error={}",
                date_key(date),
                err
            );
            return Err(err.into());
        }
        info!(
            "event=journal_delete module=store status=ok date={}",
            date_key(date)
        );
        Ok(true)
    }

    /// Removes every entry and persists the empty document.
    pub fn clear(&mut self) -> StoreResult<()> {
        let previous = std::mem::take(&mut self.entries);
        if let Err(err) = self.persist() {
            self.entries = previous;
            error!(
                "event=journal_clear module=store status=rolled_back error={}",
                err
            );
            return Err(err.into());
        }
        info!(
            "event=journal_clear module=store status=ok removed={}",
            previous.len()
        );
        Ok(())
    }

    pub fn list_dates(&self, order: SortOrder) -> JournalDates<'_> {
        Ordered::new(self.entries.keys().copied(), order)
    }

    pub fn entries(&self, order: SortOrder) -> JournalEntries<'_> {
        Ordered::new(self.entries.iter(), order)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Persisted form of the current entries.
    pub fn document(&self) -> JournalDocument {
        self.entries
            .iter()
            .map(|(date, content)| (date_key(*date), content.clone()))
            .collect()
    }

    fn persist(&self) -> Result<(), PersistenceError> {
        save_json(&self.gateway, DocumentKind::Journal, &self.document())
    }
}

fn load_entries<G: DocumentGateway>(gateway: &G) -> StoreResult<BTreeMap<NaiveDate, String>> {
    let document: JournalDocument = load_json(gateway, DocumentKind::Journal)?;
    document
        .into_iter()
        .map(|(key, content)| {
            let date = parse_date_key(&key).map_err(|err| {
                StoreError::Persistence(PersistenceError::InvalidDocument {
                    kind: DocumentKind::Journal,
                    message: err.to_string(),
                })
            })?;
            Ok((date, content))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::JournalStore;
    use crate::model::journal::parse_date_key;
    use crate::model::order::SortOrder;
    use crate::repo::{DocumentKind, MemoryDocumentGateway};

    #[test]
    fn entries_iterate_in_requested_order() {
        let gateway = MemoryDocumentGateway::new();
        let mut store = JournalStore::open(&gateway).unwrap();
        store.save(parse_date_key("2024-01-02").unwrap(), "second").unwrap();
        store.save(parse_date_key("2024-01-01").unwrap(), "first").unwrap();

        let newest: Vec<_> = store
            .entries(SortOrder::ReverseChronological)
            .map(|(_, content)| content.as_str())
            .collect();
        assert_eq!(newest, vec!["second", "first"]);
    }

    #[test]
    fn malformed_keys_fail_strict_open() {
        let gateway = MemoryDocumentGateway::new()
            .with_document(DocumentKind::Journal, r#"{"yesterday": "text"}"#);
        assert!(JournalStore::open(&gateway).is_err());
    }
}
