//! Transient in-process store backend.
//!
//! # Responsibility
//! - Serve aggregates before the durable backend is wired up, and in tests.
//! - Keep per-key operations linearizable via the concurrent map's sharded
//!   entry API.
//!
//! # Invariants
//! - The map holds the canonical instances; callers only ever see copies.

use super::{Store, StoreResult};
use crate::model::Aggregate;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Concurrent-map-backed [`Store`] for one aggregate family.
pub struct MemoryStore<A: Aggregate> {
    entries: DashMap<String, A>,
}

impl<A: Aggregate> Default for MemoryStore<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Aggregate> MemoryStore<A> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A: Aggregate> Store<A> for MemoryStore<A> {
    fn exists_by_id(&self, id: &str) -> StoreResult<bool> {
        Ok(self.entries.contains_key(id))
    }

    fn insert(&self, aggregate: &A) -> StoreResult<bool> {
        let copy = aggregate.copy()?;
        match self.entries.entry(copy.id().to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(copy);
                Ok(true)
            }
        }
    }

    fn save(&self, aggregate: &A) -> StoreResult<()> {
        let copy = aggregate.copy()?;
        self.entries.insert(copy.id().to_string(), copy);
        Ok(())
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<A>> {
        match self.entries.get(id) {
            Some(entry) => Ok(Some(entry.value().copy()?)),
            None => Ok(None),
        }
    }

    fn find_all(&self) -> StoreResult<Vec<A>> {
        let mut all = Vec::with_capacity(self.entries.len());
        for entry in self.entries.iter() {
            all.push(entry.value().copy()?);
        }
        Ok(all)
    }

    fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        Ok(self.entries.remove(id).is_some())
    }

    fn delete_all(&self) -> StoreResult<()> {
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::model::contact::Contact;
    use crate::store::Store;

    fn sample(id: &str) -> Contact {
        Contact::new(id, "Ada", "Lovelace", "1234567890", "12 Analytical Row").unwrap()
    }

    #[test]
    fn insert_is_first_writer_wins() {
        let store = MemoryStore::new();
        assert!(store.insert(&sample("100")).unwrap());
        assert!(!store.insert(&sample("100")).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn save_upserts_and_find_returns_copy() {
        let store = MemoryStore::new();
        store.save(&sample("100")).unwrap();

        let mut replacement = sample("100");
        replacement.set_first_name("Grace").unwrap();
        store.save(&replacement).unwrap();

        let found = store.find_by_id("100").unwrap().unwrap();
        assert_eq!(found.first_name(), "Grace");
    }

    #[test]
    fn delete_reports_whether_anything_was_removed() {
        let store = MemoryStore::new();
        store.save(&sample("100")).unwrap();

        assert!(store.delete_by_id("100").unwrap());
        assert!(!store.delete_by_id("100").unwrap());
        assert!(store.is_empty());
    }
}
