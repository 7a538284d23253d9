//! Contact service and global accessor.
//!
//! # Responsibility
//! - CRUD entry points for contacts with duplicate/not-found normalization.
//! - Bridge legacy global-accessor callers and runtime-constructed
//!   instances onto one shared store reference.

use crate::model::contact::Contact;
use crate::model::validation::not_blank;
use crate::service::registry::{BridgedService, ServiceRegistry};
use crate::service::ServiceError;
use crate::store::memory::MemoryStore;
use crate::store::{Store, StoreError};
use std::collections::HashMap;
use std::sync::Arc;

static CONTACT_BRIDGE: ServiceRegistry<ContactService> = ServiceRegistry::new();

/// Service managing [`Contact`] instances through whichever store is
/// currently registered.
pub struct ContactService {
    store: Arc<dyn Store<Contact>>,
    transient_backed: bool,
}

impl ContactService {
    /// Creates an unpublished service over the given store. Use
    /// [`ContactService::register_managed`] to also publish it as the
    /// process-wide instance.
    pub fn new(store: Arc<dyn Store<Contact>>) -> Self {
        Self {
            store,
            transient_backed: false,
        }
    }

    /// Returns the process-wide instance.
    ///
    /// When nothing is registered yet, lazily creates a transient-backed
    /// instance so legacy call sites keep working before the durable store
    /// exists. Data added in that window is migrated on registration.
    pub fn get_instance() -> Arc<ContactService> {
        CONTACT_BRIDGE.get_instance()
    }

    /// Constructs a managed service over `store` and publishes it as the
    /// process-wide instance.
    ///
    /// If a legacy transient-backed instance is active, its full contents
    /// are migrated into the new service (insert semantics) before the
    /// reference is swapped; registration attempts are mutually exclusive.
    pub fn register_managed(
        store: Arc<dyn Store<Contact>>,
    ) -> Result<Arc<ContactService>, ServiceError> {
        CONTACT_BRIDGE.register_managed(Self::new(store))
    }

    /// Whether this instance was auto-created over the transient store.
    pub fn is_transient_backed(&self) -> bool {
        self.transient_backed
    }

    /// Adds a new contact; returns `false` when the id is already taken.
    ///
    /// A uniqueness violation raised by the store during the write (a race
    /// the existence pre-check missed) is also reported as `false`, never as
    /// an error.
    pub fn add_contact(&self, contact: &Contact) -> Result<bool, ServiceError> {
        if self.store.exists_by_id(contact.contact_id())? {
            return Ok(false);
        }
        match self.store.insert(contact) {
            Ok(inserted) => Ok(inserted),
            Err(StoreError::DuplicateId(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes a contact by id; the id is validated and trimmed first, so
    /// `" 123 "` targets the entry stored under `"123"`.
    pub fn delete_contact(&self, contact_id: &str) -> Result<bool, ServiceError> {
        let id = not_blank(contact_id, "contact_id")?;
        Ok(self.store.delete_by_id(id)?)
    }

    /// Replaces all mutable fields of an existing contact.
    ///
    /// Returns `false` when no contact has the id. Field validation is
    /// all-or-nothing; on success the whole aggregate is saved back.
    pub fn update_contact(
        &self,
        contact_id: &str,
        first_name: &str,
        last_name: &str,
        phone: &str,
        address: &str,
    ) -> Result<bool, ServiceError> {
        let id = not_blank(contact_id, "contact_id")?;
        let Some(mut existing) = self.store.find_by_id(id)? else {
            return Ok(false);
        };
        existing.update(first_name, last_name, phone, address)?;
        self.store.save(&existing)?;
        Ok(true)
    }

    /// Returns copies of all contacts; order is not guaranteed.
    pub fn get_all_contacts(&self) -> Result<Vec<Contact>, ServiceError> {
        Ok(self.store.find_all()?)
    }

    /// Finds a contact by validated, trimmed id.
    pub fn get_contact_by_id(&self, contact_id: &str) -> Result<Option<Contact>, ServiceError> {
        let id = not_blank(contact_id, "contact_id")?;
        Ok(self.store.find_by_id(id)?)
    }

    /// Keyed snapshot of the store; every value is caller-owned.
    pub fn database(&self) -> Result<HashMap<String, Contact>, ServiceError> {
        let mut by_id = HashMap::new();
        for contact in self.store.find_all()? {
            by_id.insert(contact.contact_id().to_string(), contact);
        }
        Ok(by_id)
    }

    /// Clears the current store's contents without touching the global
    /// reference. Test isolation only.
    #[doc(hidden)]
    pub fn clear_all(&self) -> Result<(), ServiceError> {
        Ok(self.store.delete_all()?)
    }
}

impl BridgedService for ContactService {
    type Aggregate = Contact;

    fn with_transient_store() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            transient_backed: true,
        }
    }

    fn snapshot(&self) -> Result<Vec<Contact>, ServiceError> {
        self.get_all_contacts()
    }

    fn admit(&self, aggregate: &Contact) -> Result<bool, ServiceError> {
        self.add_contact(aggregate)
    }
}
