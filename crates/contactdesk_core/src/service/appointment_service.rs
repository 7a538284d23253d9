//! Appointment service and global accessor.

use crate::model::appointment::Appointment;
use crate::model::validation::not_blank;
use crate::service::registry::{BridgedService, ServiceRegistry};
use crate::service::ServiceError;
use crate::store::memory::MemoryStore;
use crate::store::{Store, StoreError};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

static APPOINTMENT_BRIDGE: ServiceRegistry<AppointmentService> = ServiceRegistry::new();

/// Service managing [`Appointment`] instances through whichever store is
/// currently registered.
pub struct AppointmentService {
    store: Arc<dyn Store<Appointment>>,
    transient_backed: bool,
}

impl AppointmentService {
    /// Creates an unpublished service over the given store.
    pub fn new(store: Arc<dyn Store<Appointment>>) -> Self {
        Self {
            store,
            transient_backed: false,
        }
    }

    /// Returns the process-wide instance, lazily creating a transient-backed
    /// one when nothing is registered yet.
    pub fn get_instance() -> Arc<AppointmentService> {
        APPOINTMENT_BRIDGE.get_instance()
    }

    /// Constructs a managed service over `store`, migrates any active legacy
    /// instance's data into it, and publishes it process-wide.
    pub fn register_managed(
        store: Arc<dyn Store<Appointment>>,
    ) -> Result<Arc<AppointmentService>, ServiceError> {
        APPOINTMENT_BRIDGE.register_managed(Self::new(store))
    }

    pub fn is_transient_backed(&self) -> bool {
        self.transient_backed
    }

    /// Adds a new appointment; duplicate ids (pre-checked or raced) return
    /// `false`.
    pub fn add_appointment(&self, appointment: &Appointment) -> Result<bool, ServiceError> {
        if self.store.exists_by_id(appointment.appointment_id())? {
            return Ok(false);
        }
        match self.store.insert(appointment) {
            Ok(inserted) => Ok(inserted),
            Err(StoreError::DuplicateId(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes an appointment by validated, trimmed id.
    pub fn delete_appointment(&self, appointment_id: &str) -> Result<bool, ServiceError> {
        let id = not_blank(appointment_id, "appointment_id")?;
        Ok(self.store.delete_by_id(id)?)
    }

    /// Replaces date and description of an existing appointment; `false`
    /// when the id is unknown. The new date must not lie in the past.
    pub fn update_appointment(
        &self,
        appointment_id: &str,
        appointment_date: DateTime<Utc>,
        description: &str,
    ) -> Result<bool, ServiceError> {
        let id = not_blank(appointment_id, "appointment_id")?;
        let Some(mut existing) = self.store.find_by_id(id)? else {
            return Ok(false);
        };
        existing.update(appointment_date, description)?;
        self.store.save(&existing)?;
        Ok(true)
    }

    /// Returns copies of all appointments; order is not guaranteed.
    pub fn get_all_appointments(&self) -> Result<Vec<Appointment>, ServiceError> {
        Ok(self.store.find_all()?)
    }

    /// Finds an appointment by validated, trimmed id.
    pub fn get_appointment_by_id(
        &self,
        appointment_id: &str,
    ) -> Result<Option<Appointment>, ServiceError> {
        let id = not_blank(appointment_id, "appointment_id")?;
        Ok(self.store.find_by_id(id)?)
    }

    /// Keyed snapshot of the store; every value is caller-owned.
    pub fn database(&self) -> Result<HashMap<String, Appointment>, ServiceError> {
        let mut by_id = HashMap::new();
        for appointment in self.store.find_all()? {
            by_id.insert(appointment.appointment_id().to_string(), appointment);
        }
        Ok(by_id)
    }

    /// Clears the current store's contents. Test isolation only.
    #[doc(hidden)]
    pub fn clear_all(&self) -> Result<(), ServiceError> {
        Ok(self.store.delete_all()?)
    }
}

impl BridgedService for AppointmentService {
    type Aggregate = Appointment;

    fn with_transient_store() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            transient_backed: true,
        }
    }

    fn snapshot(&self) -> Result<Vec<Appointment>, ServiceError> {
        self.get_all_appointments()
    }

    fn admit(&self, aggregate: &Appointment) -> Result<bool, ServiceError> {
        self.add_appointment(aggregate)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppointmentService, APPOINTMENT_BRIDGE};
    use crate::model::appointment::Appointment;
    use crate::store::memory::MemoryStore;
    use chrono::{Duration, Utc};
    use std::sync::{Arc, Mutex, MutexGuard};

    static BRIDGE_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn bridge_guard() -> MutexGuard<'static, ()> {
        let guard = BRIDGE_TEST_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        APPOINTMENT_BRIDGE.reset();
        guard
    }

    #[test]
    fn legacy_data_survives_managed_registration() {
        let _guard = bridge_guard();

        let legacy = AppointmentService::get_instance();
        let appointment = Appointment::new(
            "A-1",
            Utc::now() + Duration::hours(2),
            "booked before the runtime",
        )
        .unwrap();
        legacy.add_appointment(&appointment).unwrap();

        let managed = AppointmentService::register_managed(Arc::new(MemoryStore::new())).unwrap();

        let migrated = managed.get_appointment_by_id("A-1").unwrap().unwrap();
        assert_eq!(migrated.appointment_date(), appointment.appointment_date());
        assert!(Arc::ptr_eq(&AppointmentService::get_instance(), &managed));
    }
}
