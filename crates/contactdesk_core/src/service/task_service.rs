//! Task service and global accessor.

use crate::model::task::Task;
use crate::model::validation::not_blank;
use crate::service::registry::{BridgedService, ServiceRegistry};
use crate::service::ServiceError;
use crate::store::memory::MemoryStore;
use crate::store::{Store, StoreError};
use std::collections::HashMap;
use std::sync::Arc;

static TASK_BRIDGE: ServiceRegistry<TaskService> = ServiceRegistry::new();

/// Service managing [`Task`] instances through whichever store is currently
/// registered.
pub struct TaskService {
    store: Arc<dyn Store<Task>>,
    transient_backed: bool,
}

impl TaskService {
    /// Creates an unpublished service over the given store.
    pub fn new(store: Arc<dyn Store<Task>>) -> Self {
        Self {
            store,
            transient_backed: false,
        }
    }

    /// Returns the process-wide instance, lazily creating a transient-backed
    /// one when nothing is registered yet.
    pub fn get_instance() -> Arc<TaskService> {
        TASK_BRIDGE.get_instance()
    }

    /// Constructs a managed service over `store`, migrates any active legacy
    /// instance's data into it, and publishes it process-wide.
    pub fn register_managed(store: Arc<dyn Store<Task>>) -> Result<Arc<TaskService>, ServiceError> {
        TASK_BRIDGE.register_managed(Self::new(store))
    }

    pub fn is_transient_backed(&self) -> bool {
        self.transient_backed
    }

    /// Adds a new task; duplicate ids (pre-checked or raced) return `false`.
    pub fn add_task(&self, task: &Task) -> Result<bool, ServiceError> {
        if self.store.exists_by_id(task.task_id())? {
            return Ok(false);
        }
        match self.store.insert(task) {
            Ok(inserted) => Ok(inserted),
            Err(StoreError::DuplicateId(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes a task by validated, trimmed id.
    pub fn delete_task(&self, task_id: &str) -> Result<bool, ServiceError> {
        let id = not_blank(task_id, "task_id")?;
        Ok(self.store.delete_by_id(id)?)
    }

    /// Replaces name and description of an existing task; `false` when the
    /// id is unknown.
    pub fn update_task(
        &self,
        task_id: &str,
        name: &str,
        description: &str,
    ) -> Result<bool, ServiceError> {
        let id = not_blank(task_id, "task_id")?;
        let Some(mut existing) = self.store.find_by_id(id)? else {
            return Ok(false);
        };
        existing.update(name, description)?;
        self.store.save(&existing)?;
        Ok(true)
    }

    /// Returns copies of all tasks; order is not guaranteed.
    pub fn get_all_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        Ok(self.store.find_all()?)
    }

    /// Finds a task by validated, trimmed id.
    pub fn get_task_by_id(&self, task_id: &str) -> Result<Option<Task>, ServiceError> {
        let id = not_blank(task_id, "task_id")?;
        Ok(self.store.find_by_id(id)?)
    }

    /// Keyed snapshot of the store; every value is caller-owned.
    pub fn database(&self) -> Result<HashMap<String, Task>, ServiceError> {
        let mut by_id = HashMap::new();
        for task in self.store.find_all()? {
            by_id.insert(task.task_id().to_string(), task);
        }
        Ok(by_id)
    }

    /// Clears the current store's contents. Test isolation only.
    #[doc(hidden)]
    pub fn clear_all(&self) -> Result<(), ServiceError> {
        Ok(self.store.delete_all()?)
    }
}

impl BridgedService for TaskService {
    type Aggregate = Task;

    fn with_transient_store() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            transient_backed: true,
        }
    }

    fn snapshot(&self) -> Result<Vec<Task>, ServiceError> {
        self.get_all_tasks()
    }

    fn admit(&self, aggregate: &Task) -> Result<bool, ServiceError> {
        self.add_task(aggregate)
    }
}

#[cfg(test)]
mod tests {
    use super::{TaskService, TASK_BRIDGE};
    use crate::model::task::Task;
    use crate::store::memory::MemoryStore;
    use std::sync::{Arc, Mutex, MutexGuard};

    static BRIDGE_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn bridge_guard() -> MutexGuard<'static, ()> {
        let guard = BRIDGE_TEST_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        TASK_BRIDGE.reset();
        guard
    }

    #[test]
    fn legacy_data_survives_managed_registration() {
        let _guard = bridge_guard();

        let legacy = TaskService::get_instance();
        let task = Task::new("T-1", "migrate me", "created before the runtime").unwrap();
        legacy.add_task(&task).unwrap();

        let managed = TaskService::register_managed(Arc::new(MemoryStore::new())).unwrap();

        let migrated = managed.get_task_by_id("T-1").unwrap().unwrap();
        assert_eq!(migrated.name(), "migrate me");
        assert!(Arc::ptr_eq(&TaskService::get_instance(), &managed));
    }
}
