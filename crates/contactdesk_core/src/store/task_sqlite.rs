//! Durable task store backed by SQLite.

use super::{ensure_schema_ready, is_unique_violation, Store, StoreError, StoreResult};
use crate::model::task::Task;
use crate::model::Aggregate;
use rusqlite::{params, Connection, Row};
use std::sync::{Mutex, MutexGuard};

const TASK_SELECT_SQL: &str = "SELECT task_id, name, description FROM tasks";

/// SQLite-backed [`Store`] for tasks.
pub struct SqliteTaskStore {
    conn: Mutex<Connection>,
}

impl SqliteTaskStore {
    /// Wraps a migrated connection; refuses connections whose schema is not
    /// current or whose `tasks` table is missing.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        ensure_schema_ready(&conn, "tasks")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Store<Task> for SqliteTaskStore {
    fn exists_by_id(&self, id: &str) -> StoreResult<bool> {
        let conn = self.conn();
        let present: bool = conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM tasks WHERE task_id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(present)
    }

    fn insert(&self, aggregate: &Task) -> StoreResult<bool> {
        let copy = aggregate.copy()?;
        let conn = self.conn();
        let inserted = conn.execute(
            "INSERT INTO tasks (task_id, name, description) VALUES (?1, ?2, ?3);",
            params![copy.task_id(), copy.name(), copy.description()],
        );
        match inserted {
            Ok(_) => Ok(true),
            Err(err) if is_unique_violation(&err) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, aggregate: &Task) -> StoreResult<()> {
        let copy = aggregate.copy()?;
        let conn = self.conn();
        let changed = conn.execute(
            "UPDATE tasks SET name = ?1, description = ?2 WHERE task_id = ?3;",
            params![copy.name(), copy.description(), copy.task_id()],
        )?;

        if changed == 0 {
            let inserted = conn.execute(
                "INSERT INTO tasks (task_id, name, description) VALUES (?1, ?2, ?3);",
                params![copy.task_id(), copy.name(), copy.description()],
            );
            if let Err(err) = inserted {
                if is_unique_violation(&err) {
                    return Err(StoreError::DuplicateId(copy.task_id().to_string()));
                }
                return Err(err.into());
            }
        }

        Ok(())
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Task>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("{TASK_SELECT_SQL} WHERE task_id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn find_all(&self) -> StoreResult<Vec<Task>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("{TASK_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        let conn = self.conn();
        let changed = conn.execute("DELETE FROM tasks WHERE task_id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn delete_all(&self) -> StoreResult<()> {
        let conn = self.conn();
        conn.execute("DELETE FROM tasks;", [])?;
        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> StoreResult<Task> {
    let task_id: String = row.get("task_id")?;
    let name: String = row.get("name")?;
    let description: String = row.get("description")?;

    Task::reconstitute(&task_id, &name, &description).map_err(|err| {
        StoreError::InvalidData(format!("tasks row `{task_id}` failed validation: {err}"))
    })
}
