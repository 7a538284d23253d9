//! Durable contact store backed by SQLite.
//!
//! # Invariants
//! - Write paths revalidate the aggregate (via `copy`) before SQL mutations.
//! - Read paths rebuild the aggregate through reconstitution, so rows
//!   corrupted outside the service surface fail fast.

use super::{ensure_schema_ready, is_unique_violation, Store, StoreError, StoreResult};
use crate::model::contact::Contact;
use crate::model::Aggregate;
use rusqlite::{params, Connection, Row};
use std::sync::{Mutex, MutexGuard};

const CONTACT_SELECT_SQL: &str =
    "SELECT contact_id, first_name, last_name, phone, address FROM contacts";

/// SQLite-backed [`Store`] for contacts.
pub struct SqliteContactStore {
    conn: Mutex<Connection>,
}

impl SqliteContactStore {
    /// Wraps a migrated connection; refuses connections whose schema is not
    /// current or whose `contacts` table is missing.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        ensure_schema_ready(&conn, "contacts")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Store<Contact> for SqliteContactStore {
    fn exists_by_id(&self, id: &str) -> StoreResult<bool> {
        let conn = self.conn();
        let present: bool = conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM contacts WHERE contact_id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(present)
    }

    fn insert(&self, aggregate: &Contact) -> StoreResult<bool> {
        let copy = aggregate.copy()?;
        let conn = self.conn();
        let inserted = conn.execute(
            "INSERT INTO contacts (contact_id, first_name, last_name, phone, address)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                copy.contact_id(),
                copy.first_name(),
                copy.last_name(),
                copy.phone(),
                copy.address(),
            ],
        );
        match inserted {
            Ok(_) => Ok(true),
            Err(err) if is_unique_violation(&err) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, aggregate: &Contact) -> StoreResult<()> {
        let copy = aggregate.copy()?;
        let conn = self.conn();
        let changed = conn.execute(
            "UPDATE contacts
             SET first_name = ?1, last_name = ?2, phone = ?3, address = ?4
             WHERE contact_id = ?5;",
            params![
                copy.first_name(),
                copy.last_name(),
                copy.phone(),
                copy.address(),
                copy.contact_id(),
            ],
        )?;

        if changed == 0 {
            let inserted = conn.execute(
                "INSERT INTO contacts (contact_id, first_name, last_name, phone, address)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    copy.contact_id(),
                    copy.first_name(),
                    copy.last_name(),
                    copy.phone(),
                    copy.address(),
                ],
            );
            if let Err(err) = inserted {
                if is_unique_violation(&err) {
                    return Err(StoreError::DuplicateId(copy.contact_id().to_string()));
                }
                return Err(err.into());
            }
        }

        Ok(())
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Contact>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("{CONTACT_SELECT_SQL} WHERE contact_id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }
        Ok(None)
    }

    fn find_all(&self) -> StoreResult<Vec<Contact>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("{CONTACT_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }
        Ok(contacts)
    }

    fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        let conn = self.conn();
        let changed = conn.execute("DELETE FROM contacts WHERE contact_id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn delete_all(&self) -> StoreResult<()> {
        let conn = self.conn();
        conn.execute("DELETE FROM contacts;", [])?;
        Ok(())
    }
}

fn parse_contact_row(row: &Row<'_>) -> StoreResult<Contact> {
    let contact_id: String = row.get("contact_id")?;
    let first_name: String = row.get("first_name")?;
    let last_name: String = row.get("last_name")?;
    let phone: String = row.get("phone")?;
    let address: String = row.get("address")?;

    Contact::reconstitute(&contact_id, &first_name, &last_name, &phone, &address).map_err(|err| {
        StoreError::InvalidData(format!("contacts row `{contact_id}` failed validation: {err}"))
    })
}
