//! Durable appointment store backed by SQLite.
//!
//! # Invariants
//! - `appointment_date` persists as epoch milliseconds (UTC).
//! - Loads go through reconstitution, so appointments whose date has passed
//!   since they were stored still round-trip; structurally bad rows fail.

use super::{ensure_schema_ready, is_unique_violation, Store, StoreError, StoreResult};
use crate::model::appointment::Appointment;
use crate::model::Aggregate;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Mutex, MutexGuard};

const APPOINTMENT_SELECT_SQL: &str =
    "SELECT appointment_id, appointment_date, description FROM appointments";

/// SQLite-backed [`Store`] for appointments.
pub struct SqliteAppointmentStore {
    conn: Mutex<Connection>,
}

impl SqliteAppointmentStore {
    /// Wraps a migrated connection; refuses connections whose schema is not
    /// current or whose `appointments` table is missing.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        ensure_schema_ready(&conn, "appointments")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Store<Appointment> for SqliteAppointmentStore {
    fn exists_by_id(&self, id: &str) -> StoreResult<bool> {
        let conn = self.conn();
        let present: bool = conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM appointments WHERE appointment_id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(present)
    }

    fn insert(&self, aggregate: &Appointment) -> StoreResult<bool> {
        let copy = aggregate.copy()?;
        let conn = self.conn();
        let inserted = conn.execute(
            "INSERT INTO appointments (appointment_id, appointment_date, description)
             VALUES (?1, ?2, ?3);",
            params![
                copy.appointment_id(),
                copy.appointment_date().timestamp_millis(),
                copy.description(),
            ],
        );
        match inserted {
            Ok(_) => Ok(true),
            Err(err) if is_unique_violation(&err) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, aggregate: &Appointment) -> StoreResult<()> {
        let copy = aggregate.copy()?;
        let conn = self.conn();
        let changed = conn.execute(
            "UPDATE appointments
             SET appointment_date = ?1, description = ?2
             WHERE appointment_id = ?3;",
            params![
                copy.appointment_date().timestamp_millis(),
                copy.description(),
                copy.appointment_id(),
            ],
        )?;

        if changed == 0 {
            let inserted = conn.execute(
                "INSERT INTO appointments (appointment_id, appointment_date, description)
                 VALUES (?1, ?2, ?3);",
                params![
                    copy.appointment_id(),
                    copy.appointment_date().timestamp_millis(),
                    copy.description(),
                ],
            );
            if let Err(err) = inserted {
                if is_unique_violation(&err) {
                    return Err(StoreError::DuplicateId(copy.appointment_id().to_string()));
                }
                return Err(err.into());
            }
        }

        Ok(())
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Appointment>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{APPOINTMENT_SELECT_SQL} WHERE appointment_id = ?1;"
        ))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_appointment_row(row)?));
        }
        Ok(None)
    }

    fn find_all(&self) -> StoreResult<Vec<Appointment>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("{APPOINTMENT_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut appointments = Vec::new();
        while let Some(row) = rows.next()? {
            appointments.push(parse_appointment_row(row)?);
        }
        Ok(appointments)
    }

    fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        let conn = self.conn();
        let changed = conn.execute(
            "DELETE FROM appointments WHERE appointment_id = ?1;",
            [id],
        )?;
        Ok(changed > 0)
    }

    fn delete_all(&self) -> StoreResult<()> {
        let conn = self.conn();
        conn.execute("DELETE FROM appointments;", [])?;
        Ok(())
    }
}

fn parse_appointment_row(row: &Row<'_>) -> StoreResult<Appointment> {
    let appointment_id: String = row.get("appointment_id")?;
    let date_millis: i64 = row.get("appointment_date")?;
    let description: String = row.get("description")?;

    let appointment_date: DateTime<Utc> =
        Utc.timestamp_millis_opt(date_millis).single().ok_or_else(|| {
            StoreError::InvalidData(format!(
                "appointments row `{appointment_id}` holds invalid epoch value `{date_millis}`"
            ))
        })?;

    Appointment::reconstitute(&appointment_id, appointment_date, &description).map_err(|err| {
        StoreError::InvalidData(format!(
            "appointments row `{appointment_id}` failed validation: {err}"
        ))
    })
}
