//! Appointment aggregate.
//!
//! # Invariants
//! - `appointment_id`: length 1-10 after trim, immutable after construction.
//! - `appointment_date`: not in the past at creation/update time. The
//!   reconstitute path skips this rule so stored appointments whose date has
//!   since passed still load and copy cleanly.
//! - `description`: length 1-50 after trim.

use super::validation::{bounded_length, date_not_past, not_blank, ValidationError};
use super::{Aggregate, DomainError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MIN_LENGTH: usize = 1;
const ID_MAX_LENGTH: usize = 10;
const DESCRIPTION_MAX_LENGTH: usize = 50;

/// Validated appointment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AppointmentRecord")]
pub struct Appointment {
    appointment_id: String,
    appointment_date: DateTime<Utc>,
    description: String,
}

impl Appointment {
    /// Creates an appointment after validating every field.
    ///
    /// The date must not lie in the past at the moment of the call; use the
    /// crate-internal reconstitute path for data that was validated earlier.
    pub fn new(
        appointment_id: &str,
        appointment_date: DateTime<Utc>,
        description: &str,
    ) -> Result<Self, ValidationError> {
        date_not_past(appointment_date, "appointment_date")?;
        Self::reconstitute(appointment_id, appointment_date, description)
    }

    /// Rebuilds an appointment from previously validated state.
    ///
    /// Applies every constructor rule except past-date rejection: the stored
    /// date was in the future when first accepted, and reloading or copying
    /// after that instant has passed must not fail.
    pub(crate) fn reconstitute(
        appointment_id: &str,
        appointment_date: DateTime<Utc>,
        description: &str,
    ) -> Result<Self, ValidationError> {
        let trimmed_id = not_blank(appointment_id, "appointment_id")?;
        let appointment_id =
            bounded_length(trimmed_id, "appointment_id", MIN_LENGTH, ID_MAX_LENGTH)?.to_string();
        Ok(Self {
            appointment_id,
            appointment_date,
            description: checked_description(description)?,
        })
    }

    pub fn appointment_id(&self) -> &str {
        &self.appointment_id
    }

    pub fn appointment_date(&self) -> DateTime<Utc> {
        self.appointment_date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Sets the description alone; use [`Appointment::update`] to change the
    /// date, which is only valid together with a full revalidation.
    pub fn set_description(&mut self, description: &str) -> Result<(), ValidationError> {
        self.description = checked_description(description)?;
        Ok(())
    }

    /// Replaces both mutable fields, all-or-nothing.
    ///
    /// The new date must not lie in the past; both values are validated
    /// before either field is assigned.
    pub fn update(
        &mut self,
        appointment_date: DateTime<Utc>,
        description: &str,
    ) -> Result<(), ValidationError> {
        date_not_past(appointment_date, "appointment_date")?;
        let description = checked_description(description)?;

        self.appointment_date = appointment_date;
        self.description = description;
        Ok(())
    }
}

impl Aggregate for Appointment {
    const KIND: &'static str = "appointment";

    fn id(&self) -> &str {
        &self.appointment_id
    }

    fn copy(&self) -> Result<Self, DomainError> {
        Self::reconstitute(&self.appointment_id, self.appointment_date, &self.description).map_err(
            |source| DomainError::CorruptAggregate {
                kind: Self::KIND,
                id: self.appointment_id.clone(),
                source,
            },
        )
    }
}

fn checked_description(value: &str) -> Result<String, ValidationError> {
    Ok(bounded_length(value, "description", MIN_LENGTH, DESCRIPTION_MAX_LENGTH)?.to_string())
}

/// Raw wire shape; promoted through reconstitution so structurally invalid
/// data is rejected while dates that have passed since creation are kept.
#[derive(Deserialize)]
struct AppointmentRecord {
    appointment_id: String,
    appointment_date: DateTime<Utc>,
    description: String,
}

impl TryFrom<AppointmentRecord> for Appointment {
    type Error = ValidationError;

    fn try_from(record: AppointmentRecord) -> Result<Self, Self::Error> {
        Self::reconstitute(
            &record.appointment_id,
            record.appointment_date,
            &record.description,
        )
    }
}
