//! Contact aggregate.
//!
//! # Invariants
//! - `contact_id`: length 1-10 after trim, immutable after construction.
//! - `first_name`/`last_name`: length 1-10 after trim.
//! - `phone`: exactly 10 numeric digits, stored as given.
//! - `address`: length 1-30 after trim.

use super::validation::{bounded_length, numeric_exact, ValidationError};
use super::{Aggregate, DomainError};
use serde::{Deserialize, Serialize};

const MIN_LENGTH: usize = 1;
const ID_MAX_LENGTH: usize = 10;
const NAME_MAX_LENGTH: usize = 10;
const ADDRESS_MAX_LENGTH: usize = 30;
const PHONE_DIGITS: usize = 10;

/// Validated contact record.
///
/// Fields stay private so the only mutation paths are the validating setters
/// and [`Contact::update`]; the id has no setter at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContactRecord")]
pub struct Contact {
    contact_id: String,
    first_name: String,
    last_name: String,
    phone: String,
    address: String,
}

impl Contact {
    /// Creates a contact after validating every field.
    ///
    /// The id is checked first and trimmed; the remaining fields go through
    /// the same checked helpers the setters use. The first violation wins and
    /// nothing is constructed on failure.
    pub fn new(
        contact_id: &str,
        first_name: &str,
        last_name: &str,
        phone: &str,
        address: &str,
    ) -> Result<Self, ValidationError> {
        let contact_id =
            bounded_length(contact_id, "contact_id", MIN_LENGTH, ID_MAX_LENGTH)?.to_string();
        Ok(Self {
            contact_id,
            first_name: checked_name(first_name, "first_name")?,
            last_name: checked_name(last_name, "last_name")?,
            phone: checked_phone(phone)?,
            address: checked_address(address)?,
        })
    }

    /// Rebuilds a contact from previously validated state.
    ///
    /// Contacts carry no time-dependent rules, so this applies the full
    /// constructor checks; it exists so the copy and persistence paths read
    /// the same across all aggregate families.
    pub(crate) fn reconstitute(
        contact_id: &str,
        first_name: &str,
        last_name: &str,
        phone: &str,
        address: &str,
    ) -> Result<Self, ValidationError> {
        Self::new(contact_id, first_name, last_name, phone, address)
    }

    pub fn contact_id(&self) -> &str {
        &self.contact_id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn set_first_name(&mut self, first_name: &str) -> Result<(), ValidationError> {
        self.first_name = checked_name(first_name, "first_name")?;
        Ok(())
    }

    pub fn set_last_name(&mut self, last_name: &str) -> Result<(), ValidationError> {
        self.last_name = checked_name(last_name, "last_name")?;
        Ok(())
    }

    pub fn set_phone(&mut self, phone: &str) -> Result<(), ValidationError> {
        self.phone = checked_phone(phone)?;
        Ok(())
    }

    pub fn set_address(&mut self, address: &str) -> Result<(), ValidationError> {
        self.address = checked_address(address)?;
        Ok(())
    }

    /// Replaces all mutable fields, all-or-nothing.
    ///
    /// Every replacement value is validated before any field is assigned; on
    /// failure the contact is unchanged.
    pub fn update(
        &mut self,
        first_name: &str,
        last_name: &str,
        phone: &str,
        address: &str,
    ) -> Result<(), ValidationError> {
        let first_name = checked_name(first_name, "first_name")?;
        let last_name = checked_name(last_name, "last_name")?;
        let phone = checked_phone(phone)?;
        let address = checked_address(address)?;

        self.first_name = first_name;
        self.last_name = last_name;
        self.phone = phone;
        self.address = address;
        Ok(())
    }
}

impl Aggregate for Contact {
    const KIND: &'static str = "contact";

    fn id(&self) -> &str {
        &self.contact_id
    }

    fn copy(&self) -> Result<Self, DomainError> {
        Self::reconstitute(
            &self.contact_id,
            &self.first_name,
            &self.last_name,
            &self.phone,
            &self.address,
        )
        .map_err(|source| DomainError::CorruptAggregate {
            kind: Self::KIND,
            id: self.contact_id.clone(),
            source,
        })
    }
}

fn checked_name(value: &str, field: &'static str) -> Result<String, ValidationError> {
    Ok(bounded_length(value, field, MIN_LENGTH, NAME_MAX_LENGTH)?.to_string())
}

fn checked_phone(value: &str) -> Result<String, ValidationError> {
    numeric_exact(value, "phone", PHONE_DIGITS)?;
    Ok(value.to_string())
}

fn checked_address(value: &str) -> Result<String, ValidationError> {
    Ok(bounded_length(value, "address", MIN_LENGTH, ADDRESS_MAX_LENGTH)?.to_string())
}

/// Raw wire shape; promoted to [`Contact`] through reconstitution so
/// deserialized data is re-checked.
#[derive(Deserialize)]
struct ContactRecord {
    contact_id: String,
    first_name: String,
    last_name: String,
    phone: String,
    address: String,
}

impl TryFrom<ContactRecord> for Contact {
    type Error = ValidationError;

    fn try_from(record: ContactRecord) -> Result<Self, Self::Error> {
        Self::reconstitute(
            &record.contact_id,
            &record.first_name,
            &record.last_name,
            &record.phone,
            &record.address,
        )
    }
}
