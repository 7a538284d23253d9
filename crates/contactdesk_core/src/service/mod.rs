//! Aggregate services and the global-accessor bridge.
//!
//! # Responsibility
//! - Expose CRUD entry points with uniqueness/atomicity guarantees.
//! - Reconcile the transient-to-durable store handoff behind one global
//!   reference per aggregate type.
//!
//! # Invariants
//! - Duplicate adds and missing ids are ordinary `false`/`None` returns,
//!   never errors; invalid input and corrupt state propagate as errors.
//! - Service APIs never bypass store copy/validation contracts.

use crate::model::validation::ValidationError;
use crate::model::DomainError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod appointment_service;
pub mod contact_service;
pub(crate) mod registry;
pub mod task_service;

/// Failure taxonomy for service operations.
#[derive(Debug)]
pub enum ServiceError {
    Domain(DomainError),
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Domain(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Domain(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        Self::Domain(value)
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Domain(DomainError::Invalid(value))
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
