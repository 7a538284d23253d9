//! Validated domain aggregates.
//!
//! # Responsibility
//! - Define the Contact/Task/Appointment records and their constraints.
//! - Keep every in-memory aggregate valid; there is no observable
//!   partially-constructed or partially-updated state.
//!
//! # Invariants
//! - Aggregate ids are trimmed at construction and immutable afterwards.
//! - `update` validates every replacement value before assigning any.
//! - `copy`/`reconstitute` tolerate fields that were valid at creation time
//!   but have since gone stale (a past appointment date); everything else is
//!   re-checked.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod appointment;
pub mod contact;
pub mod task;
pub mod validation;

use validation::ValidationError;

/// A single validated domain record with an immutable identifier.
///
/// Implemented by [`contact::Contact`], [`task::Task`] and
/// [`appointment::Appointment`]; the store backends are generic over this
/// trait so one transient implementation serves all three families.
pub trait Aggregate: Clone + Send + Sync + 'static {
    /// Lowercase aggregate label used in log events and error text.
    const KIND: &'static str;

    /// The immutable store key.
    fn id(&self) -> &str;

    /// Produces an independent, revalidated instance with identical fields.
    ///
    /// Revalidation runs through the reconstitute path, so a stored date that
    /// has passed since creation does not fail. A source that fails the
    /// remaining checks indicates corrupted state and reports
    /// [`DomainError::CorruptAggregate`].
    fn copy(&self) -> Result<Self, DomainError>;
}

/// Domain-level failure taxonomy.
///
/// `Invalid` is bad external input caught at the validation boundary;
/// `CorruptAggregate` is an illegal-state signal: an already-constructed
/// aggregate failed revalidation, which indicates a bug or out-of-band
/// mutation rather than caller error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    Invalid(ValidationError),
    CorruptAggregate {
        kind: &'static str,
        id: String,
        source: ValidationError,
    },
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::CorruptAggregate { kind, id, source } => {
                write!(f, "{kind} `{id}` holds corrupted state: {source}")
            }
        }
    }
}

impl Error for DomainError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::CorruptAggregate { source, .. } => Some(source),
        }
    }
}

impl From<ValidationError> for DomainError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}
