//! Task aggregate.
//!
//! # Invariants
//! - `task_id`: length 1-10 after trim, immutable after construction.
//! - `name`: length 1-20 after trim.
//! - `description`: length 1-50 after trim.

use super::validation::{bounded_length, ValidationError};
use super::{Aggregate, DomainError};
use serde::{Deserialize, Serialize};

const MIN_LENGTH: usize = 1;
const ID_MAX_LENGTH: usize = 10;
const NAME_MAX_LENGTH: usize = 20;
const DESCRIPTION_MAX_LENGTH: usize = 50;

/// Validated task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    task_id: String,
    name: String,
    description: String,
}

impl Task {
    /// Creates a task after validating every field; the id is trimmed and
    /// immutable afterwards.
    pub fn new(task_id: &str, name: &str, description: &str) -> Result<Self, ValidationError> {
        let task_id = bounded_length(task_id, "task_id", MIN_LENGTH, ID_MAX_LENGTH)?.to_string();
        Ok(Self {
            task_id,
            name: checked_name(name)?,
            description: checked_description(description)?,
        })
    }

    /// Rebuilds a task from previously validated state. Tasks carry no
    /// time-dependent rules, so the full constructor checks apply.
    pub(crate) fn reconstitute(
        task_id: &str,
        name: &str,
        description: &str,
    ) -> Result<Self, ValidationError> {
        Self::new(task_id, name, description)
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = checked_name(name)?;
        Ok(())
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), ValidationError> {
        self.description = checked_description(description)?;
        Ok(())
    }

    /// Replaces both mutable fields, all-or-nothing: both replacement values
    /// are validated before either field is assigned.
    pub fn update(&mut self, name: &str, description: &str) -> Result<(), ValidationError> {
        let name = checked_name(name)?;
        let description = checked_description(description)?;

        self.name = name;
        self.description = description;
        Ok(())
    }
}

impl Aggregate for Task {
    const KIND: &'static str = "task";

    fn id(&self) -> &str {
        &self.task_id
    }

    fn copy(&self) -> Result<Self, DomainError> {
        Self::reconstitute(&self.task_id, &self.name, &self.description).map_err(|source| {
            DomainError::CorruptAggregate {
                kind: Self::KIND,
                id: self.task_id.clone(),
                source,
            }
        })
    }
}

fn checked_name(value: &str) -> Result<String, ValidationError> {
    Ok(bounded_length(value, "name", MIN_LENGTH, NAME_MAX_LENGTH)?.to_string())
}

fn checked_description(value: &str) -> Result<String, ValidationError> {
    Ok(bounded_length(value, "description", MIN_LENGTH, DESCRIPTION_MAX_LENGTH)?.to_string())
}

#[derive(Deserialize)]
struct TaskRecord {
    task_id: String,
    name: String,
    description: String,
}

impl TryFrom<TaskRecord> for Task {
    type Error = ValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        Self::reconstitute(&record.task_id, &record.name, &record.description)
    }
}
