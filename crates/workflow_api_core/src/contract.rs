use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TERMINATION_SUCCESS_MESSAGE: &str =
    "workflow sent for deletion and updated workflow status success";

/// Query parameters accepted by the status reporter. Values are
/// caller-supplied and deliberately unvalidated; absent parameters are
/// carried as empty strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusReportQuery {
    pub resource_id: String,
    pub from_date: String,
    pub to_date: String,
}

/// The nested task document as stored. Sibling keys in the stored document
/// are ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskDocument {
    pub status: String,
    pub start_date: String,
    pub end_date: String,
}

/// One row of the tasks/resources join. `resource_name` is part of the row
/// contract but not of the report output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignedTaskRow {
    pub task: TaskDocument,
    pub resource_name: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskStatusCounts {
    pub completed_tasks: u64,
    pub inprogress_tasks: u64,
    pub pending_tasks: u64,
}

impl TaskStatusCounts {
    pub fn total(&self) -> u64 {
        self.completed_tasks + self.inprogress_tasks + self.pending_tasks
    }
}

/// Outcome of the ARN lookup at the data-access boundary. A missing row is
/// a regular outcome, never an index fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArnLookup {
    Found(String),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn validate_workflow_id(raw: Option<&str>) -> Result<Uuid, ValidationError> {
    let Some(raw) = raw else {
        return Err(ValidationError::new("Invalid workflow id"));
    };

    Uuid::parse_str(raw).map_err(|_| ValidationError::new("Invalid workflow id"))
}
