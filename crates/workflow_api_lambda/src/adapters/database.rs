use uuid::Uuid;

use crate::runtime::contract::{ArnLookup, AssignedTaskRow};

pub trait TaskStore {
    fn assigned_tasks(&self, resource_id: &str) -> Result<Vec<AssignedTaskRow>, String>;
}

/// Transactional collaborator for the workflow row. Implementations scope
/// one connection to one invocation; `begin`/`rollback`/`commit` operate on
/// that connection's single transaction.
pub trait WorkflowStore {
    fn begin(&self) -> Result<(), String>;
    fn fetch_arn(&self, workflow_id: Uuid) -> Result<ArnLookup, String>;
    fn mark_terminated(&self, workflow_id: Uuid) -> Result<u64, String>;
    fn rollback(&self) -> Result<(), String>;
    fn commit(&self) -> Result<(), String>;
}
