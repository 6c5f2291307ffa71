use serde_json::{json, Value};
use uuid::Uuid;

use crate::adapters::database::WorkflowStore;
use crate::adapters::orchestration::StateMachineDeleter;
use crate::handlers::response::{
    error_response, success_response, validation_error_response, ApiGatewayResponse,
};
use crate::runtime::contract::{validate_workflow_id, ArnLookup, TERMINATION_SUCCESS_MESSAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TerminationOutcome {
    Committed,
    RolledBack,
    NotFound,
}

pub fn handle_delete_workflow_event(
    event: Value,
    store: &dyn WorkflowStore,
    state_machines: &dyn StateMachineDeleter,
) -> ApiGatewayResponse {
    let workflow_id = match validate_workflow_id(path_parameter(&event, "id").as_deref()) {
        Ok(value) => value,
        Err(error) => return validation_error_response(error.message()),
    };

    log_workflow_info(
        "termination_started",
        json!({ "workflow_id": workflow_id.to_string() }),
    );

    match terminate_workflow(workflow_id, store, state_machines) {
        Ok(TerminationOutcome::NotFound) => {
            error_response(404, json!({ "error": "Workflow not found" }))
        }
        Ok(TerminationOutcome::Committed) => {
            log_workflow_info(
                "termination_completed",
                json!({ "workflow_id": workflow_id.to_string() }),
            );
            success_response(200, TERMINATION_SUCCESS_MESSAGE)
        }
        Ok(TerminationOutcome::RolledBack) => {
            log_workflow_info(
                "termination_rolled_back",
                json!({ "workflow_id": workflow_id.to_string() }),
            );
            success_response(200, TERMINATION_SUCCESS_MESSAGE)
        }
        Err(error) => {
            log_workflow_error(
                "termination_failed",
                json!({
                    "workflow_id": workflow_id.to_string(),
                    "error": error,
                }),
            );
            error_response(500, json!({ "error": "Internal Server Error" }))
        }
    }
}

fn terminate_workflow(
    workflow_id: Uuid,
    store: &dyn WorkflowStore,
    state_machines: &dyn StateMachineDeleter,
) -> Result<TerminationOutcome, String> {
    store.begin()?;

    let arn = match store.fetch_arn(workflow_id)? {
        ArnLookup::Found(arn) => arn,
        ArnLookup::NotFound => {
            store.rollback()?;
            return Ok(TerminationOutcome::NotFound);
        }
    };

    let rows_affected = store.mark_terminated(workflow_id)?;

    let mut rolled_back = false;
    if rows_affected > 0 {
        // The deletion request is destructive and not safe to retry; it is
        // issued at most once per invocation.
        let status_code = state_machines.delete_state_machine(&arn)?;
        if status_code != 200 {
            store.rollback()?;
            rolled_back = true;
        }
    }

    // COMMIT is issued even after a ROLLBACK. On a closed transaction it is
    // a no-op, so the rolled-back state wins.
    store.commit()?;

    Ok(if rolled_back {
        TerminationOutcome::RolledBack
    } else {
        TerminationOutcome::Committed
    })
}

fn path_parameter(event: &Value, key: &str) -> Option<String> {
    event
        .get("pathParameters")
        .and_then(|parameters| parameters.get(key))
        .and_then(Value::as_str)
        .map(|value| value.to_string())
}

fn log_workflow_info(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "workflow_terminator",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_workflow_error(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "workflow_terminator",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
