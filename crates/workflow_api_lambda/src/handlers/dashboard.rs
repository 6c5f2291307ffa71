use serde_json::{json, Value};
use workflow_api_core::contract::StatusReportQuery;
use workflow_api_core::report::{tally_tasks, DateWindow};

use crate::adapters::database::TaskStore;
use crate::handlers::response::{error_response, success_response, ApiGatewayResponse};

pub fn handle_status_report_event(event: Value, tasks: &dyn TaskStore) -> ApiGatewayResponse {
    let query = extract_report_query(&event);

    let rows = match tasks.assigned_tasks(&query.resource_id) {
        Ok(value) => value,
        Err(error) => {
            log_report_error(
                "report_query_failed",
                json!({
                    "resource_id": query.resource_id,
                    "error": error.clone(),
                }),
            );
            return error_response(400, json!({ "error": error }));
        }
    };

    let window = DateWindow::new(query.from_date, query.to_date);
    let counts = tally_tasks(&rows, &window);
    success_response(200, counts)
}

fn extract_report_query(event: &Value) -> StatusReportQuery {
    let parameters = event.get("queryStringParameters");
    StatusReportQuery {
        resource_id: string_parameter(parameters, "resource_id"),
        from_date: string_parameter(parameters, "from_date"),
        to_date: string_parameter(parameters, "to_date"),
    }
}

fn string_parameter(parameters: Option<&Value>, key: &str) -> String {
    parameters
        .and_then(|value| value.get(key))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn log_report_error(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "status_reporter",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use workflow_api_core::contract::{AssignedTaskRow, TaskDocument};

    use super::*;

    struct RecordingTaskStore {
        requests: Mutex<Vec<String>>,
        result: Result<Vec<AssignedTaskRow>, String>,
    }

    impl RecordingTaskStore {
        fn with_rows(rows: Vec<AssignedTaskRow>) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                result: Ok(rows),
            }
        }

        fn with_error(message: &str) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                result: Err(message.to_string()),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().expect("poisoned mutex").clone()
        }
    }

    impl TaskStore for RecordingTaskStore {
        fn assigned_tasks(&self, resource_id: &str) -> Result<Vec<AssignedTaskRow>, String> {
            self.requests
                .lock()
                .expect("poisoned mutex")
                .push(resource_id.to_string());
            self.result.clone()
        }
    }

    fn sample_row(status: &str, start_date: &str, end_date: &str) -> AssignedTaskRow {
        AssignedTaskRow {
            task: TaskDocument {
                status: status.to_string(),
                start_date: start_date.to_string(),
                end_date: end_date.to_string(),
            },
            resource_name: "Dana".to_string(),
        }
    }

    fn sample_event() -> Value {
        json!({
            "queryStringParameters": {
                "resource_id": "resource-7",
                "from_date": "2024-03-01",
                "to_date": "2024-03-31",
            }
        })
    }

    #[test]
    fn reports_counts_for_tasks_within_window() {
        let store = RecordingTaskStore::with_rows(vec![
            sample_row("Completed", "2024-03-02", "2024-03-04"),
            sample_row("Completed", "2024-03-10", "2024-03-12"),
            sample_row("Pending", "2024-03-20", "2024-03-25"),
        ]);

        let response = handle_status_report_event(sample_event(), &store);

        assert_eq!(response.status_code, 200);
        assert_eq!(store.requests(), vec!["resource-7".to_string()]);

        let body: Value = serde_json::from_str(&response.body).expect("body should be json");
        assert_eq!(body["completed_tasks"], 2);
        assert_eq!(body["inprogress_tasks"], 0);
        assert_eq!(body["pending_tasks"], 1);
    }

    #[test]
    fn excludes_tasks_outside_window_and_unknown_statuses() {
        let store = RecordingTaskStore::with_rows(vec![
            sample_row("Completed", "2024-02-27", "2024-03-04"),
            sample_row("Blocked", "2024-03-10", "2024-03-12"),
            sample_row("In Progress", "2024-03-20", "2024-03-25"),
        ]);

        let response = handle_status_report_event(sample_event(), &store);

        let body: Value = serde_json::from_str(&response.body).expect("body should be json");
        assert_eq!(body["completed_tasks"], 0);
        assert_eq!(body["inprogress_tasks"], 1);
        assert_eq!(body["pending_tasks"], 0);
    }

    #[test]
    fn surfaces_database_errors_with_the_thrown_message() {
        let store = RecordingTaskStore::with_error("connection reset by peer");

        let response = handle_status_report_event(sample_event(), &store);

        assert_eq!(response.status_code, 400);
        let body: Value = serde_json::from_str(&response.body).expect("body should be json");
        assert_eq!(body["error"], "connection reset by peer");
    }

    #[test]
    fn missing_query_parameters_yield_zero_counts() {
        let store = RecordingTaskStore::with_rows(vec![sample_row(
            "Pending",
            "2024-03-02",
            "2024-03-04",
        )]);

        let response = handle_status_report_event(json!({}), &store);

        assert_eq!(response.status_code, 200);
        assert_eq!(store.requests(), vec![String::new()]);

        let body: Value = serde_json::from_str(&response.body).expect("body should be json");
        assert_eq!(body["completed_tasks"], 0);
        assert_eq!(body["inprogress_tasks"], 0);
        assert_eq!(body["pending_tasks"], 0);
    }

    #[test]
    fn responses_carry_permissive_cors_headers() {
        let success_store = RecordingTaskStore::with_rows(Vec::new());
        let failing_store = RecordingTaskStore::with_error("boom");

        let success = handle_status_report_event(sample_event(), &success_store);
        let failure = handle_status_report_event(sample_event(), &failing_store);

        assert_eq!(success.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(failure.headers["Access-Control-Allow-Origin"], "*");
    }
}
