use std::sync::Mutex;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use sqlx::{Connection, PgConnection, Row};
use workflow_api_lambda::adapters::database::TaskStore;
use workflow_api_lambda::handlers::dashboard::handle_status_report_event;
use workflow_api_lambda::handlers::response::ApiGatewayResponse;
use workflow_api_lambda::runtime::contract::{AssignedTaskRow, TaskDocument};

const ASSIGNED_TASKS_QUERY: &str = "SELECT t.task, r.resource->>'name' AS resource_name \
     FROM tasks_table t \
     INNER JOIN resources_table r ON t.assignee_id = r.id \
     WHERE t.assignee_id = $1";

struct PostgresTaskStore {
    connection: Mutex<PgConnection>,
}

impl TaskStore for PostgresTaskStore {
    fn assigned_tasks(&self, resource_id: &str) -> Result<Vec<AssignedTaskRow>, String> {
        let mut connection = self
            .connection
            .lock()
            .map_err(|_| "poisoned connection lock".to_string())?;

        let rows = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                sqlx::query(ASSIGNED_TASKS_QUERY)
                    .bind(resource_id)
                    .fetch_all(&mut *connection)
                    .await
            })
        })
        .map_err(|error| format!("failed to fetch assigned tasks: {error}"))?;

        let mut tasks = Vec::with_capacity(rows.len());
        for row in rows {
            let task: Value = row
                .try_get("task")
                .map_err(|error| format!("failed to read task document: {error}"))?;
            let task: TaskDocument = serde_json::from_value(task)
                .map_err(|error| format!("failed to decode task document: {error}"))?;
            let resource_name: String = row
                .try_get("resource_name")
                .map_err(|error| format!("failed to read resource name: {error}"))?;
            tasks.push(AssignedTaskRow {
                task,
                resource_name,
            });
        }

        Ok(tasks)
    }
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| Error::from("DATABASE_URL must be configured"))?;
    let connection = PgConnection::connect(&database_url)
        .await
        .map_err(|error| Error::from(format!("failed to connect to database: {error}")))?;

    let store = PostgresTaskStore {
        connection: Mutex::new(connection),
    };
    let response = handle_status_report_event(event.payload, &store);

    // The scoped connection is released on every exit path.
    if let Ok(connection) = store.connection.into_inner() {
        let _ = connection.close().await;
    }

    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
