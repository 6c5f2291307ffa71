use std::sync::Mutex;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use sqlx::{Connection, PgConnection, Row};
use uuid::Uuid;
use workflow_api_lambda::adapters::database::WorkflowStore;
use workflow_api_lambda::adapters::orchestration::StateMachineDeleter;
use workflow_api_lambda::handlers::response::ApiGatewayResponse;
use workflow_api_lambda::handlers::workflow::handle_delete_workflow_event;
use workflow_api_lambda::runtime::contract::ArnLookup;

const ARN_QUERY: &str = "SELECT arn FROM workflows_table WHERE id = $1";

// Partial document patch: only the status key changes, sibling metadata
// keys are preserved.
const MARK_TERMINATED_QUERY: &str = "UPDATE workflows_table \
     SET metadata = jsonb_set(metadata, '{status}', '\"terminated\"', true) \
     WHERE id = $1";

struct PostgresWorkflowStore {
    connection: Mutex<PgConnection>,
}

impl PostgresWorkflowStore {
    fn execute_control(&self, statement: &str) -> Result<(), String> {
        let mut connection = self
            .connection
            .lock()
            .map_err(|_| "poisoned connection lock".to_string())?;

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                sqlx::query(statement).execute(&mut *connection).await
            })
        })
        .map(|_| ())
        .map_err(|error| format!("failed to execute {statement}: {error}"))
    }
}

impl WorkflowStore for PostgresWorkflowStore {
    fn begin(&self) -> Result<(), String> {
        self.execute_control("BEGIN")
    }

    fn fetch_arn(&self, workflow_id: Uuid) -> Result<ArnLookup, String> {
        let mut connection = self
            .connection
            .lock()
            .map_err(|_| "poisoned connection lock".to_string())?;

        let row = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                sqlx::query(ARN_QUERY)
                    .bind(workflow_id)
                    .fetch_optional(&mut *connection)
                    .await
            })
        })
        .map_err(|error| format!("failed to fetch workflow arn: {error}"))?;

        match row {
            Some(row) => {
                let arn: String = row
                    .try_get("arn")
                    .map_err(|error| format!("failed to read workflow arn: {error}"))?;
                Ok(ArnLookup::Found(arn))
            }
            None => Ok(ArnLookup::NotFound),
        }
    }

    fn mark_terminated(&self, workflow_id: Uuid) -> Result<u64, String> {
        let mut connection = self
            .connection
            .lock()
            .map_err(|_| "poisoned connection lock".to_string())?;

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                sqlx::query(MARK_TERMINATED_QUERY)
                    .bind(workflow_id)
                    .execute(&mut *connection)
                    .await
            })
        })
        .map(|result| result.rows_affected())
        .map_err(|error| format!("failed to update workflow status: {error}"))
    }

    fn rollback(&self) -> Result<(), String> {
        self.execute_control("ROLLBACK")
    }

    fn commit(&self) -> Result<(), String> {
        self.execute_control("COMMIT")
    }
}

struct SfnStateMachineDeleter {
    sfn_client: aws_sdk_sfn::Client,
}

impl StateMachineDeleter for SfnStateMachineDeleter {
    fn delete_state_machine(&self, arn: &str) -> Result<u16, String> {
        let client = self.sfn_client.clone();
        let state_machine_arn = arn.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                match client
                    .delete_state_machine()
                    .state_machine_arn(state_machine_arn)
                    .send()
                    .await
                {
                    Ok(_) => Ok(200),
                    Err(error) => match error.raw_response() {
                        Some(response) => Ok(response.status().as_u16()),
                        None => Err(format!("failed to delete state machine: {error}")),
                    },
                }
            })
        })
    }
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| Error::from("DATABASE_URL must be configured"))?;
    let connection = PgConnection::connect(&database_url)
        .await
        .map_err(|error| Error::from(format!("failed to connect to database: {error}")))?;

    let store = PostgresWorkflowStore {
        connection: Mutex::new(connection),
    };

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let state_machines = SfnStateMachineDeleter {
        sfn_client: aws_sdk_sfn::Client::new(&aws_config),
    };

    let response = handle_delete_workflow_event(event.payload, &store, &state_machines);

    // The scoped connection is released on every exit path; an open
    // transaction left behind by a failure is discarded with it.
    if let Ok(connection) = store.connection.into_inner() {
        let _ = connection.close().await;
    }

    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
