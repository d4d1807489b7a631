use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use serverless_router_lambda::config::RuntimeConfig;
use serverless_router_lambda::invocation::{Application, InvocationError};
use serverless_router_lambda::telemetry::{init_tracing, LogFormat};
use tracing::info;

async fn handle_request(event: LambdaEvent<Value>, app: &Application) -> Result<Value, Error> {
    info!(request_id = %event.context.request_id, "handling invocation");
    app.handle(event.payload)
        .await
        .map_err(InvocationError::into_lambda_error)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing(LogFormat::Json);

    let config = RuntimeConfig::from_env()?;
    let app = Application::from_config(&config).await;
    let app = &app;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, app).await
    }))
    .await
}
