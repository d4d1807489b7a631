use std::sync::Arc;

use serde_json::Value;
use serverless_router_core::{DispatchError, Dispatcher, Registry};
use thiserror::Error;
use tracing::debug;

use crate::adapters::credentials::SecretsManagerCredentials;
use crate::adapters::database::{ConnectionManager, DatabaseError};
use crate::adapters::student_store::{PgStudentRepository, StudentRepository};
use crate::config::RuntimeConfig;
use crate::handlers::students::register_student_routes;

#[derive(Debug, Error)]
pub enum InvocationError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl InvocationError {
    /// Converts into the Lambda runtime's error type, handing handler errors
    /// over as they were raised.
    pub fn into_lambda_error(self) -> lambda_runtime::Error {
        match self {
            Self::Dispatch(error) => match error.into_handler_error() {
                Ok(handler_error) => handler_error,
                Err(other) => Box::new(other),
            },
            other => Box::new(other),
        }
    }
}

/// Everything one execution context needs to serve invocations. The
/// registry is complete before the application is constructed.
pub struct Application {
    dispatcher: Dispatcher,
    repository: Arc<dyn StudentRepository>,
}

impl Application {
    pub fn new(registry: Registry, repository: Arc<dyn StudentRepository>) -> Self {
        Self {
            dispatcher: Dispatcher::new(Arc::new(registry)),
            repository,
        }
    }

    /// Registers the student routes against `repository`.
    pub fn with_student_routes(repository: Arc<dyn StudentRepository>) -> Self {
        let mut registry = Registry::new();
        register_student_routes(&mut registry, repository.clone());
        Self::new(registry, repository)
    }

    /// Wires Secrets Manager credentials and the Postgres repository from the
    /// ambient AWS configuration.
    pub async fn from_config(config: &RuntimeConfig) -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let credentials = SecretsManagerCredentials::new(
            aws_sdk_secretsmanager::Client::new(&aws_config),
            config.secret_id.clone(),
        );
        let connections = ConnectionManager::new(Arc::new(credentials), config.connection.clone());
        Self::with_student_routes(Arc::new(PgStudentRepository::new(connections)))
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub async fn handle(&self, event: Value) -> Result<Value, InvocationError> {
        debug!(event = %event, "received event");
        self.repository.ensure_ready().await?;
        Ok(self.dispatcher.dispatch(event).await?)
    }
}
