//! Lazily established Postgres pool, one per execution context.
//!
//! The pool is created on first use after a cold start and recreated if it
//! has been closed. Connections are checked before they are handed out and
//! reset when returned. A failure to connect is logged and returned to the
//! caller; the slot stays empty so the next invocation tries again.

use std::sync::Arc;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::adapters::credentials::{CredentialProvider, CredentialsError};
use crate::config::ConnectionSettings;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),
}

pub struct ConnectionManager {
    credentials: Arc<dyn CredentialProvider>,
    settings: ConnectionSettings,
    pool: Mutex<Option<PgPool>>,
}

impl ConnectionManager {
    pub fn new(credentials: Arc<dyn CredentialProvider>, settings: ConnectionSettings) -> Self {
        Self {
            credentials,
            settings,
            pool: Mutex::new(None),
        }
    }

    /// Returns the shared pool, connecting first if there is none yet or the
    /// previous one was closed.
    pub async fn pool(&self) -> Result<PgPool, DatabaseError> {
        let mut slot = self.pool.lock().await;
        if let Some(pool) = slot.as_ref().filter(|pool| !pool.is_closed()) {
            return Ok(pool.clone());
        }

        let pool = self.connect().await.inspect_err(|cause| {
            error!(error = %cause, "failed to establish database connection");
        })?;
        info!("New DB connection created");
        *slot = Some(pool.clone());
        Ok(pool)
    }

    pub async fn is_connected(&self) -> bool {
        self.pool
            .lock()
            .await
            .as_ref()
            .is_some_and(|pool| !pool.is_closed())
    }

    async fn connect(&self) -> Result<PgPool, DatabaseError> {
        let credentials = self.credentials.db_credentials().await?;
        info!(user = %credentials.username, "connecting to database");

        let options = PgConnectOptions::new()
            .username(&credentials.username)
            .password(&credentials.password)
            .ssl_mode(self.settings.ssl_mode);

        PgPoolOptions::new()
            .max_connections(self.settings.max_connections)
            .acquire_timeout(self.settings.connect_timeout)
            .test_before_acquire(true)
            .connect_with(options)
            .await
            .map_err(DatabaseError::Connect)
    }
}
