use std::fmt;

use async_trait::async_trait;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct DbCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for DbCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("failed to retrieve secret '{secret_id}': {message}")]
    Fetch { secret_id: String, message: String },
    #[error("secret '{secret_id}' has neither a string nor a binary value")]
    Empty { secret_id: String },
    #[error("secret '{secret_id}' is not a username/password document: {source}")]
    Malformed {
        secret_id: String,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn db_credentials(&self) -> Result<DbCredentials, CredentialsError>;
}

/// Reads database credentials from an AWS Secrets Manager secret holding
/// `{"username": ..., "password": ...}`.
pub struct SecretsManagerCredentials {
    client: aws_sdk_secretsmanager::Client,
    secret_id: String,
}

impl SecretsManagerCredentials {
    pub fn new(client: aws_sdk_secretsmanager::Client, secret_id: impl Into<String>) -> Self {
        Self {
            client,
            secret_id: secret_id.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for SecretsManagerCredentials {
    async fn db_credentials(&self) -> Result<DbCredentials, CredentialsError> {
        info!(secret_id = %self.secret_id, "retrieving db credentials from Secrets Manager");
        let output = self
            .client
            .get_secret_value()
            .secret_id(&self.secret_id)
            .send()
            .await
            .map_err(|error| CredentialsError::Fetch {
                secret_id: self.secret_id.clone(),
                message: DisplayErrorContext(error).to_string(),
            })?;
        debug!("retrieved credentials");

        // Exactly one of the two fields is populated, depending on how the
        // secret was stored.
        if let Some(secret) = output.secret_string() {
            parse_secret(&self.secret_id, secret.as_bytes())
        } else if let Some(blob) = output.secret_binary() {
            parse_secret(&self.secret_id, blob.as_ref())
        } else {
            Err(CredentialsError::Empty {
                secret_id: self.secret_id.clone(),
            })
        }
    }
}

pub fn parse_secret(secret_id: &str, secret: &[u8]) -> Result<DbCredentials, CredentialsError> {
    serde_json::from_slice(secret).map_err(|source| CredentialsError::Malformed {
        secret_id: secret_id.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_username_and_password_document() {
        let credentials = parse_secret(
            "simple-serverless/db-credentials",
            br#"{"username":"registrar","password":"s3cret","engine":"postgres"}"#,
        )
        .expect("secret should parse");

        assert_eq!(credentials.username, "registrar");
        assert_eq!(credentials.password, "s3cret");
    }

    #[test]
    fn rejects_secret_without_password() {
        let error = parse_secret("db", br#"{"username":"registrar"}"#).expect_err("no password");
        assert!(error
            .to_string()
            .starts_with("secret 'db' is not a username/password document"));
    }

    #[test]
    fn debug_output_redacts_password() {
        let credentials = DbCredentials {
            username: "registrar".to_string(),
            password: "s3cret".to_string(),
        };

        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("registrar"));
        assert!(!rendered.contains("s3cret"));
    }
}
