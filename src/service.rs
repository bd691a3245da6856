//! Abstract contract for the external identity/data service

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::profile::UserAuth;

/// Failures reported while talking to the external service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The service answered with a non-success status and a structured error
    /// body. `code` is the machine-readable `error.message` field, when the
    /// body carried one. Only this variant is subject to readable-error
    /// translation.
    #[error("service error {status}: {}", .code.as_deref().unwrap_or("<no code>"))]
    Api {
        status: u16,
        code: Option<String>,
        body: String,
    },

    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response carried a body we could not decode.
    #[error("malformed service response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ServiceError {
    /// The protocol-level error code, if this is a structured rejection.
    pub fn api_code(&self) -> Option<&str> {
        match self {
            ServiceError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// Account authentication operations of the external service.
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn create_account(&self, email: &str, password: &str)
        -> Result<UserAuth, ServiceError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserAuth, ServiceError>;
}

/// Keyed record storage of the external service.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the record at `collection/key`, `None` when absent.
    async fn get_record(&self, collection: &str, key: &str)
        -> Result<Option<Value>, ServiceError>;

    /// Write the full record at `collection/key`, replacing any prior value.
    async fn set_record(
        &self,
        collection: &str,
        key: &str,
        value: Value,
    ) -> Result<(), ServiceError>;

    /// Merge `partial` into the stored record; fields absent from `partial`
    /// keep their current values.
    async fn update_record(
        &self,
        collection: &str,
        key: &str,
        partial: Value,
    ) -> Result<(), ServiceError>;
}
