//! Firebase REST implementation of the identity and record-store contracts

use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde_json::{json, Value};

use crate::config::GatewayConfig;
use crate::error::AccountError;
use crate::profile::UserAuth;
use crate::service::{IdentityService, RecordStore, ServiceError};

/// Client for the hosted identity endpoint and the realtime database.
///
/// Holds only immutable configuration; safe to share across tasks.
pub struct FirebaseService {
    client: Client,
    api_key: String,
    identity_url: String,
    database_url: String,
    admin_secret: Option<String>,
}

impl FirebaseService {
    /// Build the service from config. The credentials file, when configured,
    /// is read exactly once here and never reloaded.
    pub fn new(config: &GatewayConfig) -> Result<Self, AccountError> {
        let admin_secret = match &config.credentials_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    AccountError::CredentialsFileError(std::io::Error::new(
                        e.kind(),
                        format!(
                            "Failed to read credentials file '{}': {}",
                            path.display(),
                            e
                        ),
                    ))
                })?;
                Some(raw.trim().to_string())
            }
            None => None,
        };

        Ok(Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            identity_url: config.identity_url.trim_end_matches('/').to_string(),
            database_url: config.database_url.trim_end_matches('/').to_string(),
            admin_secret,
        })
    }

    async fn auth_request(&self, operation: &str, body: Value) -> Result<UserAuth, ServiceError> {
        let url = format!(
            "{}/v1/accounts:{}?key={}",
            self.identity_url, operation, self.api_key
        );
        let response = self.client.post(&url).json(&body).send().await?;
        let response = check_status(response).await?;
        let raw = response.text().await?;
        let auth = serde_json::from_str(&raw)?;
        Ok(auth)
    }

    async fn record_request(
        &self,
        method: Method,
        collection: &str,
        key: &str,
        body: Option<&Value>,
    ) -> Result<Response, ServiceError> {
        let url = format!("{}/{}/{}.json", self.database_url, collection, key);
        let mut request = self.client.request(method, &url);
        if let Some(secret) = &self.admin_secret {
            request = request.query(&[("auth", secret)]);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        check_status(response).await
    }
}

#[async_trait]
impl IdentityService for FirebaseService {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserAuth, ServiceError> {
        self.auth_request(
            "signUp",
            json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserAuth, ServiceError> {
        self.auth_request(
            "signInWithPassword",
            json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }
}

#[async_trait]
impl RecordStore for FirebaseService {
    async fn get_record(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Value>, ServiceError> {
        let response = self
            .record_request(Method::GET, collection, key, None)
            .await?;
        let raw = response.text().await?;
        let value: Value = serde_json::from_str(&raw)?;
        // The database answers a JSON `null` for absent paths.
        Ok(if value.is_null() { None } else { Some(value) })
    }

    async fn set_record(
        &self,
        collection: &str,
        key: &str,
        value: Value,
    ) -> Result<(), ServiceError> {
        self.record_request(Method::PUT, collection, key, Some(&value))
            .await?;
        Ok(())
    }

    async fn update_record(
        &self,
        collection: &str,
        key: &str,
        partial: Value,
    ) -> Result<(), ServiceError> {
        // PATCH merges server-side; untouched children keep their values.
        self.record_request(Method::PATCH, collection, key, Some(&partial))
            .await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ServiceError::Api {
        status: status.as_u16(),
        code: parse_error_code(&body),
        body,
    })
}

/// Pull the machine-readable code out of a structured error body,
/// `{"error": {"message": "EMAIL_EXISTS", ...}}`. Some rejections append
/// detail after the code ("TOO_MANY_ATTEMPTS_TRY_LATER : ..."); only the
/// leading token is the code.
fn parse_error_code(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = value.get("error")?.get("message")?.as_str()?;
    message.split_whitespace().next().map(str::to_string)
}
