//! User profile and auth result structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A user profile record as stored in the external service.
///
/// `local_id` is assigned by the service at registration and required for
/// every later read or update. All fields beyond the known ones live in the
/// open `fields` map and round-trip untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(
        rename = "localId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub local_id: Option<String>,

    pub email: String,

    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl UserProfile {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            local_id: None,
            email: email.into(),
            created_at: Some(Utc::now()),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.email.is_empty() {
            return Err("Email cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Auth result returned by the identity service on sign-up and sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAuth {
    pub local_id: String,
    pub id_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<String>,
}
