//! Gateway configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::AccountError;

/// Default identity endpoint of the hosted service.
pub const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com";

fn default_identity_url() -> String {
    DEFAULT_IDENTITY_URL.to_string()
}

fn default_collection() -> String {
    "users".to_string()
}

/// Static configuration for the account gateway, read once at startup.
///
/// Field names follow the project config file shipped by the service console
/// (`apiKey`, `databaseURL`, ...), so such a file loads directly via
/// [`GatewayConfig::from_file`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Web API key of the project.
    #[serde(rename = "apiKey")]
    pub api_key: String,

    /// Base URL of the realtime database, e.g. `https://<project>.firebaseio.com`.
    #[serde(rename = "databaseURL")]
    pub database_url: String,

    #[serde(rename = "projectId", default)]
    pub project_id: Option<String>,

    /// Identity endpoint; override to point at an emulator.
    #[serde(rename = "identityURL", default = "default_identity_url")]
    pub identity_url: String,

    /// Collection under which profile records are stored.
    #[serde(rename = "usersCollection", default = "default_collection")]
    pub users_collection: String,

    /// Credentials file granting administrative database access.
    #[serde(rename = "serviceAccount", default)]
    pub credentials_path: Option<PathBuf>,
}

impl GatewayConfig {
    pub fn new(api_key: impl Into<String>, database_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            database_url: database_url.into(),
            project_id: None,
            identity_url: default_identity_url(),
            users_collection: default_collection(),
            credentials_path: None,
        }
    }

    pub fn with_credentials(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    pub fn with_identity_url(mut self, url: impl Into<String>) -> Self {
        self.identity_url = url.into();
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.users_collection = collection.into();
        self
    }

    /// Load a JSON config file and attach the credentials file path.
    pub fn from_file(
        path: impl AsRef<Path>,
        credentials_path: Option<PathBuf>,
    ) -> Result<Self, AccountError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AccountError::ConfigFileError(std::io::Error::new(
                e.kind(),
                format!("'{}': {}", path.display(), e),
            ))
        })?;

        let mut config: GatewayConfig =
            serde_json::from_str(&raw).map_err(AccountError::ConfigParseError)?;
        if credentials_path.is_some() {
            config.credentials_path = credentials_path;
        }
        Ok(config)
    }
}
