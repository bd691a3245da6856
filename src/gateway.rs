//! Account gateway over the external identity/data service

use std::sync::Arc;

use tracing::info;

use crate::config::GatewayConfig;
use crate::error::{readable_message, AccountError};
use crate::firebase::FirebaseService;
use crate::profile::{UserAuth, UserProfile};
use crate::service::{IdentityService, RecordStore, ServiceError};

/// Façade over the external identity service and its record store.
///
/// Construct one instance at startup and share it; every method takes
/// `&self` and performs a single blocking request/response cycle, so
/// concurrent callers need no extra locking.
pub struct AccountGateway {
    identity: Arc<dyn IdentityService>,
    records: Arc<dyn RecordStore>,
    collection: String,
}

impl AccountGateway {
    pub fn new(
        identity: Arc<dyn IdentityService>,
        records: Arc<dyn RecordStore>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            records,
            collection: collection.into(),
        }
    }

    /// Wire the gateway to the hosted Firebase backend.
    pub fn firebase(config: &GatewayConfig) -> Result<Self, AccountError> {
        let service = Arc::new(FirebaseService::new(config)?);
        Ok(Self::new(
            service.clone(),
            service,
            config.users_collection.clone(),
        ))
    }

    /// Create an account for `profile` and store its record under the
    /// service-assigned local id, which is written back into `profile`.
    ///
    /// The profile write is a second external call after account creation;
    /// if it fails, the account exists without a record and the error is
    /// surfaced to the caller. No rollback is attempted.
    pub async fn register(
        &self,
        profile: &mut UserProfile,
        password: &str,
    ) -> Result<UserAuth, AccountError> {
        profile.validate().map_err(AccountError::Validation)?;
        if password.is_empty() {
            return Err(AccountError::Validation(
                "Password cannot be empty".to_string(),
            ));
        }

        let auth = self
            .identity
            .create_account(&profile.email, password)
            .await
            .map_err(|e| translate(e, AccountError::Registration))?;

        profile.local_id = Some(auth.local_id.clone());

        let record = serde_json::to_value(&*profile).map_err(ServiceError::Decode)?;
        self.records
            .set_record(&self.collection, &auth.local_id, record)
            .await
            .map_err(|e| translate(e, AccountError::Registration))?;

        info!(local_id = %auth.local_id, email = %profile.email, "account registered");
        Ok(auth)
    }

    /// Sign in and fetch the stored profile record for the account.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AccountError> {
        if email.is_empty() || password.is_empty() {
            return Err(AccountError::Validation(
                "Email and password cannot be empty".to_string(),
            ));
        }

        let auth = self
            .identity
            .sign_in(email, password)
            .await
            .map_err(|e| translate(e, AccountError::Login))?;

        let record = self
            .records
            .get_record(&self.collection, &auth.local_id)
            .await
            .map_err(|e| translate(e, AccountError::Login))?
            .ok_or_else(|| AccountError::ProfileNotFound(auth.local_id.clone()))?;

        let profile: UserProfile =
            serde_json::from_value(record).map_err(ServiceError::Decode)?;

        info!(local_id = %auth.local_id, "user signed in");
        Ok(profile)
    }

    /// Merge the supplied profile fields into the stored record. Fields not
    /// present on `profile` keep their stored values.
    pub async fn update_user(&self, profile: &UserProfile) -> Result<(), AccountError> {
        let local_id = profile
            .local_id
            .as_deref()
            .ok_or(AccountError::MissingLocalId)?;

        let partial = serde_json::to_value(profile).map_err(ServiceError::Decode)?;
        self.records
            .update_record(&self.collection, local_id, partial)
            .await
            .map_err(|e| translate(e, AccountError::Update))?;

        info!(local_id, "profile updated");
        Ok(())
    }
}

/// Shared translation policy: protocol-level rejections are logged and
/// resolved through the readable-error table, everything else passes
/// through untranslated.
fn translate(err: ServiceError, wrap: fn(String) -> AccountError) -> AccountError {
    match err {
        ServiceError::Api {
            status,
            ref code,
            ref body,
        } => {
            info!(
                status,
                code = code.as_deref().unwrap_or("<none>"),
                body = %body,
                "external service rejected request"
            );
            wrap(readable_message(code.as_deref()).to_string())
        }
        other => AccountError::Service(other),
    }
}
