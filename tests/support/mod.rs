//! In-memory stand-in for the external identity/data backend

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;

use account_gateway::{IdentityService, RecordStore, ServiceError, UserAuth};

struct Account {
    password: String,
    local_id: String,
    disabled: bool,
}

/// Mimics the hosted backend closely enough for gateway tests: accounts
/// keyed by email, records keyed by `collection/key`, and the same error
/// codes the real service emits.
#[derive(Default)]
pub struct MockBackend {
    accounts: Mutex<HashMap<String, Account>>,
    records: Mutex<HashMap<String, Value>>,
    fail_identity: Mutex<Option<String>>,
    fail_records: Mutex<Option<String>>,
}

impl MockBackend {
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    /// Make the next identity call fail with the given error code.
    pub fn fail_identity_with(&self, code: &str) {
        *self.fail_identity.lock().unwrap() = Some(code.to_string());
    }

    /// Make the next record-store call fail with the given error code.
    pub fn fail_records_with(&self, code: &str) {
        *self.fail_records.lock().unwrap() = Some(code.to_string());
    }

    /// Plant a raw record, bypassing the gateway.
    pub fn put_record(&self, collection: &str, key: &str, value: Value) {
        self.records
            .lock()
            .unwrap()
            .insert(record_key(collection, key), value);
    }

    pub fn disable_account(&self, email: &str) {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(account) = accounts.get_mut(email) {
            account.disabled = true;
        }
    }

    pub fn remove_record(&self, collection: &str, key: &str) {
        self.records
            .lock()
            .unwrap()
            .remove(&record_key(collection, key));
    }

    pub fn record(&self, collection: &str, key: &str) -> Option<Value> {
        self.records
            .lock()
            .unwrap()
            .get(&record_key(collection, key))
            .cloned()
    }

    fn take_injected_failure(&self) -> Option<ServiceError> {
        self.fail_identity
            .lock()
            .unwrap()
            .take()
            .map(|code| api_error(&code))
    }

    fn take_record_failure(&self) -> Option<ServiceError> {
        self.fail_records
            .lock()
            .unwrap()
            .take()
            .map(|code| api_error(&code))
    }
}

fn record_key(collection: &str, key: &str) -> String {
    format!("{}/{}", collection, key)
}

fn api_error(code: &str) -> ServiceError {
    ServiceError::Api {
        status: 400,
        code: Some(code.to_string()),
        body: json!({"error": {"code": 400, "message": code}}).to_string(),
    }
}

fn auth_for(email: &str, local_id: &str) -> UserAuth {
    UserAuth {
        local_id: local_id.to_string(),
        id_token: format!("token-{}", Uuid::new_v4().simple()),
        refresh_token: Some(format!("refresh-{}", Uuid::new_v4().simple())),
        email: Some(email.to_string()),
        expires_in: Some("3600".to_string()),
    }
}

#[async_trait]
impl IdentityService for MockBackend {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserAuth, ServiceError> {
        if let Some(err) = self.take_injected_failure() {
            return Err(err);
        }

        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(api_error("EMAIL_EXISTS"));
        }

        let local_id = Uuid::new_v4().simple().to_string();
        accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                local_id: local_id.clone(),
                disabled: false,
            },
        );
        Ok(auth_for(email, &local_id))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserAuth, ServiceError> {
        if let Some(err) = self.take_injected_failure() {
            return Err(err);
        }

        let accounts = self.accounts.lock().unwrap();
        let account = accounts.get(email).ok_or_else(|| api_error("EMAIL_NOT_FOUND"))?;
        if account.disabled {
            return Err(api_error("USER_DISABLED"));
        }
        if account.password != password {
            return Err(api_error("INVALID_PASSWORD"));
        }
        Ok(auth_for(email, &account.local_id))
    }
}

#[async_trait]
impl RecordStore for MockBackend {
    async fn get_record(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Value>, ServiceError> {
        if let Some(err) = self.take_record_failure() {
            return Err(err);
        }
        Ok(self.record(collection, key))
    }

    async fn set_record(
        &self,
        collection: &str,
        key: &str,
        value: Value,
    ) -> Result<(), ServiceError> {
        if let Some(err) = self.take_record_failure() {
            return Err(err);
        }
        self.records
            .lock()
            .unwrap()
            .insert(record_key(collection, key), value);
        Ok(())
    }

    async fn update_record(
        &self,
        collection: &str,
        key: &str,
        partial: Value,
    ) -> Result<(), ServiceError> {
        if let Some(err) = self.take_record_failure() {
            return Err(err);
        }
        let mut records = self.records.lock().unwrap();
        let entry = records
            .entry(record_key(collection, key))
            .or_insert_with(|| json!({}));
        // Shallow merge, like the real database's PATCH.
        if let (Some(base), Some(patch)) = (entry.as_object_mut(), partial.as_object()) {
            for (field, value) in patch {
                base.insert(field.clone(), value.clone());
            }
        }
        Ok(())
    }
}
