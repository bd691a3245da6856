//! Account gateway over a Firebase-style identity and data service
//!
//! Exposes `register`, `login`, and `update_user` against an external
//! identity service plus a keyed record store, translating known service
//! error codes into display-ready messages. The gateway holds no state of
//! its own beyond immutable configuration; every profile read or write
//! round-trips to the service.

pub mod config;
pub mod error;
pub mod firebase;
pub mod gateway;
pub mod profile;
pub mod service;

pub use config::GatewayConfig;
pub use error::{readable_message, AccountError, FALLBACK_MESSAGE};
pub use firebase::FirebaseService;
pub use gateway::AccountGateway;
pub use profile::{UserAuth, UserProfile};
pub use service::{IdentityService, RecordStore, ServiceError};
