//! Port abstraction for account persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::account::AccountRecord;

/// Persistence errors raised by account store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountStoreError {
    /// Store connection could not be established.
    #[error("account store connection failed: {message}")]
    Connection { message: String },
    /// Insert or lookup failed during execution.
    #[error("account store query failed: {message}")]
    Query { message: String },
}

impl AccountStoreError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Insert-only persistence port for synthesized account records.
///
/// Ownership of the record transfers to the store on insert; this service
/// never mutates an account afterwards.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a freshly synthesized account record.
    async fn insert(&self, record: &AccountRecord) -> Result<(), AccountStoreError>;

    /// Whether an account already claimed this user id.
    async fn username_exists(&self, user_id: &str) -> Result<bool, AccountStoreError>;
}
