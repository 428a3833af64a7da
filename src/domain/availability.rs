//! Username-availability use-case.
//!
//! A content-free probe: the caller learns only whether the name is taken.
//! Credential validation runs in the inbound adapter before this service
//! is reached, identically to registration.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::error::AvailabilityError;
use crate::domain::ports::AccountStore;

/// Driving port invoked by the HTTP adapter to probe a username.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsernameAvailability: Send + Sync {
    /// Whether an existing account already claimed this user id.
    async fn is_taken(&self, username: &str) -> Result<bool, AvailabilityError>;
}

/// Domain service backed by the account store's existence check.
pub struct AvailabilityService {
    store: Arc<dyn AccountStore>,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UsernameAvailability for AvailabilityService {
    async fn is_taken(&self, username: &str) -> Result<bool, AvailabilityError> {
        let taken = self.store.username_exists(username).await?;
        debug!(username, taken, "username availability checked");
        Ok(taken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{AccountStoreError, MockAccountStore};
    use rstest::rstest;

    #[rstest]
    #[case(true)]
    #[case(false)]
    #[tokio::test]
    async fn reports_the_store_existence_result(#[case] exists: bool) {
        let mut store = MockAccountStore::new();
        store
            .expect_username_exists()
            .withf(|username| username == "ada-lovelace")
            .times(1)
            .returning(move |_| Ok(exists));

        let taken = AvailabilityService::new(Arc::new(store))
            .is_taken("ada-lovelace")
            .await
            .expect("lookup succeeds");
        assert_eq!(taken, exists);
    }

    #[tokio::test]
    async fn lookup_failures_surface() {
        let mut store = MockAccountStore::new();
        store
            .expect_username_exists()
            .returning(|_| Err(AccountStoreError::connection("store offline")));

        let err = AvailabilityService::new(Arc::new(store))
            .is_taken("ada-lovelace")
            .await
            .expect_err("lookup failure surfaces");
        assert!(matches!(err, AvailabilityError::Lookup(_)));
    }
}
