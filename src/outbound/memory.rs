//! In-process adapters: account store and PID allocation authority.
//!
//! The store is a plain in-memory collection; real persistence is an
//! external concern for this service. The allocator is the one shared
//! resource: an atomic counter so concurrent registrations can never be
//! issued the same PID.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::account::{AccountRecord, Pid};
use crate::domain::ports::{AccountStore, AccountStoreError, PidAllocationError, PidAllocator};

/// First PID issued by a fresh allocator, matching the legacy id range.
pub const FIRST_PID: u32 = 1_800_000_000;

/// Atomic counter allocation authority.
///
/// The counter is wider than the PID space so exhaustion is detected
/// instead of wrapping into already-issued identifiers.
#[derive(Debug)]
pub struct CounterPidAllocator {
    next: AtomicU64,
}

impl CounterPidAllocator {
    /// Allocator starting at the legacy range.
    pub fn new() -> Self {
        Self::starting_at(FIRST_PID)
    }

    /// Allocator starting at an explicit value, for tests and restarts.
    pub fn starting_at(first: u32) -> Self {
        Self {
            next: AtomicU64::new(u64::from(first)),
        }
    }
}

impl Default for CounterPidAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PidAllocator for CounterPidAllocator {
    async fn allocate(&self) -> Result<Pid, PidAllocationError> {
        let issued = self.next.fetch_add(1, Ordering::Relaxed);
        u32::try_from(issued)
            .map(Pid::new)
            .map_err(|_| PidAllocationError::Exhausted)
    }
}

/// In-memory, insert-only account store.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    records: RwLock<Vec<AccountRecord>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, for diagnostics and tests.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert(&self, record: &AccountRecord) -> Result<(), AccountStoreError> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn username_exists(&self, user_id: &str) -> Result<bool, AccountStoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .any(|record| record.user_id.as_deref() == Some(user_id)))
    }
}
