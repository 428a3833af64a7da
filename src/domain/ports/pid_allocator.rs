//! Port for the external PID uniqueness authority.
//!
//! Randomness cannot guarantee uniqueness at scale, so PID issuance goes
//! through an atomic allocation authority. The one shared-resource
//! boundary of the service lives behind this port.

use async_trait::async_trait;

use crate::domain::account::Pid;

/// Failures raised by PID allocation adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PidAllocationError {
    /// The allocator ran out of issuable identifiers. Terminal for the
    /// request; never retried internally.
    #[error("pid allocator exhausted its identifier space")]
    Exhausted,
    /// The allocation authority could not be reached.
    #[error("pid allocator unavailable: {message}")]
    Unavailable { message: String },
}

impl PidAllocationError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Atomic allocation port: every successful call returns a PID no other
/// call has returned or ever will.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PidAllocator: Send + Sync {
    /// Issue a fresh, globally unique account PID.
    async fn allocate(&self) -> Result<Pid, PidAllocationError>;
}
