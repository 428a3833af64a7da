//! Legacy wire error documents and service error types.
//!
//! The fixed `{cause?, code, message}` vocabulary is protocol payload, not
//! a Rust error: legacy clients receive it in an HTTP 200 XML body.
//! Genuine server-side failures (persistence, PID allocation, password
//! derivation) are ordinary `thiserror` enums that inbound adapters map to
//! HTTP 500.

use crate::domain::ports::{AccountStoreError, PidAllocationError};
use crate::wire::{XmlDocument, XmlValue};

/// Error document returned to legacy clients.
///
/// ## Invariants
/// - `code` and `message` come from the fixed legacy vocabulary and are
///   never synthesized from free text.
/// - The serialized form omits `cause` entirely when it is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyErrorDocument {
    cause: Option<&'static str>,
    code: &'static str,
    message: &'static str,
}

impl LegacyErrorDocument {
    /// `0004`: unknown client id or mismatching client secret.
    pub const fn invalid_credentials() -> Self {
        Self {
            cause: Some("client_id"),
            code: "0004",
            message: "API application invalid or incorrect application credentials",
        }
    }

    /// `0002` without a cause: serial number header missing.
    pub const fn invalid_serial_number() -> Self {
        Self {
            cause: None,
            code: "0002",
            message: "serialNumber format is invalid",
        }
    }

    /// `0002` with the region header named as the cause.
    pub const fn invalid_region() -> Self {
        Self {
            cause: Some("X-Nintendo-Region"),
            code: "0002",
            message: "X-Nintendo-Region format is invalid",
        }
    }

    /// `0113`: platform id, device id, or device certificate missing.
    pub const fn unauthorized_device() -> Self {
        Self {
            cause: Some("device_id"),
            code: "0113",
            message: "Unauthorized device",
        }
    }

    /// Legacy error code, e.g. `0004`.
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Optional cause field naming the offending input.
    pub const fn cause(&self) -> Option<&'static str> {
        self.cause
    }

    /// Human-readable legacy message.
    pub const fn message(&self) -> &'static str {
        self.message
    }

    /// Build the `<errors><error>...</error></errors>` wire document.
    pub fn to_document(&self) -> XmlDocument {
        let error = XmlValue::map()
            .push_opt("cause", self.cause.map(XmlValue::scalar))
            .push("code", XmlValue::scalar(self.code))
            .push("message", XmlValue::scalar(self.message));
        XmlDocument::new("errors", XmlValue::map().push("error", error))
    }
}

/// Failures raised while registering an account.
///
/// Header validation runs before the service is invoked, so every variant
/// here is a server-side failure with no legacy representation; inbound
/// adapters surface them as HTTP 500.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// The PID allocator could not issue a fresh identifier.
    #[error(transparent)]
    PidAllocation(#[from] PidAllocationError),
    /// Deriving the storage password hash failed.
    #[error("password derivation failed: {message}")]
    PasswordDerivation { message: String },
    /// The account store rejected or failed the insert.
    #[error(transparent)]
    Persistence(#[from] AccountStoreError),
}

/// Failures raised by the username-availability check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AvailabilityError {
    /// The account store lookup failed.
    #[error(transparent)]
    Lookup(#[from] AccountStoreError),
}
