//! Domain logic: validation pipeline, document synthesis, and the
//! registration/availability services behind hexagonal ports.
//!
//! Everything here is transport agnostic; the inbound HTTP adapter maps
//! legacy error documents and service failures to wire responses.

pub mod account;
pub mod availability;
pub mod config;
pub mod error;
pub mod headers;
pub mod password;
pub mod ports;
pub mod registration;
pub mod validation;

pub use self::account::{AccountRecord, Pid, RegistrationInput};
pub use self::config::ServiceConfig;
pub use self::error::{AvailabilityError, LegacyErrorDocument, RegistrationError};
pub use self::headers::{ConsoleHeaders, DeviceClaim};
