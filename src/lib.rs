//! Emulation of the legacy console account-registration API.
//!
//! The crate is laid out hexagonally: `domain` holds the validation,
//! synthesis, and service logic behind ports; `inbound::http` adapts the
//! legacy HTTP surface; `outbound` provides the in-process adapters;
//! `wire` speaks the legacy XML dialect.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;
pub mod wire;
