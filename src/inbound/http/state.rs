//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle via `actix_web::web::Data`, so they only
//! depend on driving ports and stay testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ServiceConfig;
use crate::domain::availability::UsernameAvailability;
use crate::domain::registration::PersonRegistration;

/// Dependency bundle for the people endpoints.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn PersonRegistration>,
    pub availability: Arc<dyn UsernameAvailability>,
    pub clock: Arc<dyn Clock>,
    pub config: ServiceConfig,
}

impl HttpState {
    pub fn new(
        registration: Arc<dyn PersonRegistration>,
        availability: Arc<dyn UsernameAvailability>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            registration,
            availability,
            clock,
            config,
        }
    }
}
