//! HTTP server wiring: route registration shared by the binary and tests.

pub mod config;

use std::sync::Arc;

use actix_web::web;
use actix_web::{App, HttpServer};

use crate::domain::ServiceConfig;
use crate::domain::availability::AvailabilityService;
use crate::domain::registration::RegistrationService;
use crate::domain::ports::{
    RandomIdentifierGenerator, TzdbTimezoneOffsets, UnimplementedMiiRenderer,
};
use crate::inbound::http::{HttpState, people};
use crate::outbound::{CounterPidAllocator, InMemoryAccountStore};

pub use config::ServerConfig;

/// Register the people endpoints under the legacy `/v1/api` scope.
pub fn configure_app(state: HttpState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |app| {
        app.app_data(web::Data::new(state)).service(
            web::scope("/v1/api")
                .service(people::register_person)
                .service(people::check_username),
        );
    }
}

/// Wire the default adapter set behind the domain services.
pub fn default_state(service: ServiceConfig) -> HttpState {
    let store = Arc::new(InMemoryAccountStore::new());
    let registration = RegistrationService::new(
        store.clone(),
        Arc::new(CounterPidAllocator::new()),
        Arc::new(RandomIdentifierGenerator),
        Arc::new(TzdbTimezoneOffsets),
        Arc::new(UnimplementedMiiRenderer),
        Arc::new(mockable::DefaultClock),
        service.clone(),
    );
    let availability = AvailabilityService::new(store);
    HttpState::new(
        Arc::new(registration),
        Arc::new(availability),
        Arc::new(mockable::DefaultClock),
        service,
    )
}

/// Run the server until shutdown.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let state = default_state(config.service.clone());
    tracing::info!(addr = %config.bind_addr(), "account service listening");
    HttpServer::new(move || App::new().configure(configure_app(state.clone())))
        .bind(config.bind_addr())?
        .run()
        .await
}
