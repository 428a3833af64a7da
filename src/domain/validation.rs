//! Ordered credential and device validation pipeline.
//!
//! The legacy service checked headers in a fixed order and answered with
//! the error of the first failing check. The order is contractual: a
//! request missing both the serial number and the device id must report
//! the serial-number error. The pipeline keeps that order explicit as a
//! list of short-circuiting steps rather than nested conditionals.

use crate::domain::config::ServiceConfig;
use crate::domain::error::LegacyErrorDocument;
use crate::domain::headers::{ConsoleHeaders, DeviceClaim};

type Check = fn(&ConsoleHeaders, &ServiceConfig) -> Option<LegacyErrorDocument>;

/// Legacy check order: credentials, serial number, region, device triple.
const CHECKS: [Check; 4] = [
    check_credentials,
    check_serial_number,
    check_region,
    check_device,
];

/// Run the full validation pipeline over the extracted headers.
///
/// Returns the validated [`DeviceClaim`] on acceptance, or the legacy
/// error document of the first failing check.
pub fn validate_console_request(
    headers: &ConsoleHeaders,
    config: &ServiceConfig,
) -> Result<DeviceClaim, LegacyErrorDocument> {
    for check in CHECKS {
        if let Some(rejection) = check(headers, config) {
            return Err(rejection);
        }
    }

    let ConsoleHeaders {
        serial_number: Some(serial_number),
        region: Some(region),
        platform_id: Some(platform_id),
        device_id: Some(device_id),
        device_certificate: Some(device_certificate),
        ..
    } = headers.clone()
    else {
        // Every field was presence-checked above.
        return Err(LegacyErrorDocument::unauthorized_device());
    };

    Ok(DeviceClaim {
        serial_number,
        region,
        platform_id,
        device_id,
        device_certificate,
    })
}

/// Credential-only validation used by the availability endpoint.
pub fn validate_client_credentials(
    headers: &ConsoleHeaders,
    config: &ServiceConfig,
) -> Result<(), LegacyErrorDocument> {
    match check_credentials(headers, config) {
        Some(rejection) => Err(rejection),
        None => Ok(()),
    }
}

fn check_credentials(
    headers: &ConsoleHeaders,
    config: &ServiceConfig,
) -> Option<LegacyErrorDocument> {
    let accepted = match (&headers.client_id, &headers.client_secret) {
        (Some(id), Some(secret)) => {
            // Exact, case-sensitive comparison with no trimming.
            config.client_secret(id) == Some(secret.as_str())
        }
        _ => false,
    };
    (!accepted).then(LegacyErrorDocument::invalid_credentials)
}

fn check_serial_number(
    headers: &ConsoleHeaders,
    _config: &ServiceConfig,
) -> Option<LegacyErrorDocument> {
    headers
        .serial_number
        .is_none()
        .then(LegacyErrorDocument::invalid_serial_number)
}

fn check_region(headers: &ConsoleHeaders, _config: &ServiceConfig) -> Option<LegacyErrorDocument> {
    headers
        .region
        .is_none()
        .then(LegacyErrorDocument::invalid_region)
}

fn check_device(headers: &ConsoleHeaders, _config: &ServiceConfig) -> Option<LegacyErrorDocument> {
    let complete = headers.platform_id.is_some()
        && headers.device_id.is_some()
        && headers.device_certificate.is_some();
    (!complete).then(LegacyErrorDocument::unauthorized_device)
}
