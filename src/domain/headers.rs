//! Console identity headers and the validated device claim.

/// Raw `X-Nintendo-*` header values as extracted by an inbound adapter.
///
/// Extraction is lossless: every field is optional here so the validation
/// pipeline can report the precise legacy error for whichever header is
/// missing, in the legacy order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleHeaders {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub serial_number: Option<String>,
    pub region: Option<String>,
    pub platform_id: Option<String>,
    pub device_id: Option<String>,
    pub device_certificate: Option<String>,
}

/// Device identity accepted by the validation pipeline.
///
/// Content is taken at face value: format and certificate verification are
/// out of scope for this service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceClaim {
    pub serial_number: String,
    pub region: String,
    pub platform_id: String,
    pub device_id: String,
    pub device_certificate: String,
}
