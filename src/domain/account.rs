//! Account aggregate: registration input, the synthesized account record,
//! and the pure document synthesizer.
//!
//! The synthesizer is a pure function over validated input plus generated
//! identifiers; given identical generator outputs it produces identical
//! records, which keeps registration deterministic under test.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::config::ServiceConfig;
use crate::domain::headers::DeviceClaim;

/// Globally unique account identifier issued by the PID allocator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Pid(u32);

impl Pid {
    /// Wrap an allocated identifier.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Mii descriptor submitted by the client.
///
/// All fields are optional; absence propagates into the record untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MiiInput {
    pub data: Option<String>,
    pub name: Option<String>,
    pub primary: Option<Value>,
}

/// JSON registration body, shaped like the legacy service's flat payload.
///
/// Everything except `password` and `tz_name` is an opaque pass-through
/// value; body content is not validated here (only headers are).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RegistrationInput {
    pub birth_date: Option<String>,
    pub country: Option<String>,
    pub gender: Option<String>,
    pub language: Option<String>,
    pub marketing_flag: Option<Value>,
    pub off_device_flag: Option<Value>,
    /// Email address; the remaining email-block fields arrive flat.
    pub email: Option<String>,
    pub parent: Option<Value>,
    pub primary: Option<Value>,
    #[serde(rename = "type")]
    pub email_type: Option<String>,
    pub validated: Option<Value>,
    pub mii: Option<MiiInput>,
    #[serde(default)]
    pub password: String,
    pub region: Option<Value>,
    pub tz_name: Option<String>,
    pub user_id: Option<String>,
    pub device_attributes: Option<Value>,
    pub agreement: Option<Value>,
    pub parental_consent: Option<Value>,
}

/// Opaque identifiers issued for one registration.
///
/// Each id is distinct from the PID and from the others; the lengths are
/// the legacy record's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedIdentifiers {
    pub attribute_id: String,
    pub internal_account_id: String,
    pub email_id: String,
    pub mii_id: String,
    pub mii_image_id: String,
    pub image_hash: String,
}

/// Fixed attribute carried by the internal accounts list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountAttribute {
    pub id: String,
    pub name: String,
    pub updated_by: String,
    pub value: String,
}

/// Single-key wrapper matching the legacy list-entry shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeEntry {
    pub attribute: AccountAttribute,
}

/// Internal (eShop) account linked to the person.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InternalAccount {
    pub attributes: Vec<AttributeEntry>,
    pub domain: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

/// Single-key wrapper matching the legacy list-entry shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InternalAccountEntry {
    pub account: InternalAccount,
}

/// Email sub-record with its own generated identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<Value>,
    pub reachable: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub email_type: Option<String>,
    pub updated_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validated: Option<Value>,
}

/// Cached avatar image reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MiiImage {
    pub cached_url: String,
    pub id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Single-key wrapper matching the legacy list-entry shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MiiImageEntry {
    pub mii_image: MiiImage,
}

/// Mii sub-record with its own generated identifier and content hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MiiRecord {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    pub id: String,
    pub mii_hash: String,
    pub mii_images: Vec<MiiImageEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<Value>,
}

/// Device linked at registration time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedDevice {
    pub serial: String,
    pub id: String,
    pub certificate: String,
}

/// Linked-device mapping keyed by console family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedDevices {
    pub wiiu: LinkedDevice,
}

/// Sub-record that must never appear in any response payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitiveRecord {
    pub password: String,
    pub linked_devices: LinkedDevices,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_attributes: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_agreement: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parental_consent: Option<Value>,
}

/// Synthesized account record as persisted by the store.
///
/// ## Invariants
/// - `create_date == updated` at creation; the record is never mutated by
///   this service afterwards.
/// - `utc_offset` is in seconds.
/// - `sensitive` never reaches a wire response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountRecord {
    pub accounts: Vec<InternalAccountEntry>,
    pub active_flag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub create_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub updated: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing_flag: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub off_device_flag: Option<Value>,
    pub pid: Pid,
    pub email: EmailRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mii: Option<MiiRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tz_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub utc_offset: i64,
    pub sensitive: SensitiveRecord,
}

/// Everything the synthesizer needs besides the client input.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisContext<'a> {
    pub pid: Pid,
    pub ids: &'a GeneratedIdentifiers,
    pub password_hash: &'a str,
    pub claim: &'a DeviceClaim,
    /// Second-precision creation timestamp, preformatted.
    pub timestamp: &'a str,
    /// Derived UTC offset in seconds (signed).
    pub utc_offset_seconds: i64,
    pub config: &'a ServiceConfig,
}

/// Legacy timestamp format carried by account records.
pub fn format_timestamp(at: chrono::DateTime<chrono::Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S").to_string()
}

impl AccountRecord {
    /// Assemble the canonical account record from validated input and
    /// generated identifiers. Pure: identical arguments yield identical
    /// records.
    pub fn synthesize(input: &RegistrationInput, ctx: &SynthesisContext<'_>) -> Self {
        let mii = input.mii.as_ref().map(|mii| {
            let url = ctx.config.mii_image_url(&ctx.ids.image_hash);
            MiiRecord {
                status: "COMPLETED".to_owned(),
                data: mii.data.clone(),
                id: ctx.ids.mii_id.clone(),
                mii_hash: ctx.ids.image_hash.clone(),
                mii_images: vec![MiiImageEntry {
                    mii_image: MiiImage {
                        cached_url: url.clone(),
                        id: ctx.ids.mii_image_id.clone(),
                        url,
                        kind: "standard".to_owned(),
                    },
                }],
                name: mii.name.clone(),
                primary: mii.primary.clone(),
            }
        });

        Self {
            accounts: vec![InternalAccountEntry {
                account: InternalAccount {
                    attributes: vec![AttributeEntry {
                        attribute: AccountAttribute {
                            id: ctx.ids.attribute_id.clone(),
                            name: "environment".to_owned(),
                            updated_by: "USER".to_owned(),
                            value: "PROD".to_owned(),
                        },
                    }],
                    domain: "ESHOP.NINTENDO.NET".to_owned(),
                    kind: "INTERNAL".to_owned(),
                    id: ctx.ids.internal_account_id.clone(),
                },
            }],
            active_flag: "Y".to_owned(),
            birth_date: input.birth_date.clone(),
            country: input.country.clone(),
            create_date: ctx.timestamp.to_owned(),
            gender: input.gender.clone(),
            language: input.language.clone(),
            updated: ctx.timestamp.to_owned(),
            marketing_flag: input.marketing_flag.clone(),
            off_device_flag: input.off_device_flag.clone(),
            pid: ctx.pid,
            email: EmailRecord {
                address: input.email.clone(),
                id: ctx.ids.email_id.clone(),
                parent: input.parent.clone(),
                primary: input.primary.clone(),
                reachable: "N".to_owned(),
                email_type: input.email_type.clone(),
                updated_by: "INTERNAL WS".to_owned(),
                validated: input.validated.clone(),
            },
            mii,
            region: input.region.clone(),
            tz_name: input.tz_name.clone(),
            user_id: input.user_id.clone(),
            utc_offset: ctx.utc_offset_seconds,
            sensitive: SensitiveRecord {
                password: ctx.password_hash.to_owned(),
                linked_devices: LinkedDevices {
                    wiiu: LinkedDevice {
                        serial: ctx.claim.serial_number.clone(),
                        id: ctx.claim.device_id.clone(),
                        certificate: ctx.claim.device_certificate.clone(),
                    },
                },
                device_attributes: input.device_attributes.clone(),
                service_agreement: input.agreement.clone(),
                parental_consent: input.parental_consent.clone(),
            },
        }
    }
}
