//! Registration orchestration service.
//!
//! One registration walks a fixed sequence of stages; the credential and
//! device stages run in the shared validation pipeline before the service
//! is invoked, and any failure is terminal for the request. Persistence
//! must complete before the success response is emitted.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, info, warn};

use crate::domain::account::{
    AccountRecord, GeneratedIdentifiers, Pid, RegistrationInput, SynthesisContext,
    format_timestamp,
};
use crate::domain::config::ServiceConfig;
use crate::domain::error::RegistrationError;
use crate::domain::headers::DeviceClaim;
use crate::domain::password::derive_storage_hash;
use crate::domain::ports::{
    AccountStore, IdentifierGenerator, MiiRenderError, MiiRenderer, PidAllocator, TimezoneOffsets,
};

/// Stages of one registration request, in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStage {
    Received,
    CredentialChecked,
    DeviceChecked,
    IdentifiersIssued,
    DocumentBuilt,
    Persisted,
    Responded,
}

/// Driving port invoked by the HTTP adapter to register a person.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersonRegistration: Send + Sync {
    /// Issue identifiers, synthesize the account record, and persist it.
    async fn register(
        &self,
        claim: DeviceClaim,
        input: RegistrationInput,
    ) -> Result<Pid, RegistrationError>;
}

/// Domain service implementing the registration flow.
pub struct RegistrationService {
    store: Arc<dyn AccountStore>,
    pids: Arc<dyn PidAllocator>,
    identifiers: Arc<dyn IdentifierGenerator>,
    timezones: Arc<dyn TimezoneOffsets>,
    mii_renderer: Arc<dyn MiiRenderer>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl RegistrationService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        pids: Arc<dyn PidAllocator>,
        identifiers: Arc<dyn IdentifierGenerator>,
        timezones: Arc<dyn TimezoneOffsets>,
        mii_renderer: Arc<dyn MiiRenderer>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            pids,
            identifiers,
            timezones,
            mii_renderer,
            clock,
            config,
        }
    }

    fn issue_identifiers(&self) -> GeneratedIdentifiers {
        // Lengths match the legacy record layout.
        GeneratedIdentifiers {
            attribute_id: self.identifiers.numeric_token(8),
            internal_account_id: self.identifiers.numeric_token(9),
            email_id: self.identifiers.numeric_token(8),
            mii_id: self.identifiers.numeric_token(10),
            mii_image_id: self.identifiers.numeric_token(10),
            image_hash: self.identifiers.image_hash(),
        }
    }

    fn utc_offset_seconds(&self, input: &RegistrationInput) -> i64 {
        let now = self.clock.utc();
        let minutes = input
            .tz_name
            .as_deref()
            .and_then(|tz_name| {
                let resolved = self.timezones.offset_minutes(tz_name, now);
                if resolved.is_none() {
                    debug!(tz_name, "unknown timezone name, defaulting offset to zero");
                }
                resolved
            })
            .unwrap_or(0);
        i64::from(minutes) * 60
    }

    fn offer_mii_payload(&self, record: &AccountRecord) {
        let Some(data) = record.mii.as_ref().and_then(|mii| mii.data.as_deref()) else {
            return;
        };
        match self.mii_renderer.render(data) {
            Ok(_image) => debug!(pid = %record.pid, "mii image rendered"),
            Err(MiiRenderError::NotImplemented) => {
                debug!(pid = %record.pid, "mii image rendering unavailable, cache not populated");
            }
            Err(err) => warn!(pid = %record.pid, error = %err, "mii image rendering failed"),
        }
    }
}

#[async_trait]
impl PersonRegistration for RegistrationService {
    async fn register(
        &self,
        claim: DeviceClaim,
        input: RegistrationInput,
    ) -> Result<Pid, RegistrationError> {
        let pid = self.pids.allocate().await.inspect_err(|err| {
            error!(error = %err, "pid allocation failed");
        })?;
        let ids = self.issue_identifiers();
        debug!(%pid, stage = ?RegistrationStage::IdentifiersIssued, "identifiers issued");

        // bcrypt is deliberately expensive; keep it off the async workers.
        let password = input.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || derive_storage_hash(&password, pid))
            .await
            .map_err(|err| RegistrationError::PasswordDerivation {
                message: err.to_string(),
            })?
            .map_err(|err| RegistrationError::PasswordDerivation {
                message: err.to_string(),
            })?;

        let timestamp = format_timestamp(self.clock.utc());
        let record = AccountRecord::synthesize(
            &input,
            &SynthesisContext {
                pid,
                ids: &ids,
                password_hash: &password_hash,
                claim: &claim,
                timestamp: &timestamp,
                utc_offset_seconds: self.utc_offset_seconds(&input),
                config: &self.config,
            },
        );
        debug!(%pid, stage = ?RegistrationStage::DocumentBuilt, "account record synthesized");

        self.store.insert(&record).await.inspect_err(|err| {
            error!(%pid, error = %err, "account persistence failed");
        })?;
        debug!(%pid, stage = ?RegistrationStage::Persisted, "account record persisted");

        self.offer_mii_payload(&record);

        info!(%pid, user_id = ?record.user_id, "account registered");
        Ok(pid)
    }
}
