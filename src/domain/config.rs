//! Service configuration threaded explicitly into validators and the
//! document synthesizer.
//!
//! Keeping the credential allow-list and endpoint bases in a value object
//! (rather than process-wide state) lets tests run with their own
//! credential sets.

use std::collections::HashMap;

use serde::Deserialize;

/// Banner reported in the legacy `Server` response header.
pub const SERVER_BANNER: &str = "Nintendo 3DS (http)";

/// Suffix appended to cached avatar image URLs.
pub const MII_IMAGE_SUFFIX: &str = "_standard.tga";

/// Immutable per-service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Valid client id → client secret pairs.
    clients: HashMap<String, String>,
    /// Base endpoint for cached avatar images, including trailing slash.
    mii_image_base: String,
}

impl ServiceConfig {
    /// Build a configuration from an explicit credential mapping.
    pub fn new(clients: HashMap<String, String>, mii_image_base: impl Into<String>) -> Self {
        Self {
            clients,
            mii_image_base: mii_image_base.into(),
        }
    }

    /// Add a valid client credential pair.
    #[must_use]
    pub fn with_client(mut self, id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.clients.insert(id.into(), secret.into());
        self
    }

    /// Configured secret for a client id, if the id is known.
    pub fn client_secret(&self, client_id: &str) -> Option<&str> {
        self.clients.get(client_id).map(String::as_str)
    }

    /// Cached avatar URL for an image-hash token.
    pub fn mii_image_url(&self, image_hash: &str) -> String {
        format!("{}{image_hash}{MII_IMAGE_SUFFIX}", self.mii_image_base)
    }
}

impl Default for ServiceConfig {
    /// Development defaults: one demo credential pair and the legacy image
    /// endpoint.
    fn default() -> Self {
        Self::new(
            HashMap::new(),
            "http://mii-images.account.nintendo.net/",
        )
        .with_client(
            "ea25c66c26b403376b4c5ed94ab9cdea",
            "d137be62cb6a2b831cad8c013b92fb55",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_lookup_is_exact() {
        let config = ServiceConfig::default().with_client("id-a", "Secret");
        assert_eq!(config.client_secret("id-a"), Some("Secret"));
        assert_eq!(config.client_secret("id-b"), None);
    }

    #[test]
    fn image_url_concatenates_base_hash_and_suffix() {
        let config = ServiceConfig::new(HashMap::new(), "http://cdn.example/mii/");
        assert_eq!(
            config.mii_image_url("abc123"),
            "http://cdn.example/mii/abc123_standard.tga"
        );
    }
}
