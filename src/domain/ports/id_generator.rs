//! Injectable opaque-identifier generation.
//!
//! Registration issues several record-internal identifiers besides the
//! PID. They only need negligible collision probability within the
//! expected registration volume and must be safe as XML text and URL path
//! segments, so digit and alphanumeric tokens suffice. The trait exists so
//! tests can supply deterministic sequences.

use std::collections::VecDeque;
use std::sync::Mutex;

use rand::distributions::Alphanumeric;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Length of generated avatar image-hash tokens.
const IMAGE_HASH_LEN: usize = 14;

/// Source of opaque per-record identifiers.
pub trait IdentifierGenerator: Send + Sync {
    /// Fresh digit token of the requested length.
    fn numeric_token(&self, length: usize) -> String;

    /// Fresh token namespacing the account's cached avatar image URL.
    fn image_hash(&self) -> String;
}

/// Entropy-backed generator used in production wiring.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdentifierGenerator;

impl IdentifierGenerator for RandomIdentifierGenerator {
    fn numeric_token(&self, length: usize) -> String {
        let mut rng = SmallRng::from_entropy();
        (0..length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }

    fn image_hash(&self) -> String {
        let rng = SmallRng::from_entropy();
        rng.sample_iter(&Alphanumeric)
            .take(IMAGE_HASH_LEN)
            .map(char::from)
            .collect()
    }
}

/// Deterministic generator replaying scripted sequences.
///
/// Tokens and hashes are consumed front to back; when a queue runs dry
/// the generator degrades to a fixed filler so tests stay total.
#[derive(Debug, Default)]
pub struct FixtureIdentifierGenerator {
    tokens: Mutex<VecDeque<String>>,
    image_hashes: Mutex<VecDeque<String>>,
}

impl FixtureIdentifierGenerator {
    /// Script the exact identifier sequence a test expects.
    pub fn new(
        tokens: impl IntoIterator<Item = String>,
        image_hashes: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            tokens: Mutex::new(tokens.into_iter().collect()),
            image_hashes: Mutex::new(image_hashes.into_iter().collect()),
        }
    }
}

impl IdentifierGenerator for FixtureIdentifierGenerator {
    fn numeric_token(&self, length: usize) -> String {
        self.tokens
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| "0".repeat(length))
    }

    fn image_hash(&self) -> String {
        self.image_hashes
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| "fixturehash".to_owned())
    }
}
