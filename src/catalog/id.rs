//! External listing identifiers.
//!
//! Identifiers are independent of any storage key: 16 characters drawn
//! uniformly from `[A-Za-z0-9]`, roughly 95 bits of entropy. Uniqueness is
//! probabilistic and is not checked against the catalog.

use rand::distr::Alphanumeric;
use rand::{rng, Rng};

pub const EXTERNAL_ID_LEN: usize = 16;

/// Source of external listing identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Default generator backed by the thread-local CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlphanumericIdGenerator;

impl IdGenerator for AlphanumericIdGenerator {
    fn generate(&self) -> String {
        rng()
            .sample_iter(&Alphanumeric)
            .take(EXTERNAL_ID_LEN)
            .map(char::from)
            .collect()
    }
}

/// Whether a string satisfies the external id length and alphabet contract.
pub fn is_valid_external_id(id: &str) -> bool {
    id.len() == EXTERNAL_ID_LEN && id.bytes().all(|b| b.is_ascii_alphanumeric())
}
