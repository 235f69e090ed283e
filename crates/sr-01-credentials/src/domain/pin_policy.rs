//! # PIN Policy
//!
//! Hashing and the temporary-PIN predicate. Both are pure functions of the
//! supplied PIN and independent of any stored credential.

use super::entities::PinHash;
use sha2::{Digest, Sha256};
use shared_types::Pin;

/// First character (case-insensitive) reserved for administrator-issued
/// temporary PINs.
pub const TEMPORARY_PIN_PREFIX: char = 'z';

/// Hash a PIN with SHA-256 and return the lowercase hex digest.
///
/// Deterministic and unsalted: two handles sharing a PIN share a digest.
pub fn hash_pin(pin: &Pin) -> PinHash {
    let digest = Sha256::digest(pin.expose().as_bytes());
    PinHash::from_digest(digest.into())
}

/// True iff the PIN's first character is `z` or `Z`.
pub fn is_temporary(pin: &Pin) -> bool {
    pin.expose()
        .chars()
        .next()
        .is_some_and(|c| c.eq_ignore_ascii_case(&TEMPORARY_PIN_PREFIX))
}
