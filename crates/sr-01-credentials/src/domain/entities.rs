//! # Domain Entities
//!
//! Core entities for the Credential Store.

use super::errors::CredentialError;
use shared_types::{Handle, Timestamp};
use subtle::ConstantTimeEq;

/// Length of a stored PIN hash (SHA-256, hex encoded).
pub const PIN_HASH_HEX_LEN: usize = 64;

/// Lowercase hex SHA-256 digest of a PIN.
///
/// `Debug` is redacted so a digest never reaches a log line by accident.
#[derive(Clone, PartialEq, Eq)]
pub struct PinHash(String);

impl PinHash {
    /// Encode a raw 32-byte digest.
    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self(hex::encode(digest))
    }

    /// Parse a digest loaded from storage.
    ///
    /// Accepts upper- or lowercase hex and normalises to lowercase. Returns
    /// `None` for anything that is not 64 hex characters.
    pub fn from_hex(value: &str) -> Option<Self> {
        if value.len() != PIN_HASH_HEX_LEN || !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(value.to_ascii_lowercase()))
    }

    /// Hex text as persisted.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison against another digest.
    pub fn matches(&self, other: &PinHash) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl std::fmt::Debug for PinHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PinHash(***)")
    }
}

/// Stored credential row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
    /// Unique, case-sensitive operator handle.
    pub handle: Handle,
    /// Digest of the active PIN.
    pub pin_hash: PinHash,
    /// Last successful submission, if any.
    pub last_used: Option<Timestamp>,
}

impl Credential {
    /// Create a never-used credential.
    pub fn new(handle: impl Into<Handle>, pin_hash: PinHash) -> Self {
        Self {
            handle: handle.into(),
            pin_hash,
            last_used: None,
        }
    }
}

/// Result of a single verification attempt, for logging and metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VerificationOutcome {
    /// Stored digest matches the supplied PIN.
    Verified,
    /// Handle exists, digest differs.
    Mismatch,
    /// No credential for the handle.
    UnknownHandle,
    /// Nothing was entered.
    EmptyPin,
    /// The repository failed; treated as a failed verification.
    LookupError,
}

impl VerificationOutcome {
    /// True only for [`VerificationOutcome::Verified`].
    pub fn is_verified(self) -> bool {
        self == VerificationOutcome::Verified
    }

    /// Stable label used in log fields and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationOutcome::Verified => "verified",
            VerificationOutcome::Mismatch => "mismatch",
            VerificationOutcome::UnknownHandle => "unknown_handle",
            VerificationOutcome::EmptyPin => "empty_pin",
            VerificationOutcome::LookupError => "lookup_error",
        }
    }
}

/// Handle listing. On failure `handles` is empty and `error` carries the cause.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HandleList {
    /// Handles in ascending lexical order.
    pub handles: Vec<Handle>,
    /// Why the listing is empty, when it failed.
    pub error: Option<CredentialError>,
}

impl HandleList {
    /// Successful listing.
    pub fn ok(handles: Vec<Handle>) -> Self {
        Self {
            handles,
            error: None,
        }
    }

    /// Failed listing.
    pub fn failed(error: CredentialError) -> Self {
        Self {
            handles: Vec::new(),
            error: Some(error),
        }
    }
}
