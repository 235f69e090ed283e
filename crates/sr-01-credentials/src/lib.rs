//! # SR-01 Credential Store
//!
//! Handle → PIN-hash mapping for field responders.
//!
//! **Subsystem ID:** 01
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! - SHA-256 PIN hashing (hex digest, unsalted)
//! - Fail-closed verification that never errors
//! - Temporary-PIN detection (`z`/`Z` prefix) forcing a rotation
//! - Unconditional rotation, best-effort last-used tracking
//! - Administrative enrolment of new handles
//!
//! ## Security
//!
//! | Rule | Enforcement |
//! |------|-------------|
//! | PIN never stored in clear | only [`PinHash`] reaches the repository |
//! | PIN/hash never logged | `Pin` and `PinHash` redact `Debug`, log events carry the handle only |
//! | No auto-provisioning | unknown handles always fail `verify` |
//!
//! ## Module Structure
//!
//! ```text
//! sr-01-credentials/
//! ├── domain/     # Credential, PinHash, hashing policy, errors
//! ├── ports/      # CredentialStoreApi (inbound), CredentialRepository (outbound)
//! ├── adapters/   # InMemoryCredentialRepository
//! └── service.rs  # CredentialService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::InMemoryCredentialRepository;
pub use domain::{
    hash_pin, is_temporary, Credential, CredentialError, HandleList, PinHash,
    VerificationOutcome, PIN_HASH_HEX_LEN, TEMPORARY_PIN_PREFIX,
};
pub use ports::{CredentialRepository, CredentialStoreApi};
pub use service::CredentialService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
