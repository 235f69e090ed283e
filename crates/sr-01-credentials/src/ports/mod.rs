//! # Ports Layer (Hexagonal Architecture)
//!
//! - **Inbound**: `CredentialStoreApi`, what callers may ask of the store
//! - **Outbound**: `CredentialRepository`, what the store needs from persistence

pub mod inbound;
pub mod outbound;

pub use inbound::CredentialStoreApi;
pub use outbound::CredentialRepository;
