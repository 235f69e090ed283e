//! # Ports Layer (Hexagonal Architecture)

pub mod inbound;
pub mod outbound;

pub use inbound::DirectoryLookupApi;
pub use outbound::DirectoryRepository;
