//! # Ports Layer (Hexagonal Architecture)

pub mod inbound;
pub mod outbound;

pub use inbound::ReportStoreApi;
pub use outbound::ReportRepository;
