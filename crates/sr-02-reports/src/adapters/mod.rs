//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-process implementation of the outbound port. The SQLite adapter lives
//! in `statrep-runtime`.

mod memory;

pub use memory::InMemoryReportRepository;
