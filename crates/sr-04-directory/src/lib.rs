//! # SR-04 Directory Lookup
//!
//! Read-only name lists used to populate selectors at session start, plus
//! the substring filter that turns a partial entry into suggestions.
//!
//! **Subsystem ID:** 04
//!
//! A failed list never blocks a session: [`DirectoryService::load`] returns
//! an empty list for it and records a [`DirectoryWarning`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::StaticDirectory;
pub use domain::{
    suggest, DirectoryError, DirectoryList, DirectorySnapshot, DirectoryWarning,
    DEFAULT_SUGGESTION_LIMIT,
};
pub use ports::{DirectoryLookupApi, DirectoryRepository};
pub use service::DirectoryService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
