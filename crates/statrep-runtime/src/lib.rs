//! # STATREP Runtime
//!
//! Wires the STATREP subsystems to SQLite and exposes them through the
//! `statrep` command line.
//!
//! ## Modular Structure
//!
//! - `container/` - configuration and service wiring
//! - `adapters/` - SQLite repositories and the Prometheus metrics recorder
//! - `cli` / `commands` - argument parsing and command execution
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from `SR_*` variables and validate it
//! 2. Install logging and register metrics
//! 3. Open the database, bootstrapping the schema if needed
//! 4. Wire services and run the requested command

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod container;

pub use adapters::{PrometheusWorkflowMetrics, SqliteStore, StorageError, StoredTotals};
pub use container::{ConfigError, RuntimeConfig, StatrepContainer};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
