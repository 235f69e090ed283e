//! # STATREP Test Suite
//!
//! Unified test crate for flows that cross subsystem boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── scenarios.rs     # Operator scenarios over in-memory adapters
//!     └── sqlite_flows.rs  # The same flows through the runtime and SQLite
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p sr-tests
//!
//! # By category
//! cargo test -p sr-tests integration::scenarios::
//! cargo test -p sr-tests integration::sqlite_flows::
//! ```

pub mod integration;
