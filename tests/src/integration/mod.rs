//! # Integration Tests
//!
//! Credential store, report store, workflow and directory exercised together.

pub mod scenarios;
pub mod sqlite_flows;
