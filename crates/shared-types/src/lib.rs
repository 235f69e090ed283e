//! # Shared Types Crate
//!
//! Types used across the STATREP subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: a handle, a PIN and a date-time group mean the
//!   same thing to the credential store, the report store and the workflow.
//! - **No Clear-Text Secrets**: [`Pin`] never prints its contents and is zeroed
//!   when dropped.
//! - **One Repository Error**: every outbound repository port reports failures
//!   as [`RepositoryError`], so adapters can back several ports at once.

pub mod entities;
pub mod errors;
pub mod secure_pin;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use secure_pin::Pin;
pub use time::{FixedTimeSource, SystemTimeSource, TimeSource};
