//! # Domain Module
//!
//! Core domain types for the Credential Store.

pub mod entities;
pub mod errors;
pub mod pin_policy;

pub use entities::*;
pub use errors::*;
pub use pin_policy::*;
