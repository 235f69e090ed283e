//! # Domain Module
//!
//! Report entities, the checklist vocabulary and the ordering rule.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use value_objects::*;
