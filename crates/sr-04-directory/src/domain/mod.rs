//! # Domain Module

pub mod entities;
pub mod errors;
pub mod suggest;

pub use entities::*;
pub use errors::*;
pub use suggest::*;
