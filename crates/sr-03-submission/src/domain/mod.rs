//! # Domain Module
//!
//! Session value, events, effects and the new-PIN policy.

pub mod errors;
pub mod events;
pub mod policy;
pub mod session;

pub use errors::*;
pub use events::*;
pub use policy::*;
pub use session::*;
