//! # Service Container
//!
//! Central container holding the subsystem services wired to one store.

pub mod config;
pub mod services;

pub use config::{ConfigError, RuntimeConfig};
pub use services::{
    ConcreteCredentialService, ConcreteDirectoryService, ConcreteReportService,
    ConcreteWorkflow, StatrepContainer,
};
