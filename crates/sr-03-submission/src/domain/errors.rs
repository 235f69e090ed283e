//! # Domain Errors

use thiserror::Error;

/// New-PIN policy violations, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum PolicyViolation {
    /// New PIN or its confirmation is empty.
    #[error("enter the new PIN in both fields")]
    MissingPin,

    /// New PIN is shorter than the configured minimum.
    #[error("PIN must be at least {0} characters")]
    TooShort(usize),

    /// New PIN and confirmation differ.
    #[error("PINs do not match")]
    Mismatch,

    /// New PIN starts with the temporary prefix.
    #[error("PIN cannot start with 'z' (reserved for temporary PINs)")]
    ReservedPrefix,

    /// Voluntary change to the PIN already in use.
    #[error("new PIN must be different from current PIN")]
    SameAsCurrent,

    /// Submission attempted while a temporary PIN awaits rotation.
    #[error("temporary PIN must be changed before submitting")]
    RotationPending,
}

impl PolicyViolation {
    /// Stable label for metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyViolation::MissingPin => "missing_pin",
            PolicyViolation::TooShort(_) => "too_short",
            PolicyViolation::Mismatch => "mismatch",
            PolicyViolation::ReservedPrefix => "reserved_prefix",
            PolicyViolation::SameAsCurrent => "same_as_current",
            PolicyViolation::RotationPending => "rotation_pending",
        }
    }
}

/// Workflow error types. None of them ends the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Handle/PIN pair did not verify.
    #[error("invalid handle or PIN")]
    InvalidCredential,

    /// A required field is blank.
    #[error("{field} is required")]
    Validation {
        /// Name of the first blank field.
        field: &'static str,
    },

    /// A write failed; carries the store's message.
    #[error("storage error: {0}")]
    Storage(String),

    /// New-PIN policy or pending rotation.
    #[error("{0}")]
    Policy(#[from] PolicyViolation),

    /// Event not accepted in the current phase.
    #[error("{event} not allowed while {phase}")]
    InvalidTransition {
        /// Event name.
        event: &'static str,
        /// Phase name.
        phase: &'static str,
    },
}

impl WorkflowError {
    /// Stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::InvalidCredential => "invalid_credential",
            WorkflowError::Validation { .. } => "validation",
            WorkflowError::Storage(_) => "storage",
            WorkflowError::Policy(_) => "policy",
            WorkflowError::InvalidTransition { .. } => "invalid_transition",
        }
    }
}
