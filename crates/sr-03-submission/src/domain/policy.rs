//! # New-PIN Policy
//!
//! Rules shared by forced rotation and voluntary change. Checks run in a
//! fixed order and the first failure is reported.

use super::errors::PolicyViolation;
use shared_types::Pin;
use sr_01_credentials::is_temporary;

/// Validate a proposed PIN.
///
/// `current` is the PIN being replaced and is only supplied for voluntary
/// changes, where reusing it is rejected.
pub fn check_new_pin(
    new_pin: &Pin,
    confirm_pin: &Pin,
    current: Option<&Pin>,
    min_length: usize,
) -> Result<(), PolicyViolation> {
    if new_pin.is_empty() || confirm_pin.is_empty() {
        return Err(PolicyViolation::MissingPin);
    }
    if new_pin.char_len() < min_length {
        return Err(PolicyViolation::TooShort(min_length));
    }
    if new_pin != confirm_pin {
        return Err(PolicyViolation::Mismatch);
    }
    if is_temporary(new_pin) {
        return Err(PolicyViolation::ReservedPrefix);
    }
    if current.is_some_and(|current| current == new_pin) {
        return Err(PolicyViolation::SameAsCurrent);
    }
    Ok(())
}
