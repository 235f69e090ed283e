//! # Secure PIN Type
//!
//! Wrapper for operator PINs that zeroizes memory on drop.
//!
//! ## Security
//!
//! A PIN is a shared secret. It is only ever hashed, compared or forwarded to
//! the credential store; it must never appear in logs, debug output or
//! persisted rows.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A PIN that zeroizes on drop and never prints its value.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Pin {
    inner: String,
}

impl Pin {
    /// Wrap a PIN as typed by the operator.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// Expose the PIN text (use carefully!).
    ///
    /// # Security
    ///
    /// Only hashing and policy checks should call this.
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// True when nothing was entered.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Length in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.inner.chars().count()
    }
}

impl std::fmt::Debug for Pin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the actual PIN
        f.write_str("Pin(***)")
    }
}

impl From<&str> for Pin {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Pin {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_debug_hides_value() {
        let pin = Pin::new("7412");
        let debug_str = format!("{:?}", pin);
        assert!(!debug_str.contains("7412"));
        assert!(debug_str.contains("***"));
    }

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(Pin::new("ñ123").char_len(), 4);
        assert_eq!(Pin::new("").char_len(), 0);
    }

    #[test]
    fn test_empty_pin() {
        assert!(Pin::default().is_empty());
        assert!(!Pin::from("z1").is_empty());
    }

    #[test]
    fn test_equality_compares_contents() {
        assert_eq!(Pin::from("1234"), Pin::from(String::from("1234")));
        assert_ne!(Pin::from("1234"), Pin::from("1235"));
    }
}
