//! # CPF Module
//!
//! Validation of the Brazilian individual taxpayer identifier (CPF).
//!
//! ## Check Digit Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CPF 945.086.080-78                                                     │
//! │                                                                         │
//! │  Base digits:   9   4   5   0   8   6   0   8   0                      │
//! │  Weights:      10   9   8   7   6   5   4   3   2                      │
//! │  Products:     90  36  40   0  48  30   0  24   0   → sum 268          │
//! │  268 % 11 = 4  → 4 >= 2 → first digit = 11 - 4 = 7                     │
//! │                                                                         │
//! │  Append 7, weights 11..2:                                               │
//! │  sum 322 → 322 % 11 = 3 → second digit = 11 - 3 = 8                     │
//! │                                                                         │
//! │  Remainder < 2 always yields digit 0                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sequences of one repeated digit (`111.111.111-11`) satisfy the checksum
//! but are not issued, so they are rejected explicitly.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::ValidationError;

/// Number of digits in a CPF.
pub const CPF_LENGTH: usize = 11;

/// Removes every non-digit character (dots, dashes, spaces, ...).
///
/// ## Example
/// ```rust
/// use cashback_core::cpf::strip_non_digits;
///
/// assert_eq!(strip_non_digits("153.509.460-56"), "15350946056");
/// ```
pub fn strip_non_digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Computes one check digit over `digits` using weights `len+1 .. 2`.
fn check_digit(digits: &[u32]) -> u32 {
    let top_weight = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top_weight - i as u32))
        .sum();

    match sum % 11 {
        m if m < 2 => 0,
        m => 11 - m,
    }
}

/// Returns true when `identifier` is a checksum-valid CPF.
///
/// ## Rules
/// - Punctuation is ignored; exactly 11 digits must remain
/// - All-identical digits are invalid
/// - Digits 10 and 11 must match the two computed check digits
///
/// ## Example
/// ```rust
/// use cashback_core::cpf::is_valid_cpf;
///
/// assert!(is_valid_cpf("945.086.080-78"));
/// assert!(is_valid_cpf("94508608078"));
/// assert!(!is_valid_cpf("111.111.111-11"));
/// assert!(!is_valid_cpf("945.086.080-7"));
/// ```
pub fn is_valid_cpf(identifier: &str) -> bool {
    let digits: Vec<u32> = identifier.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != CPF_LENGTH {
        return false;
    }

    if digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    let mut base: Vec<u32> = digits[..9].to_vec();
    let first = check_digit(&base);
    base.push(first);
    let second = check_digit(&base);

    digits[9] == first && digits[10] == second
}

// =============================================================================
// Cpf Newtype
// =============================================================================

/// A validated CPF, stored as its 11 digits.
///
/// Serializes as the bare digit string; `Display` uses the usual
/// `000.000.000-00` mask.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cpf(String);

impl Cpf {
    /// Parses and validates a CPF in any punctuation.
    ///
    /// ## Example
    /// ```rust
    /// use cashback_core::cpf::Cpf;
    ///
    /// let cpf = Cpf::parse("870.091.100-34").unwrap();
    /// assert_eq!(cpf.digits(), "87009110034");
    /// assert_eq!(cpf.to_string(), "870.091.100-34");
    /// assert!(Cpf::parse("870.091.100-35").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Cpf, ValidationError> {
        if input.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "cpf".to_string(),
            });
        }

        if !is_valid_cpf(input) {
            return Err(ValidationError::InvalidFormat {
                field: "cpf".to_string(),
                reason: "checksum digits do not match".to_string(),
            });
        }

        Ok(Cpf(strip_non_digits(input)))
    }

    /// The 11 digits without punctuation.
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// Consumes the CPF, returning its digits.
    pub fn into_digits(self) -> String {
        self.0
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.0;
        match (d.get(0..3), d.get(3..6), d.get(6..9), d.get(9..11)) {
            (Some(a), Some(b), Some(c), Some(v)) => write!(f, "{a}.{b}.{c}-{v}"),
            _ => f.write_str(d),
        }
    }
}

impl Serialize for Cpf {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Cpf {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Cpf::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worked_example() {
        let base = [9, 4, 5, 0, 8, 6, 0, 8, 0];
        let first = check_digit(&base);
        assert_eq!(first, 7);

        let mut with_first = base.to_vec();
        with_first.push(first);
        assert_eq!(check_digit(&with_first), 8);

        assert!(is_valid_cpf("945.086.080-78"));
    }

    #[test]
    fn test_known_valid_cpfs() {
        for cpf in [
            "870.091.100-34",
            "493.535.620-07",
            "499.209.910-66",
            "153.509.460-56",
            "230.505.760-14",
            "15350946056",
        ] {
            assert!(is_valid_cpf(cpf), "{cpf} should be valid");
        }
    }

    #[test]
    fn test_repeated_digits_rejected() {
        for d in 0..=9 {
            let cpf = d.to_string().repeat(11);
            assert!(!is_valid_cpf(&cpf), "{cpf} should be invalid");
        }
        assert!(!is_valid_cpf("111.111.111-11"));
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(!is_valid_cpf(""));
        assert!(!is_valid_cpf("945.086.080-7"));
        assert!(!is_valid_cpf("945.086.080-780"));
        assert!(!is_valid_cpf("abc.def.ghi-jk"));
    }

    #[test]
    fn test_wrong_check_digits_rejected() {
        assert!(!is_valid_cpf("945.086.080-79"));
        assert!(!is_valid_cpf("945.086.080-68"));
    }

    #[test]
    fn test_zero_check_digit_when_remainder_below_two() {
        // 493.535.620-07: first digit comes out of a remainder < 2
        assert_eq!(check_digit(&[4, 9, 3, 5, 3, 5, 6, 2, 0]), 0);
        assert!(is_valid_cpf("49353562007"));
    }

    #[test]
    fn test_cpf_newtype() {
        let cpf = Cpf::parse(" 153.509.460-56 ").unwrap();
        assert_eq!(cpf.digits(), "15350946056");
        assert_eq!(cpf.to_string(), "153.509.460-56");

        assert!(matches!(
            Cpf::parse(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            Cpf::parse("111.111.111-11"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_cpf_serde() {
        let cpf = Cpf::parse("870.091.100-34").unwrap();
        let json = serde_json::to_string(&cpf).unwrap();
        assert_eq!(json, "\"87009110034\"");

        let back: Cpf = serde_json::from_str("\"870.091.100-34\"").unwrap();
        assert_eq!(back, cpf);

        assert!(serde_json::from_str::<Cpf>("\"12345678900\"").is_err());
    }
}
