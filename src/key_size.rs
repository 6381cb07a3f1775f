use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

pub const MIN_KEY_SIZE: u32 = 2048;
pub const MAX_KEY_SIZE: u32 = 4096;
pub const DEFAULT_KEY_SIZE: u32 = MIN_KEY_SIZE;

const ACCEPTED_KEY_SIZES: RangeInclusive<i64> = (MIN_KEY_SIZE as i64)..=(MAX_KEY_SIZE as i64);

#[derive(Error, Debug, PartialEq)]
#[error(
    "invalid key size: `{0}`. Key size must be between {min} and {max} bits",
    min = MIN_KEY_SIZE,
    max = MAX_KEY_SIZE
)]
pub struct KeySizeError(pub String);

/// RSA modulus size in bits, always within the accepted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeySize(u32);

impl KeySize {
    /// Parses a base-10 key size and checks it against the accepted range.
    pub fn validate(size_text: &str) -> Result<Self, KeySizeError> {
        let bits = i64::from_str(size_text).map_err(|_| KeySizeError(size_text.to_string()))?;
        if !ACCEPTED_KEY_SIZES.contains(&bits) {
            return Err(KeySizeError(size_text.to_string()));
        }
        Ok(Self(bits as u32))
    }

    pub fn bits(&self) -> usize {
        self.0 as usize
    }
}

impl Default for KeySize {
    fn default() -> Self {
        Self(DEFAULT_KEY_SIZE)
    }
}

impl FromStr for KeySize {
    type Err = KeySizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::validate(s)
    }
}

impl fmt::Display for KeySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("2048", 2048)]
    #[case("3000", 3000)]
    #[case("3072", 3072)]
    #[case("4096", 4096)]
    #[case("+2048", 2048)]
    fn test_accepted_sizes(#[case] size_text: &str, #[case] expected: usize) {
        assert_eq!(KeySize::validate(size_text).unwrap().bits(), expected);
    }

    #[rstest]
    #[case::below_min("2047")]
    #[case::above_max("4097")]
    #[case::negative("-2048")]
    #[case::zero("0")]
    #[case::not_a_number("abc")]
    #[case::empty("")]
    #[case::decimal("2048.0")]
    #[case::whitespace(" 2048")]
    #[case::overflow("99999999999999999999999")]
    fn test_rejected_sizes(#[case] size_text: &str) {
        assert_matches!(KeySize::validate(size_text), Err(KeySizeError(text)) => {
            assert_eq!(text, size_text);
        });
    }

    #[test]
    fn test_default_key_size() {
        assert_eq!(KeySize::default().bits(), 2048);
        assert_eq!(
            KeySizeError("1".to_string()).to_string(),
            "invalid key size: `1`. Key size must be between 2048 and 4096 bits"
        );
    }
}
