//! Best-effort decoding of integers that pack ASCII text.
//!
//! Identifier fields such as segmentation UPIDs are often carried as raw
//! integers whose hex digits spell out a string. Decoding never fails: when
//! the digits do not form valid UTF-8 the integer is handed back unchanged.

use std::fmt::{Display, Formatter};

use log::debug;
use num_bigint::BigUint;

/// Result of [`hex_decode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The integer's hex digits decoded to valid UTF-8 text.
    Decoded(String),
    /// Decoding failed and the original value is returned as is.
    Unchanged(BigUint),
}

impl DecodeOutcome {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DecodeOutcome::Decoded(text) => Some(text),
            DecodeOutcome::Unchanged(_) => None,
        }
    }

    pub fn is_decoded(&self) -> bool {
        matches!(self, DecodeOutcome::Decoded(_))
    }
}

impl Display for DecodeOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeOutcome::Decoded(text) => f.write_str(text),
            DecodeOutcome::Unchanged(value) => write!(f, "{value}"),
        }
    }
}

/// Renders `value` as hex, reads the digit pairs as bytes and decodes them
/// as UTF-8.
///
/// The hex form carries no leading zeros, so a value with an odd number of
/// hex digits (including zero itself) cannot be decoded.
pub fn hex_decode<V: Into<BigUint>>(value: V) -> DecodeOutcome {
    let value = value.into();
    let digits = format!("{value:x}");

    let bytes = match hex::decode(&digits) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("hex_decode(0x{digits}): {e}, keeping integer");
            return DecodeOutcome::Unchanged(value);
        }
    };

    match String::from_utf8(bytes) {
        Ok(text) => DecodeOutcome::Decoded(text),
        Err(e) => {
            debug!("hex_decode(0x{digits}): {e}, keeping integer");
            DecodeOutcome::Unchanged(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::bits::btoi;

    #[test]
    fn decodes_ascii() {
        for text in ["SIGNAL", "abc", "~ ok!", "EP012345678901"] {
            let value = btoi(text.as_bytes());
            assert_eq!(hex_decode(value), DecodeOutcome::Decoded(text.to_string()));
        }

        assert_eq!(hex_decode(0x4869u16).as_text(), Some("Hi"));
    }

    #[test]
    fn decodes_identifiers_wider_than_128_bits() {
        for text in [
            "EP012345678901234",
            "urn:uuid:f81d4fae-7dec-11d0-a765-00a0c91e6bf6",
            "ADS-0000000000000000000000000000001",
        ] {
            assert!(text.len() > 16);
            let value = btoi(text.as_bytes());
            assert_eq!(hex_decode(value).as_text(), Some(text));
        }
    }

    #[test]
    fn decodes_multibyte_utf8() {
        // "é"
        assert_eq!(hex_decode(0xC3A9u16).as_text(), Some("é"));
    }

    #[test]
    fn odd_digit_count_is_unchanged() {
        assert_eq!(
            hex_decode(0x123u16),
            DecodeOutcome::Unchanged(BigUint::from(0x123u16))
        );
        assert_eq!(
            hex_decode(0u8),
            DecodeOutcome::Unchanged(BigUint::from(0u8))
        );
        // A leading control byte below 0x10 loses its high zero nibble.
        assert_eq!(
            hex_decode(0x0941u16),
            DecodeOutcome::Unchanged(BigUint::from(0x941u16))
        );

        let mut wide = vec![0x09];
        wide.extend_from_slice(b"EP012345678901234");
        let value = btoi(&wide);
        assert_eq!(hex_decode(value.clone()), DecodeOutcome::Unchanged(value));
    }

    #[test]
    fn invalid_utf8_is_unchanged() {
        let outcome = hex_decode(0xFFFEu16);
        assert!(!outcome.is_decoded());
        assert_eq!(outcome, DecodeOutcome::Unchanged(BigUint::from(0xFFFEu16)));
        assert_eq!(outcome.as_text(), None);
    }

    #[test]
    fn display() {
        assert_eq!(hex_decode(0x4869u16).to_string(), "Hi");
        assert_eq!(hex_decode(0xFFFEu16).to_string(), "65534");
    }
}
