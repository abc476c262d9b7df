//! Input normalization.
//!
//! [`mk_bits`] turns the shapes a cue arrives in into a [`BitStream`]
//! positioned at bit 0:
//!
//! 1. An existing stream is passed through untouched.
//! 2. Text or bytes are tried as standard, padded base64.
//! 3. Otherwise bytes are wrapped as they are, and text is parsed as a
//!    `0x` (hex), `0o` (octal) or `0b` (binary) bit literal.
//!
//! Hex text whose length is a multiple of four is also valid base64 and takes
//! the base64 path. Disable it with [`MkBitsOptions::base64`] when the input
//! is known to be hex.

use anyhow::{Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use log::debug;

use crate::utils::bitstream_io::BitStream;
use crate::utils::errors::SourceError;

/// Input accepted by [`mk_bits`].
#[derive(Debug)]
pub enum BitSource {
    Stream(BitStream),
    Text(String),
    Bytes(Vec<u8>),
}

impl From<BitStream> for BitSource {
    fn from(value: BitStream) -> Self {
        BitSource::Stream(value)
    }
}

impl From<&str> for BitSource {
    fn from(value: &str) -> Self {
        BitSource::Text(value.to_string())
    }
}

impl From<String> for BitSource {
    fn from(value: String) -> Self {
        BitSource::Text(value)
    }
}

impl From<&[u8]> for BitSource {
    fn from(value: &[u8]) -> Self {
        BitSource::Bytes(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for BitSource {
    fn from(value: &[u8; N]) -> Self {
        BitSource::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for BitSource {
    fn from(value: Vec<u8>) -> Self {
        BitSource::Bytes(value)
    }
}

/// Which decoding paths [`mk_bits_with`] may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MkBitsOptions {
    base64: bool,
    literals: bool,
}

impl Default for MkBitsOptions {
    fn default() -> Self {
        Self {
            base64: true,
            literals: true,
        }
    }
}

impl MkBitsOptions {
    /// Try base64 before anything else (default `true`).
    pub fn base64(mut self, enabled: bool) -> Self {
        self.base64 = enabled;
        self
    }

    /// Accept `0x`/`0o`/`0b` literals for text input (default `true`).
    pub fn literals(mut self, enabled: bool) -> Self {
        self.literals = enabled;
        self
    }
}

/// Normalizes `source` into a [`BitStream`] using the default options.
pub fn mk_bits<S: Into<BitSource>>(source: S) -> Result<BitStream> {
    mk_bits_with(source, MkBitsOptions::default())
}

/// Normalizes `source` into a [`BitStream`].
///
/// Fails only for text that is neither base64 nor an accepted bit literal.
pub fn mk_bits_with<S: Into<BitSource>>(source: S, options: MkBitsOptions) -> Result<BitStream> {
    match source.into() {
        BitSource::Stream(stream) => Ok(stream),
        BitSource::Text(text) => {
            if options.base64 {
                match B64.decode(text.trim()) {
                    Ok(bytes) => return Ok(BitStream::from_vec(bytes)),
                    Err(e) => debug!("mk_bits: text is not base64 ({e})"),
                }
            }

            if !options.literals {
                bail!(SourceError::Unrecognized);
            }

            parse_literal(&text)
        }
        BitSource::Bytes(bytes) => {
            if options.base64 {
                match B64.decode(bytes.trim_ascii()) {
                    Ok(decoded) => return Ok(BitStream::from_vec(decoded)),
                    Err(e) => debug!("mk_bits: bytes are not base64 ({e}), using them raw"),
                }
            }

            Ok(BitStream::from_vec(bytes))
        }
    }
}

fn parse_literal(literal: &str) -> Result<BitStream> {
    let invalid = |reason: String| SourceError::InvalidBitLiteral {
        literal: literal.to_string(),
        reason,
    };

    let cleaned: String = literal
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect();

    if let Some(digits) = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        let len_bits = digits.len() as u64 * 4;
        let mut digits = digits.to_string();
        if digits.len() % 2 == 1 {
            digits.push('0');
        }

        let bytes = hex::decode(&digits).map_err(|e| invalid(e.to_string()))?;
        return Ok(BitStream::from_vec_with_len_bits(bytes, len_bits));
    }

    if let Some(digits) = cleaned
        .strip_prefix("0o")
        .or_else(|| cleaned.strip_prefix("0O"))
    {
        let len_bits = digits.len() * 3;
        let mut bytes = vec![0u8; len_bits.div_ceil(8)];
        for (i, c) in digits.chars().enumerate() {
            let Some(digit) = c.to_digit(8) else {
                bail!(invalid(format!("invalid octal digit {c:?}")));
            };
            for bit in 0..3 {
                if digit & (4 >> bit) != 0 {
                    let pos = i * 3 + bit;
                    bytes[pos >> 3] |= 0x80 >> (pos & 7);
                }
            }
        }

        return Ok(BitStream::from_vec_with_len_bits(bytes, len_bits as u64));
    }

    if let Some(digits) = cleaned
        .strip_prefix("0b")
        .or_else(|| cleaned.strip_prefix("0B"))
    {
        let mut bytes = vec![0u8; digits.len().div_ceil(8)];
        for (i, c) in digits.chars().enumerate() {
            match c {
                '0' => {}
                '1' => bytes[i >> 3] |= 0x80 >> (i & 7),
                _ => bail!(invalid(format!("invalid binary digit {c:?}"))),
            }
        }

        return Ok(BitStream::from_vec_with_len_bits(
            bytes,
            digits.len() as u64,
        ));
    }

    bail!(invalid("expected a 0x, 0o or 0b prefix".to_string()))
}
