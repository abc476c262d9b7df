//! Integer conversion and bit-field extraction.
//!
//! Values are big-endian throughout. Bit indices count from the least
//! significant bit, so the top bit of a one-byte value is `bit_idx = 7`.

use std::borrow::Cow;

use anyhow::{Result, bail};
use num_bigint::BigUint;

use crate::utils::bitstream_io::BsIoSliceReader;
use crate::utils::errors::BitsError;

/// Widest field [`bitslice`] can return.
pub const MAX_SLICE_BITS: u32 = u128::BITS;

/// Interprets `data` as a big-endian unsigned integer of any width.
///
/// Empty input is zero.
pub fn btoi<B: AsRef<[u8]>>(data: B) -> BigUint {
    BigUint::from_bytes_be(data.as_ref())
}

/// Converts a sequence of integers to bytes, rejecting anything outside
/// `0..=255`.
pub fn coerce_bytes<I>(values: I) -> Result<Vec<u8>>
where
    I: IntoIterator,
    I::Item: Into<i64>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let value = value.into();
            u8::try_from(value)
                .map_err(|_| anyhow::Error::from(BitsError::ByteOutOfRange { index, value }))
        })
        .collect()
}

/// [`btoi`] over a sequence of integer values.
pub fn btoi_values<I>(values: I) -> Result<BigUint>
where
    I: IntoIterator,
    I::Item: Into<i64>,
{
    Ok(btoi(coerce_bytes(values)?))
}

/// Input accepted by [`bitslice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliceSource<'a> {
    /// An already converted integer up to 128 bits wide.
    Int(u128),
    /// A big-endian byte buffer of any length. Wider integers are sliced
    /// through their byte form.
    Bytes(Cow<'a, [u8]>),
}

macro_rules! impl_slice_source_int {
    ($($t:ty),+) => { $(
        impl From<$t> for SliceSource<'_> {
            #[inline]
            fn from(value: $t) -> Self { SliceSource::Int(value as u128) }
        }
    )+ }
}

impl_slice_source_int!(u8, u16, u32, u64, u128, usize);

impl<'a> From<&'a [u8]> for SliceSource<'a> {
    fn from(value: &'a [u8]) -> Self {
        SliceSource::Bytes(Cow::Borrowed(value))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for SliceSource<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        SliceSource::Bytes(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a Vec<u8>> for SliceSource<'a> {
    fn from(value: &'a Vec<u8>) -> Self {
        SliceSource::Bytes(Cow::Borrowed(value))
    }
}

impl From<Vec<u8>> for SliceSource<'_> {
    fn from(value: Vec<u8>) -> Self {
        SliceSource::Bytes(Cow::Owned(value))
    }
}

impl From<&BigUint> for SliceSource<'_> {
    fn from(value: &BigUint) -> Self {
        SliceSource::Bytes(Cow::Owned(value.to_bytes_be()))
    }
}

impl From<BigUint> for SliceSource<'_> {
    fn from(value: BigUint) -> Self {
        SliceSource::from(&value)
    }
}

#[inline(always)]
fn low_mask(num_bits: u32) -> u128 {
    if num_bits >= MAX_SLICE_BITS {
        u128::MAX
    } else {
        (1u128 << num_bits) - 1
    }
}

/// Extracts the `num_bits`-wide field whose highest bit is `bit_idx`.
///
/// Equivalent to `(value >> (bit_idx + 1 - num_bits)) & ((1 << num_bits) - 1)`
/// where byte input is read as a big-endian integer of unlimited width.
/// Bits above the width of the value read as zero.
pub fn bitslice<'a, S>(data: S, bit_idx: u32, num_bits: u32) -> Result<u128>
where
    S: Into<SliceSource<'a>>,
{
    if num_bits > MAX_SLICE_BITS {
        bail!(BitsError::FieldTooWide(num_bits));
    }

    let top = bit_idx as u64 + 1;
    if num_bits as u64 > top {
        bail!(BitsError::NegativeShift { bit_idx, num_bits });
    }

    if num_bits == 0 {
        return Ok(0);
    }

    let shift = top - num_bits as u64;

    match data.into() {
        SliceSource::Int(value) => {
            let shifted = u32::try_from(shift)
                .ok()
                .and_then(|s| value.checked_shr(s))
                .unwrap_or(0);
            Ok(shifted & low_mask(num_bits))
        }
        SliceSource::Bytes(bytes) => slice_bytes(&bytes, top, num_bits),
    }
}

fn slice_bytes(bytes: &[u8], top: u64, num_bits: u32) -> Result<u128> {
    let total_bits = (bytes.len() as u64) << 3;

    // Field bits that lie above the buffer are implicit leading zeros.
    let above = top.saturating_sub(total_bits);
    if above >= num_bits as u64 {
        return Ok(0);
    }

    let width = num_bits - above as u32;
    let start = total_bits - (top - above);

    let mut reader = BsIoSliceReader::from_slice(bytes);
    reader.seek(start as i64)?;

    Ok(reader.get_n::<u128>(width)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(v: u128, bit_idx: u32, num_bits: u32) -> u128 {
        (v >> (bit_idx + 1 - num_bits)) & ((1u128 << num_bits) - 1)
    }

    fn big(v: u128) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn btoi_is_big_endian() {
        assert_eq!(btoi(b""), big(0));
        assert_eq!(btoi([0x01u8]), big(1));
        assert_eq!(btoi([0x01u8, 0x00]), big(256));
        assert_eq!(btoi(vec![0xFCu8, 0x30, 0x11]), big(0xFC3011));
        assert_eq!(btoi([0xFFu8; 16]), big(u128::MAX));
    }

    #[test]
    fn btoi_ignores_leading_zeros() {
        let mut data = vec![0u8; 20];
        data.push(0x42);
        assert_eq!(btoi(&data), big(0x42));
        assert_eq!(btoi([0u8; 32]), big(0));
    }

    #[test]
    fn btoi_has_no_width_limit() {
        let cue: [u8; 18] = [
            0xFC, 0x30, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xF0, 0x00, 0x00,
            0x00, 0x00, 0x7A, 0x4F,
        ];
        let v = btoi(cue);
        assert_eq!(v.bits(), 18 * 8);
        assert_eq!(v.to_bytes_be(), cue.to_vec());
        assert_eq!(v >> 128u32, big(0xFC30));

        let upid = btoi(b"EP012345678901234");
        assert_eq!(upid.to_bytes_be(), b"EP012345678901234".to_vec());
    }

    #[test]
    fn coerce_values() -> Result<()> {
        assert_eq!(coerce_bytes([0u16, 127, 255])?, vec![0, 127, 255]);
        assert_eq!(btoi_values([1i32, 0])?, big(256));

        let err = coerce_bytes([1i32, 2, 256]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<BitsError>(),
            Some(&BitsError::ByteOutOfRange {
                index: 2,
                value: 256
            })
        );
        assert!(btoi_values([-1i32]).is_err());

        Ok(())
    }

    #[test]
    fn bitslice_matches_shift_and_mask() -> Result<()> {
        let values = [0u128, 1, 0xFC30_1100_0000, 0xDEAD_BEEF_CAFE_F00D, u128::MAX];
        for v in values {
            for bit_idx in [0u32, 7, 12, 31, 63, 100, 126] {
                for num_bits in [1u32, 4, 8, 12, 33] {
                    if num_bits > bit_idx + 1 {
                        continue;
                    }
                    assert_eq!(
                        bitslice(v, bit_idx, num_bits)?,
                        reference(v, bit_idx, num_bits)
                    );
                }
            }
        }

        Ok(())
    }

    #[test]
    fn bitslice_full_width_is_identity() -> Result<()> {
        assert_eq!(bitslice(0xABu8, 7, 8)?, 0xAB);
        assert_eq!(bitslice(0x1234_5678u32, 31, 32)?, 0x1234_5678);
        assert_eq!(bitslice(u128::MAX - 7, 127, 128)?, u128::MAX - 7);

        Ok(())
    }

    #[test]
    fn bitslice_zero_bits() -> Result<()> {
        assert_eq!(bitslice(0xFFu8, 3, 0)?, 0);
        assert_eq!(bitslice(&[0xFFu8], 0, 0)?, 0);

        Ok(())
    }

    #[test]
    fn bitslice_bytes_equals_integer() -> Result<()> {
        let data = [0xFC, 0x30, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let v = u128::from_be_bytes({
            let mut wide = [0u8; 16];
            wide[6..].copy_from_slice(&data);
            wide
        });
        let big_v = btoi(data);

        for bit_idx in 0..80u32 {
            for num_bits in 1..=(bit_idx + 1).min(40) {
                let expected = bitslice(v, bit_idx, num_bits)?;
                assert_eq!(bitslice(&data, bit_idx, num_bits)?, expected);
                assert_eq!(bitslice(&big_v, bit_idx, num_bits)?, expected);
            }
        }

        // table_id, section_syntax_indicator and section_length of the header
        assert_eq!(bitslice(&data, 79, 8)?, 0xFC);
        assert_eq!(bitslice(&data, 71, 1)?, 0);
        assert_eq!(bitslice(&data, 67, 12)?, 0x011);

        Ok(())
    }

    #[test]
    fn bitslice_past_value_width_reads_zero() -> Result<()> {
        assert_eq!(bitslice(&[0xABu8], 11, 8)?, 0x0A);
        assert_eq!(bitslice(&[0xABu8], 200, 8)?, 0);
        assert_eq!(bitslice(0xABu8, 11, 8)?, 0x0A);
        assert_eq!(bitslice(0xABu8, 300, 8)?, 0);
        assert_eq!(bitslice(Vec::<u8>::new(), 7, 8)?, 0);

        Ok(())
    }

    #[test]
    fn bitslice_wider_than_u128_buffer() -> Result<()> {
        let mut data = vec![0xA5];
        data.extend_from_slice(&[0u8; 20]);

        assert_eq!(bitslice(&data, 167, 8)?, 0xA5);
        assert_eq!(bitslice(&data, 167, 4)?, 0xA);

        let v = btoi(&data);
        assert_eq!(bitslice(&v, 167, 8)?, 0xA5);
        assert_eq!(bitslice(v, 170, 8)?, 0x14);

        Ok(())
    }

    #[test]
    fn bitslice_rejects_negative_shift() {
        let err = bitslice(0xFFu8, 2, 4).unwrap_err();
        assert_eq!(
            err.downcast_ref::<BitsError>(),
            Some(&BitsError::NegativeShift {
                bit_idx: 2,
                num_bits: 4
            })
        );
        assert_eq!(
            err.to_string(),
            "num_bits (4) exceeds bit_idx (2) + 1: negative shift"
        );
    }

    #[test]
    fn bitslice_rejects_wide_fields() {
        let err = bitslice(&[0u8; 32], 200, 129).unwrap_err();
        assert_eq!(
            err.downcast_ref::<BitsError>(),
            Some(&BitsError::FieldTooWide(129))
        );
    }
}
