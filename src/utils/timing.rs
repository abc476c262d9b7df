//! 90 kHz clock formatting.
//!
//! PTS values, splice times and break durations are counted in ticks of the
//! 90 kHz MPEG system clock.

use num_bigint::BigUint;
use num_traits::ToPrimitive;

/// Ticks per second of the MPEG presentation clock.
pub const CLOCK_90K: f64 = 90_000.0;

/// Numeric types that can be read as a 90 kHz tick count.
pub trait Ticks {
    fn as_ticks(self) -> f64;
}

macro_rules! impl_ticks {
    ($($t:ty),+) => { $(
        impl Ticks for $t { #[inline] fn as_ticks(self) -> f64 { self as f64 } }
    )+ }
}

impl_ticks!(u8, i8, u16, i16, u32, i32, u64, i64, u128, i128, usize, isize, f32, f64);

impl Ticks for &BigUint {
    fn as_ticks(self) -> f64 {
        self.to_f64().unwrap_or(f64::INFINITY)
    }
}

impl Ticks for BigUint {
    fn as_ticks(self) -> f64 {
        (&self).as_ticks()
    }
}

/// Formats a tick count as seconds with six decimal places.
pub fn time_90k<T: Ticks>(ticks: T) -> String {
    let seconds = ticks.as_ticks() / CLOCK_90K;
    format!("{seconds:.6}")
}

#[cfg(test)]
use crate::utils::bits::{bitslice, btoi};

#[test]
fn format_90k() {
    assert_eq!(time_90k(0u32), "0.000000");
    assert_eq!(time_90k(90_000u32), "1.000000");
    assert_eq!(time_90k(45_000u64), "0.500000");
    assert_eq!(time_90k(1u8), "0.000011");
    assert_eq!(time_90k(2_700_000i64), "30.000000");
    assert_eq!(time_90k(-90_000i32), "-1.000000");
    assert_eq!(time_90k(135_000.0f64), "1.500000");
    // 33-bit PTS ceiling
    assert_eq!(time_90k(0x1_FFFF_FFFFu64), "95443.717678");
}

#[test]
fn format_extracted_fields() -> anyhow::Result<()> {
    // time_specified_flag, 6 reserved bits, then a 33-bit pts_time
    let splice_time = [0xFEu8, 0x00, 0x7B, 0x98, 0xA0];
    let pts = bitslice(&splice_time, 32, 33)?;
    assert_eq!(pts, 8_100_000);
    assert_eq!(time_90k(pts), "90.000000");

    assert_eq!(time_90k(bitslice(0x1_FFFF_FFFFu64, 32, 33)?), "95443.717678");
    assert_eq!(time_90k(-2_700_000i128), "-30.000000");

    assert_eq!(time_90k(btoi(&splice_time[1..])), "90.000000");
    let wide = btoi(&splice_time[1..]);
    assert_eq!(time_90k(&wide), "90.000000");

    Ok(())
}
