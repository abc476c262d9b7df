#![doc = include_str!("../README.md")]
//!
//! ## Technical Overview
//!
//! Cue payloads reach a parser in several shapes: base64 text from a
//! manifest, `0x`-prefixed hex from a log line, or raw section bytes lifted
//! out of a transport stream. [`mk_bits`] folds all of them into a single
//! [`BitStream`] that is read field by field with
//! [`get_n`](utils::bitstream_io::BitstreamIoReader::get_n) and
//! [`reserved`].
//!
//! Fields are big-endian and bit-packed. [`bitslice`] pulls a field out of an
//! integer or byte buffer without a reader, using the
//! `(value >> (bit_idx + 1 - num_bits)) & mask` convention.
//!
//! Timing fields count ticks of the 90 kHz MPEG system clock; [`time_90k`]
//! renders them as seconds.
//!
//! ## Quick Start
//!
//! ```rust
//! use cuebits::{mk_bits, reserved, time_90k};
//!
//! let mut bits = mk_bits("/DAWAAAAAAAAAP/wBQb+AAAAAAAAAAA=")?;
//!
//! let table_id: u8 = bits.get_n(8)?;
//! assert_eq!(table_id, 0xFC);
//!
//! let _section_syntax_indicator = bits.get()?;
//! let _private_indicator = bits.get()?;
//! reserved(&mut bits, 2)?;
//! let section_length: u16 = bits.get_n(12)?;
//! assert_eq!(section_length, 0x16);
//!
//! assert_eq!(time_90k(8_100_000u64), "90.000000");
//! # Ok::<(), anyhow::Error>(())
//! ```

// Lets `#[derive(DebugFields)]` resolve `::cuebits` inside this crate.
extern crate self as cuebits;

/// Bit-level utilities.
///
/// - **Bitstream I/O** ([`utils::bitstream_io`]): Bounds-checked bit reader
/// - **Bits** ([`utils::bits`]): Integer conversion and bit slicing
/// - **Source** ([`utils::source`]): Input normalization
/// - **Text** ([`utils::text`]): Hex-packed text decoding
/// - **Timing** ([`utils::timing`]): 90 kHz clock formatting
/// - **Debug Fields** ([`utils::debug_fields`]): Field dumps
/// - **Error Handling** ([`utils::errors`]): Error types
pub mod utils;

pub use cuebits_macros::DebugFields;
pub use utils::bits::{SliceSource, bitslice, btoi, btoi_values, coerce_bytes};
pub use utils::bitstream_io::{BitStream, BsIoSliceReader, reserved};
pub use utils::debug_fields::{DebugFields, kv_print, kv_print_stdout};
pub use utils::source::{BitSource, MkBitsOptions, mk_bits, mk_bits_with};
pub use utils::text::{DecodeOutcome, hex_decode};
pub use utils::timing::{CLOCK_90K, Ticks, time_90k};
