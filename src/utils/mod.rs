//! Utility functions and supporting infrastructure.
//!
//! Provides bitstream I/O, bit slicing, input normalization, text decoding,
//! timestamp formatting and error handling for cue inspection.

pub mod bits;
pub mod bitstream_io;
pub mod debug_fields;
pub mod errors;
pub mod source;
pub mod text;
pub mod timing;
