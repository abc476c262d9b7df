#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum BitsError {
    #[error("Value at index {index} is not a byte: {value} is outside 0..=255")]
    ByteOutOfRange { index: usize, value: i64 },

    #[error("num_bits ({num_bits}) exceeds bit_idx ({bit_idx}) + 1: negative shift")]
    NegativeShift { bit_idx: u32, num_bits: u32 },

    #[error("Bit field must be at most 128 bits wide. Got {0}")]
    FieldTooWide(u32),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SourceError {
    #[error("Invalid bit literal {literal:?}: {reason}")]
    InvalidBitLiteral { literal: String, reason: String },

    #[error("Input is neither base64 nor an accepted bit literal")]
    Unrecognized,
}
