use thiserror::Error;

/// Decode-level failures shared by both telemetry pipelines.
///
/// None of these are fatal: a bad frame or block is dropped and the
/// decoder keeps going. They exist so the drop sites can log a precise
/// diagnostic instead of a bare counter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("frame checksum mismatch: computed 0x{computed:02X}, stored 0x{stored:02X}")]
    ChecksumMismatch { computed: u8, stored: u8 },

    #[error("payload length mismatch: got {actual} bytes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}
