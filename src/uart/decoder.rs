/// UART frame synchronization and GY-MCU680 field decoding
use log::trace;

use crate::errors::DecodeError;
use crate::models::EnvironmentalReading;

// GY-MCU680 protocol constants
pub const FRAME_HEADER: u8 = 0x5A; // Both sync bytes carry this value
pub const FRAME_LEN: usize = 20;

/// Synchronization state of the frame decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncState {
    SeekHeader1,
    SeekHeader2,
    Accumulating,
}

/// Incremental decoder for the GY-MCU680 UART byte stream.
///
/// Owns the frame buffer and resynchronization state, so several decoder
/// instances can coexist and be driven with synthetic byte sequences in
/// tests. Bytes are offered one chunk at a time; the decoder never blocks
/// and resumes exactly where it left off across calls.
pub struct FrameDecoder {
    buf: [u8; FRAME_LEN],
    fill: usize,
    state: SyncState,
}

impl FrameDecoder {
    pub fn new() -> Self {
        FrameDecoder {
            buf: [0; FRAME_LEN],
            fill: 0,
            state: SyncState::SeekHeader1,
        }
    }

    /// Advance the state machine by one byte.
    ///
    /// Returns a complete 20-byte candidate frame exactly when its last
    /// byte arrives. A returned frame is only structurally complete; the
    /// caller still has to validate the checksum.
    pub fn push(&mut self, byte: u8) -> Option<[u8; FRAME_LEN]> {
        match self.state {
            SyncState::SeekHeader1 => {
                if byte == FRAME_HEADER {
                    self.buf[0] = byte;
                    self.fill = 1;
                    self.state = SyncState::SeekHeader2;
                } else {
                    trace!("Discarding byte 0x{:02X} while seeking frame header", byte);
                }
                None
            }
            SyncState::SeekHeader2 => {
                if byte == FRAME_HEADER {
                    self.buf[1] = byte;
                    self.fill = 2;
                    self.state = SyncState::Accumulating;
                } else {
                    // The mismatched byte is dropped outright instead of
                    // being re-tested as a first header candidate, so resync
                    // can arrive one byte late on adversarial streams.
                    trace!("Second header byte 0x{:02X} invalid, reseeking", byte);
                    self.fill = 0;
                    self.state = SyncState::SeekHeader1;
                }
                None
            }
            SyncState::Accumulating => {
                self.buf[self.fill] = byte;
                self.fill += 1;
                if self.fill == FRAME_LEN {
                    self.fill = 0;
                    self.state = SyncState::SeekHeader1;
                    return Some(self.buf);
                }
                None
            }
        }
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate the arithmetic checksum of a complete frame.
///
/// The checksum is the sum (mod 256) of bytes 0-18, stored in byte 19.
pub fn validate_checksum(frame: &[u8; FRAME_LEN]) -> Result<(), DecodeError> {
    let computed = frame[..FRAME_LEN - 1]
        .iter()
        .fold(0u8, |sum, b| sum.wrapping_add(*b));
    let stored = frame[FRAME_LEN - 1];
    if computed == stored {
        Ok(())
    } else {
        Err(DecodeError::ChecksumMismatch { computed, stored })
    }
}

/// Decode a checksum-validated GY-MCU680 frame into physical quantities.
///
/// Frame layout (all multi-byte fields big-endian):
/// - Bytes 0-1: Header (0x5A 0x5A)
/// - Bytes 2-3: Reserved
/// - Bytes 4-5: Temperature (signed 16-bit, 0.01 °C resolution)
/// - Bytes 6-7: Relative humidity (unsigned 16-bit, 0.01 % resolution)
/// - Bytes 8-10: Barometric pressure (24-bit unsigned, Pa)
/// - Byte 11: IAQ accuracy (top nibble) and IAQ bits 8-11 (bottom nibble)
/// - Byte 12: IAQ bits 0-7
/// - Bytes 13-16: Gas resistance (32-bit unsigned, Ohm)
/// - Bytes 17-18: Altitude (signed 16-bit, meters)
/// - Byte 19: Checksum
///
/// `altitude_correction_pa` is added to the raw pressure to produce the
/// altitude-corrected variant.
pub fn decode_frame(frame: &[u8; FRAME_LEN], altitude_correction_pa: i32) -> EnvironmentalReading {
    let temperature = i16::from_be_bytes([frame[4], frame[5]]) as f32 / 100.0;
    let humidity = u16::from_be_bytes([frame[6], frame[7]]) as f32 / 100.0;

    // 24-bit pressure arrives in Pa, reported in hPa
    let pressure_pa = ((frame[8] as u32) << 16) | ((frame[9] as u32) << 8) | frame[10] as u32;
    let pressure = pressure_pa as f32 / 100.0;
    let altitude_pressure = pressure + altitude_correction_pa as f32 / 100.0;

    let iaq_accuracy = (frame[11] & 0xF0) >> 4;
    let iaq = (((frame[11] & 0x0F) as u16) << 8) | frame[12] as u16;

    let gas = u32::from_be_bytes([frame[13], frame[14], frame[15], frame[16]]);
    let altitude = i16::from_be_bytes([frame[17], frame[18]]);

    EnvironmentalReading {
        temperature,
        humidity,
        pressure,
        altitude_pressure,
        iaq,
        iaq_accuracy,
        gas,
        altitude,
    }
}
