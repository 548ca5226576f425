/// Outdoor station payload decoding and snapshot bookkeeping
use log::{debug, warn};

use crate::errors::DecodeError;
use crate::freshness::{Snapshot, SnapshotSlot};
use crate::models::OutdoorReading;
use crate::utils::{format_raw_bytes, monotonic_millis};

/// Number of float values carried per outdoor message.
pub const OUTDOOR_VALUES_COUNT: usize = 5;
/// Exact payload size the outdoor station transmits.
pub const OUTDOOR_PAYLOAD_LEN: usize = OUTDOOR_VALUES_COUNT * 4;

/// Decode one outdoor payload block.
///
/// The wireless transport guarantees message boundaries, so no
/// resynchronization happens here: the block either has the exact
/// expected length or is rejected wholesale, with no partial extraction.
/// The payload is five consecutive little-endian IEEE-754 floats in
/// fixed order:
/// - Temperature [°C]
/// - Relative humidity [%]
/// - Pressure [hPa]
/// - Battery voltage [V]
/// - Battery percentage [%]
pub fn decode_outdoor_payload(data: &[u8]) -> Result<OutdoorReading, DecodeError> {
    if data.len() != OUTDOOR_PAYLOAD_LEN {
        return Err(DecodeError::LengthMismatch {
            expected: OUTDOOR_PAYLOAD_LEN,
            actual: data.len(),
        });
    }

    let mut fields = [0.0f32; OUTDOOR_VALUES_COUNT];
    for (i, chunk) in data.chunks_exact(4).enumerate() {
        fields[i] = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    Ok(OutdoorReading {
        temperature: fields[0],
        humidity: fields[1],
        pressure: fields[2],
        battery_voltage: fields[3],
        battery_percentage: fields[4],
    })
}

/// Owns the latest outdoor snapshot delivered over the wireless link.
pub struct OutdoorReceiver {
    slot: SnapshotSlot<OutdoorReading>,
}

impl OutdoorReceiver {
    pub fn new() -> Self {
        OutdoorReceiver {
            slot: SnapshotSlot::new(),
        }
    }

    /// Submit one delivered message block.
    ///
    /// A decoded reading is stored valid unconditionally: the remote unit
    /// is trusted and no range classification runs on this path, unlike
    /// the indoor pipeline. Returns whether a reading was stored.
    pub fn submit(&mut self, block: &[u8]) -> bool {
        match decode_outdoor_payload(block) {
            Ok(reading) => {
                self.slot.store(reading, true, monotonic_millis());
                debug!(
                    "Outdoor data updated: T={:.1}, H={:.1}, P={:.1}, V={:.2}, %{:.1}",
                    reading.temperature,
                    reading.humidity,
                    reading.pressure,
                    reading.battery_voltage,
                    reading.battery_percentage
                );
                true
            }
            Err(e) => {
                warn!(
                    "Dropping outdoor message: {} (raw: {})",
                    e,
                    format_raw_bytes(block)
                );
                false
            }
        }
    }

    pub fn data(&self) -> Snapshot<OutdoorReading> {
        self.slot.data()
    }

    pub fn has_new_data(&self) -> bool {
        self.slot.has_new_data()
    }

    pub fn reset_data(&mut self) {
        self.slot.reset_data()
    }
}

impl Default for OutdoorReceiver {
    fn default() -> Self {
        Self::new()
    }
}
