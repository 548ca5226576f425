/// Indoor sensor pipeline: UART byte stream in, freshness-tagged snapshots out
use log::{info, warn};

use crate::freshness::{Snapshot, SnapshotSlot};
use crate::models::EnvironmentalReading;
use crate::uart::decoder::{decode_frame, validate_checksum, FrameDecoder};
use crate::utils::monotonic_millis;
use crate::validity::is_reading_valid;

/// Owns the UART frame decoder and the single latest indoor snapshot.
pub struct IndoorSensor {
    decoder: FrameDecoder,
    slot: SnapshotSlot<EnvironmentalReading>,
    altitude_correction_pa: i32,
}

impl IndoorSensor {
    pub fn new(altitude_correction_pa: i32) -> Self {
        IndoorSensor {
            decoder: FrameDecoder::new(),
            slot: SnapshotSlot::new(),
            altitude_correction_pa,
        }
    }

    /// Offer the currently available bytes to the decoder.
    ///
    /// Runs to completion over the whole chunk without blocking; partial
    /// frame state carries over to the next call. Every checksum-valid
    /// frame is decoded, range-classified and stored, superseding the
    /// previous snapshot. Returns the number of readings produced.
    pub fn feed(&mut self, bytes: &[u8]) -> usize {
        let mut produced = 0;
        for byte in bytes.iter().copied() {
            if let Some(frame) = self.decoder.push(byte) {
                match validate_checksum(&frame) {
                    Ok(()) => {
                        let reading = decode_frame(&frame, self.altitude_correction_pa);
                        let is_valid = is_reading_valid(&reading);
                        self.slot.store(reading, is_valid, monotonic_millis());
                        produced += 1;

                        if is_valid {
                            info!(
                                "Sensor data updated - Temp: {:.1}°C, Humidity: {:.1}%, Pressure: {:.1} hPa, IAQ: {}",
                                reading.temperature,
                                reading.humidity,
                                reading.pressure,
                                reading.iaq
                            );
                        } else {
                            warn!("Out-of-range sensor data detected: {:?}", reading);
                        }
                    }
                    Err(e) => {
                        // Corrupt frame: drop it and keep seeking. The
                        // previous snapshot stays untouched.
                        warn!("Dropping sensor frame: {}", e);
                    }
                }
            }
        }
        produced
    }

    pub fn data(&self) -> Snapshot<EnvironmentalReading> {
        self.slot.data()
    }

    pub fn has_new_data(&self) -> bool {
        self.slot.has_new_data()
    }

    pub fn reset_data(&mut self) {
        self.slot.reset_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uart::decoder::testutil::{sample_frame, with_checksum};
    use crate::uart::decoder::FRAME_LEN;

    #[test]
    fn valid_frame_produces_fresh_snapshot() {
        let mut sensor = IndoorSensor::new(0);
        assert_eq!(sensor.feed(&sample_frame()), 1);

        let snapshot = sensor.data();
        assert!(snapshot.is_valid);
        assert!(snapshot.timestamp > 0);
        assert_eq!(snapshot.reading.temperature, 22.5);
        assert!(sensor.has_new_data());
    }

    #[test]
    fn corrupt_frame_keeps_previous_snapshot() {
        let mut sensor = IndoorSensor::new(0);
        assert_eq!(sensor.feed(&sample_frame()), 1);
        let before = sensor.data();

        let mut corrupt = sample_frame();
        corrupt[FRAME_LEN - 1] ^= 0xFF;
        assert_eq!(sensor.feed(&corrupt), 0);

        let after = sensor.data();
        assert_eq!(before.reading, after.reading);
        assert_eq!(before.timestamp, after.timestamp);
        assert!(sensor.has_new_data());
    }

    #[test]
    fn out_of_range_temperature_invalidates_whole_reading() {
        let mut raw = sample_frame();
        raw[4] = 0x21; // 8500 => 85.00 °C, past the trusted range
        raw[5] = 0x34;
        let frame = with_checksum(raw);

        let mut sensor = IndoorSensor::new(0);
        assert_eq!(sensor.feed(&frame), 1);

        let snapshot = sensor.data();
        assert!(!snapshot.is_valid);
        assert!(!sensor.has_new_data());
        // Individual fields stay inspectable
        assert_eq!(snapshot.reading.temperature, 85.0);
        assert_eq!(snapshot.reading.humidity, 45.0);
    }

    #[test]
    fn reset_clears_freshness_but_keeps_reading() {
        let mut sensor = IndoorSensor::new(0);
        sensor.feed(&sample_frame());
        assert!(sensor.has_new_data());

        sensor.reset_data();
        assert!(!sensor.has_new_data());
        let stale = sensor.data();
        assert_eq!(stale.reading.temperature, 22.5);
        assert_eq!(stale.timestamp, 0);

        sensor.feed(&sample_frame());
        assert!(sensor.has_new_data());
        assert!(sensor.data().timestamp > 0);
    }

    #[test]
    fn garbage_prefix_yields_exactly_one_reading() {
        let mut sensor = IndoorSensor::new(0);
        let mut stream = vec![0x00, 0x5A, 0x00, 0xFF];
        stream.extend_from_slice(&sample_frame());
        assert_eq!(sensor.feed(&stream), 1);
        assert!(sensor.has_new_data());
    }

    #[test]
    fn split_delivery_produces_same_reading() {
        let frame = sample_frame();
        let mut sensor = IndoorSensor::new(0);
        assert_eq!(sensor.feed(&frame[..7]), 0);
        assert_eq!(sensor.feed(&frame[7..]), 1);

        let mut reference = IndoorSensor::new(0);
        reference.feed(&frame);
        assert_eq!(sensor.data().reading, reference.data().reading);
    }

    #[test]
    fn altitude_correction_offsets_reported_pressure() {
        let mut sensor = IndoorSensor::new(1200);
        sensor.feed(&sample_frame());
        let reading = sensor.data().reading;
        assert_eq!(reading.pressure, 1013.25);
        assert_eq!(reading.altitude_pressure, 1025.25);
    }
}
