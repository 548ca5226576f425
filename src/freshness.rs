/// The externally visible pairing of a reading with its validity flag and
/// decode-time monotonic timestamp. Handed to consumers by value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Snapshot<T> {
    pub reading: T,
    pub is_valid: bool,
    pub timestamp: u64,
}

/// Single latest-reading slot owned by a pipeline, overwritten in place
/// on every successful decode. No queue, no history and no time-based
/// expiry: a snapshot stays "new" until it is superseded or explicitly
/// reset by the consumer.
#[derive(Debug, Default)]
pub struct SnapshotSlot<T> {
    current: Snapshot<T>,
}

impl<T: Copy + Default> SnapshotSlot<T> {
    pub fn new() -> Self {
        SnapshotSlot {
            current: Snapshot::default(),
        }
    }

    /// Overwrite the slot with a freshly decoded reading.
    pub fn store(&mut self, reading: T, is_valid: bool, timestamp: u64) {
        self.current = Snapshot {
            reading,
            is_valid,
            timestamp,
        };
    }

    pub fn data(&self) -> Snapshot<T> {
        self.current
    }

    /// The sole staleness signal consumers may rely on.
    pub fn has_new_data(&self) -> bool {
        self.current.is_valid && self.current.timestamp > 0
    }

    /// Clear validity and zero the timestamp without destroying the last
    /// decoded field values, so a stale reading stays inspectable.
    pub fn reset_data(&mut self) {
        self.current.is_valid = false;
        self.current.timestamp = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_has_no_data() {
        let slot: SnapshotSlot<u32> = SnapshotSlot::new();
        assert!(!slot.has_new_data());
        assert_eq!(slot.data().timestamp, 0);
        assert!(!slot.data().is_valid);
    }

    #[test]
    fn stored_snapshot_is_fresh() {
        let mut slot = SnapshotSlot::new();
        slot.store(7u32, true, 42);
        assert!(slot.has_new_data());
        assert_eq!(slot.data().reading, 7);
        assert_eq!(slot.data().timestamp, 42);
    }

    #[test]
    fn invalid_snapshot_is_never_fresh() {
        let mut slot = SnapshotSlot::new();
        slot.store(7u32, false, 42);
        assert!(!slot.has_new_data());
        // The reading itself is still there to inspect
        assert_eq!(slot.data().reading, 7);
    }

    #[test]
    fn reset_keeps_reading_but_clears_freshness() {
        let mut slot = SnapshotSlot::new();
        slot.store(7u32, true, 42);
        slot.reset_data();
        assert!(!slot.has_new_data());
        assert_eq!(slot.data().reading, 7);
        assert_eq!(slot.data().timestamp, 0);
    }

    #[test]
    fn store_supersedes_previous_snapshot() {
        let mut slot = SnapshotSlot::new();
        slot.store(7u32, true, 42);
        slot.store(9u32, true, 43);
        assert_eq!(slot.data().reading, 9);
        assert_eq!(slot.data().timestamp, 43);
    }
}
