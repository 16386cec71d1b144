//! Deduplication of sensor reads across scheduler wake-ups

/// Remembers the last processed read sequence
///
/// Sequence 0 means "never read" and is never processed, so outputs are not
/// computed from uninitialized sensor values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadGate {
    /// Sequence of the last reading that was processed
    last_processed_sequence: u32,
}

impl ReadGate {
    /// Creates a gate that has processed nothing yet
    pub const fn new() -> Self {
        Self {
            last_processed_sequence: 0,
        }
    }

    /// Returns true exactly once for every sequence newer than the last processed one
    pub const fn advance(&mut self, sequence: u32) -> bool {
        if sequence == 0 || sequence <= self.last_processed_sequence {
            return false;
        }
        self.last_processed_sequence = sequence;
        true
    }

    /// The last sequence that was processed, 0 before the first reading
    pub const fn last_processed(&self) -> u32 {
        self.last_processed_sequence
    }
}
