//! Ogg logical stream state.

/// Per-stream page counters for writing.
#[derive(Debug)]
pub struct StreamState {
    serial: u32,
    sequence: u32,
}

impl StreamState {
    /// Creates a new stream state.
    pub fn new(serial: u32) -> Self {
        Self { serial, sequence: 0 }
    }

    /// Returns the serial number.
    pub fn serial(&self) -> u32 {
        self.serial
    }

    /// Returns the sequence number of the next page.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Returns the current sequence number and advances it.
    pub fn next_sequence(&mut self) -> u32 {
        let seq = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        seq
    }
}
