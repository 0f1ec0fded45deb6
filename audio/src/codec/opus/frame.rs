//! Opus packet type.

use super::toc::{FrameCode, TOC};

/// Longest packet duration allowed by RFC 6716 (120ms at 48kHz).
pub const MAX_PACKET_SAMPLES_48K: u32 = 5760;

/// Raw Opus encoded packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(pub Vec<u8>);

impl Frame {
    /// Creates a new frame from bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the frame is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the TOC byte of this frame.
    pub fn toc(&self) -> TOC {
        TOC::new(self.0.first().copied().unwrap_or(0))
    }

    /// Returns the number of coded frames in the packet, or `None` if the
    /// packet is too short to tell.
    pub fn frame_count(&self) -> Option<u32> {
        if self.0.is_empty() {
            return None;
        }
        match self.toc().frame_code() {
            FrameCode::OneFrame => Some(1),
            FrameCode::TwoEqualFrames | FrameCode::TwoDifferentFrames => Some(2),
            FrameCode::ArbitraryFrames => match self.0.get(1) {
                Some(b) if b & 0b00111111 > 0 => Some((b & 0b00111111) as u32),
                _ => None,
            },
        }
    }

    /// Returns the number of samples per channel at 48kHz, or `None` if the
    /// packet is malformed or longer than 120ms.
    pub fn samples_48k(&self) -> Option<u32> {
        let count = self.frame_count()?;
        let samples = count * self.toc().configuration().frame_duration().samples_48k();
        (samples <= MAX_PACKET_SAMPLES_48K).then_some(samples)
    }

    /// Returns the number of samples per channel at `sample_rate`.
    pub fn samples(&self, sample_rate: u32) -> Option<u32> {
        self.samples_48k()
            .map(|s| (s as u64 * sample_rate as u64 / 48000) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_frame() {
        let frame = Frame::new(vec![]);
        assert!(frame.is_empty());
        assert_eq!(frame.frame_count(), None);
        assert_eq!(frame.samples_48k(), None);
    }

    #[test]
    fn test_frame_samples_one_frame() {
        let frame = Frame::new(vec![0x48]); // Config 9 (20ms), mono, one frame
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.samples_48k(), Some(960));
        assert_eq!(frame.samples(16000), Some(320));
    }

    #[test]
    fn test_frame_samples_two_frames() {
        assert_eq!(Frame::new(vec![0x49]).samples_48k(), Some(1920));
        assert_eq!(Frame::new(vec![0x4A]).samples_48k(), Some(1920));
    }

    #[test]
    fn test_frame_samples_arbitrary_frames() {
        let frame = Frame::new(vec![0x4B, 0x03]); // Config 9 (20ms), 3 frames
        assert_eq!(frame.samples_48k(), Some(2880));
        assert_eq!(frame.samples(8000), Some(480));
    }

    #[test]
    fn test_arbitrary_frames_malformed() {
        assert_eq!(Frame::new(vec![0x4B]).frame_count(), None);
        assert_eq!(Frame::new(vec![0x4B, 0x00]).frame_count(), None);
    }

    #[test]
    fn test_packet_longer_than_120ms() {
        // Config 3 (SILK NB 60ms), 3 frames = 180ms
        let frame = Frame::new(vec![0b00011011, 0x03]);
        assert_eq!(frame.frame_count(), Some(3));
        assert_eq!(frame.samples_48k(), None);
    }
}
