//! Opus TOC (Table of Contents) parsing.
//!
//! Implements RFC 6716 Section 3.1.

use serde::{Deserialize, Serialize};

/// TOC byte from an Opus packet header.
///
/// Layout:
/// ```text
///          0 1 2 3 4 5 6 7
///         +-+-+-+-+-+-+-+-+
///         | config  |s| c |
///         +-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TOC(pub u8);

impl TOC {
    /// Creates a TOC from a byte.
    pub const fn new(byte: u8) -> Self {
        Self(byte)
    }

    /// Returns the configuration number (0-31).
    pub fn configuration(&self) -> Configuration {
        Configuration(self.0 >> 3)
    }

    /// Returns the frame code (number of frames per packet).
    pub fn frame_code(&self) -> FrameCode {
        FrameCode::from_bits(self.0 & 0b00000011)
    }
}

/// Opus configuration number (0-31).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration(pub u8);

impl Configuration {
    /// Returns the duration of each frame coded with this configuration.
    pub fn frame_duration(&self) -> FrameDuration {
        match self.0 {
            16 | 20 | 24 | 28 => FrameDuration::Duration2500us,
            17 | 21 | 25 | 29 => FrameDuration::Duration5ms,
            0 | 4 | 8 | 12 | 14 | 18 | 22 | 26 | 30 => FrameDuration::Duration10ms,
            2 | 6 | 10 => FrameDuration::Duration40ms,
            3 | 7 | 11 => FrameDuration::Duration60ms,
            _ => FrameDuration::Duration20ms,
        }
    }
}

/// Frame code indicating number of frames per packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameCode {
    /// One frame in the packet.
    OneFrame,
    /// Two frames with equal compressed size.
    TwoEqualFrames,
    /// Two frames with different compressed sizes.
    TwoDifferentFrames,
    /// Arbitrary number of frames, count in the following byte.
    ArbitraryFrames,
}

impl FrameCode {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::OneFrame,
            1 => Self::TwoEqualFrames,
            2 => Self::TwoDifferentFrames,
            _ => Self::ArbitraryFrames,
        }
    }
}

/// Opus frame duration.
///
/// Also used to pick the encoder frame size; serialized as `"20ms"` etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FrameDuration {
    #[serde(rename = "2.5ms")]
    Duration2500us,
    #[serde(rename = "5ms")]
    Duration5ms,
    #[serde(rename = "10ms")]
    Duration10ms,
    #[default]
    #[serde(rename = "20ms")]
    Duration20ms,
    #[serde(rename = "40ms")]
    Duration40ms,
    #[serde(rename = "60ms")]
    Duration60ms,
}

impl FrameDuration {
    /// Returns the number of samples per channel at 48kHz.
    pub const fn samples_48k(&self) -> u32 {
        match self {
            Self::Duration2500us => 120,
            Self::Duration5ms => 240,
            Self::Duration10ms => 480,
            Self::Duration20ms => 960,
            Self::Duration40ms => 1920,
            Self::Duration60ms => 2880,
        }
    }

    /// Returns the number of samples per channel at `sample_rate`.
    pub const fn samples(&self, sample_rate: u32) -> u32 {
        (self.samples_48k() as u64 * sample_rate as u64 / 48000) as u32
    }
}

impl std::fmt::Display for FrameDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duration2500us => write!(f, "2.5ms"),
            Self::Duration5ms => write!(f, "5ms"),
            Self::Duration10ms => write!(f, "10ms"),
            Self::Duration20ms => write!(f, "20ms"),
            Self::Duration40ms => write!(f, "40ms"),
            Self::Duration60ms => write!(f, "60ms"),
        }
    }
}
