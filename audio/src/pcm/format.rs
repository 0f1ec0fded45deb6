//! PCM audio format definitions.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Sample representation. Sample bytes are always little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    /// 32-bit IEEE float, nominal range [-1.0, 1.0].
    F32,
    /// 16-bit signed integer.
    I16,
}

impl SampleFormat {
    /// Returns the number of bytes per sample.
    pub const fn bytes_per_sample(&self) -> usize {
        match self {
            Self::F32 => 4,
            Self::I16 => 2,
        }
    }

    /// Returns the bit depth.
    pub const fn bits(&self) -> u16 {
        (self.bytes_per_sample() * 8) as u16
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::F32 => write!(f, "f32"),
            Self::I16 => write!(f, "i16"),
        }
    }
}

/// Describes the layout of a PCM byte region.
///
/// Interleaved regions store one frame after another (`L R L R ...`).
/// Planar regions store one run per channel, back to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of channels.
    pub channels: u16,
    /// Sample representation.
    pub sample_format: SampleFormat,
    /// True if channels are interleaved within one run.
    pub interleaved: bool,
}

impl AudioFormat {
    /// Creates a new format.
    pub const fn new(
        sample_rate: u32,
        channels: u16,
        sample_format: SampleFormat,
        interleaved: bool,
    ) -> Self {
        Self {
            sample_rate,
            channels,
            sample_format,
            interleaved,
        }
    }

    /// Creates an interleaved format.
    pub const fn interleaved(sample_rate: u32, channels: u16, sample_format: SampleFormat) -> Self {
        Self::new(sample_rate, channels, sample_format, true)
    }

    /// Creates a planar (non-interleaved) format.
    pub const fn planar(sample_rate: u32, channels: u16, sample_format: SampleFormat) -> Self {
        Self::new(sample_rate, channels, sample_format, false)
    }

    /// Returns the number of bytes per sample.
    pub const fn bytes_per_sample(&self) -> usize {
        self.sample_format.bytes_per_sample()
    }

    /// Returns the number of bytes per frame within one run.
    ///
    /// Interleaved: `bytes_per_sample * channels`. Planar: `bytes_per_sample`.
    pub const fn bytes_per_frame(&self) -> usize {
        if self.interleaved {
            self.bytes_per_sample() * self.channels as usize
        } else {
            self.bytes_per_sample()
        }
    }

    /// Returns the number of separate runs (planes) in a region.
    pub const fn planes(&self) -> usize {
        if self.interleaved { 1 } else { self.channels as usize }
    }

    /// Returns the number of channels carried by each run.
    pub const fn channels_per_plane(&self) -> usize {
        self.bytes_per_frame() / self.bytes_per_sample()
    }

    /// Returns the number of bytes covering one frame across all planes.
    pub const fn frame_stride(&self) -> usize {
        self.bytes_per_frame() * self.planes()
    }

    /// Returns the playback duration of `frames` frames.
    pub fn duration(&self, frames: usize) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(frames as u64 * 1_000_000_000 / self.sample_rate as u64)
    }

    /// Returns this format with a different sample representation and interleaving.
    pub const fn with_layout(&self, sample_format: SampleFormat, interleaved: bool) -> Self {
        Self::new(self.sample_rate, self.channels, sample_format, interleaved)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Hz/{}ch/{}/{}",
            self.sample_rate,
            self.channels,
            self.sample_format,
            if self.interleaved { "interleaved" } else { "planar" },
        )
    }
}
