//! Uncompressed container file I/O.
//!
//! The conversion pipeline only talks to [`ContainerIo`]; [`WavContainer`]
//! is the shipped backend.

use std::path::Path;

use crate::error::Result;
use crate::pcm::{PcmBuffer, SampleFormat};

mod wav;

pub use wav::WavContainer;

/// Frames read from a container file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerFrames {
    /// One run per plane: a single run for interleaved reads, one per
    /// channel otherwise.
    pub planes: Vec<Vec<u8>>,
    pub sample_rate: u32,
    pub channels: u16,
    pub frame_count: usize,
}

/// Reads and writes PCM container files.
pub trait ContainerIo {
    /// Reads all frames, converted to `forced` and laid out per `interleaved`.
    fn read(&self, path: &Path, forced: SampleFormat, interleaved: bool) -> Result<ContainerFrames>;

    /// Writes `buffer` using its rate, channel count and sample format,
    /// replacing any existing file.
    fn write(&self, path: &Path, buffer: &PcmBuffer) -> Result<()>;
}
