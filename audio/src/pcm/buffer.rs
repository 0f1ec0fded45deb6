//! Owned PCM buffers.

use std::borrow::Cow;
use std::time::Duration;

use super::format::AudioFormat;
use super::sample;
use crate::error::{Error, Result};

/// An owned PCM byte region with its format and frame count.
///
/// Planar buffers store their planes back to back. The invariant
/// `byte_len == frame_count * format.frame_stride()` holds for every buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBuffer {
    data: Vec<u8>,
    format: AudioFormat,
    frame_count: usize,
}

/// Copies `bytes` into a new buffer described by `format`.
///
/// The bytes must already be in the target representation; no conversion
/// is performed. Fails with [`Error::MalformedBufferLength`] when the length
/// is not a whole number of frames.
pub fn build_buffer(bytes: &[u8], format: AudioFormat) -> Result<PcmBuffer> {
    let frame_count = frames_for_len(bytes.len(), &format)?;
    let mut data = Vec::with_capacity(bytes.len());
    data.extend_from_slice(bytes);
    Ok(PcmBuffer {
        data,
        format,
        frame_count,
    })
}

/// Returns the bytes of one channel. See [`PcmBuffer::channel_bytes`].
pub fn extract_channel_bytes(buffer: &PcmBuffer, channel_index: usize) -> Result<&[u8]> {
    buffer.channel_bytes(channel_index)
}

fn frames_for_len(len: usize, format: &AudioFormat) -> Result<usize> {
    let frame_stride = format.frame_stride();
    if frame_stride == 0 || len % frame_stride != 0 {
        return Err(Error::MalformedBufferLength { len, frame_stride });
    }
    Ok(len / frame_stride)
}

impl PcmBuffer {
    /// Copies `bytes` into a new buffer. Same as [`build_buffer`].
    pub fn new(bytes: &[u8], format: AudioFormat) -> Result<Self> {
        build_buffer(bytes, format)
    }

    /// Takes ownership of `data` after validating its length.
    pub fn from_vec(data: Vec<u8>, format: AudioFormat) -> Result<Self> {
        let frame_count = frames_for_len(data.len(), &format)?;
        Ok(Self {
            data,
            format,
            frame_count,
        })
    }

    /// Builds a buffer from one run per plane.
    ///
    /// The number of runs must match `format.planes()` and all runs must
    /// have the same whole number of frames.
    pub fn from_planes<P: AsRef<[u8]>>(planes: &[P], format: AudioFormat) -> Result<Self> {
        let plane_len = planes.first().map(|p| p.as_ref().len()).unwrap_or(0);
        let total: usize = planes.iter().map(|p| p.as_ref().len()).sum();

        let uneven = planes.iter().any(|p| p.as_ref().len() != plane_len);
        if planes.len() != format.planes() || uneven {
            return Err(Error::MalformedBufferLength {
                len: total,
                frame_stride: format.frame_stride(),
            });
        }

        let frame_count = frames_for_len(total, &format)?;
        let mut data = Vec::with_capacity(total);
        for plane in planes {
            data.extend_from_slice(plane.as_ref());
        }
        Ok(Self {
            data,
            format,
            frame_count,
        })
    }

    /// Returns the buffer format.
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Returns the number of frames.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Returns the length of the byte region.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    /// Returns the playback duration.
    pub fn duration(&self) -> Duration {
        self.format.duration(self.frame_count)
    }

    /// Returns the raw byte region.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the buffer and returns the raw byte region.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Returns one run of the buffer.
    ///
    /// Planar buffers expose one run per channel, each exactly
    /// `frame_count * bytes_per_sample` bytes. Interleaved buffers expose a
    /// single run holding every channel, so only index 0 is addressable.
    pub fn channel_bytes(&self, channel_index: usize) -> Result<&[u8]> {
        if channel_index >= self.format.channels as usize || channel_index >= self.format.planes() {
            return Err(Error::ChannelIndexOutOfRange {
                index: channel_index,
                channels: self.format.channels,
            });
        }
        let plane_len = self.frame_count * self.format.bytes_per_frame();
        let start = channel_index * plane_len;
        Ok(&self.data[start..start + plane_len])
    }

    /// Returns the region in interleaved order, borrowing when it already is.
    pub fn interleaved_bytes(&self) -> Cow<'_, [u8]> {
        if self.format.planes() <= 1 {
            return Cow::Borrowed(&self.data);
        }
        let plane_len = self.frame_count * self.format.bytes_per_frame();
        let planes: Vec<&[u8]> = self.data.chunks_exact(plane_len.max(1)).collect();
        Cow::Owned(sample::interleave(&planes, self.format.bytes_per_sample()))
    }
}
