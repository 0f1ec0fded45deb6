//! Opus audio in an Ogg container (RFC 7845).
//!
//! - [`OggOpusReader`] / [`decode`]: parse the identification and comment
//!   headers, decode every audio packet and trim pre-skip and end padding.
//! - [`EncoderSession`]: feed PCM bytes, then [`EncoderSession::flush`] to
//!   obtain a complete Ogg/Opus bitstream.

use std::io;

use thiserror::Error;

use super::opus::{DecoderError, EncoderError};

mod header;
mod reader;
mod session;

pub use header::{OpusHead, OpusTags, OPUS_HEAD_MAGIC, OPUS_TAGS_MAGIC};
pub use reader::{decode, Decoded, OggOpusReader};
pub use session::{EncoderOptions, EncoderSession};

/// Granule positions are always counted at 48kHz.
pub const GRANULE_RATE: u32 = 48000;

/// Errors raised while reading or writing Ogg/Opus streams.
#[derive(Debug, Error)]
pub enum OggOpusError {
    #[error("oggopus: invalid stream: {0}")]
    InvalidStream(String),

    #[error("oggopus: ogg: {0}")]
    Ogg(#[from] io::Error),

    #[error(transparent)]
    Decoder(#[from] DecoderError),

    #[error(transparent)]
    Encoder(#[from] EncoderError),

    #[error("oggopus: unsupported sample rate {0}")]
    UnsupportedSampleRate(u32),

    #[error("oggopus: unsupported channel count {0}")]
    UnsupportedChannels(u16),

    #[error("oggopus: pcm length {len} is not a multiple of {frame_bytes}")]
    PcmLength { len: usize, frame_bytes: usize },
}

impl OggOpusError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStream(msg.into())
    }
}

/// Converts a sample count between 48kHz and `sample_rate`, or `None` on
/// overflow.
pub(crate) fn from_48k(samples: u64, sample_rate: u32) -> Option<u64> {
    samples
        .checked_mul(sample_rate as u64)
        .map(|n| n / GRANULE_RATE as u64)
}

pub(crate) fn to_48k(samples: u64, sample_rate: u32) -> Option<u64> {
    samples
        .checked_mul(GRANULE_RATE as u64)
        .map(|n| n / sample_rate as u64)
}
