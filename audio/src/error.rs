//! Error types for conversion operations.

use thiserror::Error;

use crate::codec::oggopus::OggOpusError;

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed foreign error carried by [`Error::External`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for conversion operations.
///
/// Every failure is terminal for the current call. Foreign errors (file I/O,
/// container backends) are wrapped in [`Error::External`] with their original
/// cause preserved.
#[derive(Debug, Error)]
pub enum Error {
    /// Raw byte count is not a multiple of the frame stride.
    #[error("opusconv: malformed buffer length {len} (frame stride {frame_stride})")]
    MalformedBufferLength { len: usize, frame_stride: usize },

    /// Channel count has no canonical layout.
    #[error("opusconv: unsupported channel count {0}")]
    UnsupportedChannelCount(u16),

    /// Decoded stream carries a channel count with no canonical layout.
    #[error("opusconv: unsupported channel layout for {0} channels")]
    UnsupportedLayout(u16),

    /// Channel index is not addressable in the buffer.
    #[error("opusconv: channel index {index} out of range for {channels} channel(s)")]
    ChannelIndexOutOfRange { index: usize, channels: u16 },

    /// The codec rejected the stream headers.
    #[error("opusconv: decoder init failed: {0}")]
    DecoderInitFailed(#[source] OggOpusError),

    /// The codec rejected an audio packet.
    #[error("opusconv: decode failed: {0}")]
    DecodeFailed(#[source] OggOpusError),

    /// The codec could not be set up for the given format/rate.
    #[error("opusconv: encoder init failed: {0}")]
    EncoderInitFailed(#[source] OggOpusError),

    /// The codec failed while encoding or flushing.
    #[error("opusconv: encode failed: {0}")]
    EncodeFailed(#[source] OggOpusError),

    /// Any foreign error not otherwise classified.
    #[error("opusconv: {0}")]
    External(#[source] BoxError),
}

impl Error {
    /// Wraps a foreign error.
    pub fn external<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::External(err.into())
    }

    /// Returns the wrapped I/O error, if this is an external I/O failure.
    pub fn as_io(&self) -> Option<&std::io::Error> {
        match self {
            Self::External(err) => err.downcast_ref::<std::io::Error>(),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::External(Box::new(err))
    }
}

impl From<hound::Error> for Error {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => Self::External(Box::new(io)),
            other => Self::External(Box::new(other)),
        }
    }
}
