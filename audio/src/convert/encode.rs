//! Encode adapter: a PCM buffer to Ogg/Opus bytes.

use tracing::debug;

use crate::codec::oggopus::{EncoderOptions, EncoderSession};
use crate::codec::opus::Application;
use crate::error::{Error, Result};
use crate::pcm::{extract_channel_bytes, PcmBuffer};

/// Encodes the primary run of `buffer` into a complete Ogg/Opus bitstream.
///
/// Interleaved buffers keep every channel. Planar buffers contribute their
/// first plane only and produce a mono stream.
pub fn encode(
    buffer: &PcmBuffer,
    sample_rate: u32,
    application: Application,
    options: &EncoderOptions,
) -> Result<Vec<u8>> {
    let format = buffer.format();
    let mut session = EncoderSession::new(&format, sample_rate, application, options)
        .map_err(Error::EncoderInitFailed)?;

    let primary = extract_channel_bytes(buffer, 0)?;
    debug!(
        source = %format,
        sample_rate,
        channels = session.channels(),
        bytes = primary.len(),
        "opusconv: encoding"
    );

    session.encode(primary).map_err(Error::EncodeFailed)?;
    let stream = session.flush().map_err(Error::EncodeFailed)?;

    debug!(bytes = stream.len(), "opusconv: encoded");
    Ok(stream)
}
