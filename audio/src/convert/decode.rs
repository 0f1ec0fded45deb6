//! Decode adapter: Ogg/Opus bytes to a PCM buffer.

use tracing::debug;

use crate::codec::oggopus::{OggOpusError, OggOpusReader};
use crate::codec::opus::DecoderError;
use crate::error::{Error, Result};
use crate::pcm::sample::f32_to_le;
use crate::pcm::{resolve_layout, AudioFormat, PcmBuffer, SampleFormat};

/// Decodes a complete Ogg/Opus bitstream to interleaved f32 PCM.
///
/// Returns the buffer together with its format: the decode rate, the
/// stream's channel count, f32 samples, interleaved.
pub fn decode(compressed: &[u8]) -> Result<(PcmBuffer, AudioFormat)> {
    let reader = OggOpusReader::open(compressed).map_err(Error::DecoderInitFailed)?;

    let channels = reader.channels();
    let layout = resolve_layout(channels).map_err(|_| Error::UnsupportedLayout(channels))?;
    let sample_rate = reader.decode_rate();
    debug!(%layout, sample_rate, "opusconv: decoding");

    let decoded = reader.decode_all().map_err(|err| match err {
        OggOpusError::Decoder(DecoderError::CreateFailed(_)) => Error::DecoderInitFailed(err),
        err => Error::DecodeFailed(err),
    })?;

    let format = AudioFormat::interleaved(decoded.sample_rate, decoded.channels, SampleFormat::F32);
    let buffer = PcmBuffer::from_vec(f32_to_le(&decoded.pcm), format)?;
    debug!(
        %format,
        frames = buffer.frame_count(),
        duration_ms = buffer.duration().as_millis() as u64,
        "opusconv: decoded"
    );
    Ok((buffer, format))
}
