//! Ogg/Opus encoding session.

use std::mem;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::header::{OpusHead, OpusTags};
use super::{to_48k, OggOpusError};
use crate::codec::ogg::OggEncoder;
use crate::codec::opus::{is_supported_sample_rate, Application, Encoder, Frame, FrameDuration};
use crate::pcm::sample::{f32_from_le, i16_from_le};
use crate::pcm::{AudioFormat, SampleFormat};

/// Serial number of the single logical stream written by a session.
const STREAM_SERIAL: u32 = 1;

/// Tunable encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderOptions {
    /// Target bitrate in bits per second, libopus default when unset.
    pub bitrate: Option<i32>,
    /// Complexity 0-10, libopus default when unset.
    pub complexity: Option<i32>,
    /// Duration of each encoded packet.
    pub frame_duration: FrameDuration,
}

/// Encodes PCM bytes into an in-memory Ogg/Opus bitstream.
///
/// The session accepts any number of [`encode`](Self::encode) calls of
/// whole frames; [`flush`](Self::flush) must be called to obtain a valid
/// stream.
pub struct EncoderSession {
    encoder: Encoder,
    ogg: OggEncoder<Vec<u8>>,
    sample_format: SampleFormat,
    sample_rate: u32,
    channels: usize,
    frame_size: usize,
    frame_48k: u64,
    pre_skip: u16,
    pending: Vec<u8>,
    held: Option<Frame>,
    packets: u64,
    input_frames: u64,
    tags_written: bool,
}

impl EncoderSession {
    /// Opens a session for PCM laid out as `source`, encoded at `sample_rate`.
    ///
    /// The session encodes one run of `source`, so its channel count is
    /// the number of channels per plane.
    pub fn new(
        source: &AudioFormat,
        sample_rate: u32,
        application: Application,
        options: &EncoderOptions,
    ) -> Result<Self, OggOpusError> {
        if !is_supported_sample_rate(sample_rate) {
            return Err(OggOpusError::UnsupportedSampleRate(sample_rate));
        }

        let channels = source.channels_per_plane();
        if !(1..=2).contains(&channels) {
            return Err(OggOpusError::UnsupportedChannels(channels as u16));
        }

        let mut encoder = Encoder::new(sample_rate, channels as u16, application)?;
        if let Some(bitrate) = options.bitrate {
            encoder.set_bitrate(bitrate)?;
        }
        if let Some(complexity) = options.complexity {
            encoder.set_complexity(complexity)?;
        }

        let lookahead = encoder.lookahead()?;
        let pre_skip = to_48k(lookahead as u64, sample_rate)
            .and_then(|n| u16::try_from(n).ok())
            .ok_or_else(|| OggOpusError::invalid("encoder lookahead exceeds pre-skip range"))?;

        let mut ogg = OggEncoder::new(Vec::new(), STREAM_SERIAL);
        let head = OpusHead::new(channels as u8, pre_skip, sample_rate);
        ogg.write_packet(&head.to_bytes(), 0, true, false)?;

        debug!(
            sample_rate,
            channels,
            %application,
            frame_duration = %options.frame_duration,
            pre_skip,
            "oggopus: encoder session opened"
        );

        Ok(Self {
            frame_size: encoder.frame_size_for_duration(options.frame_duration),
            frame_48k: options.frame_duration.samples_48k() as u64,
            encoder,
            ogg,
            sample_format: source.sample_format,
            sample_rate,
            channels,
            pre_skip,
            pending: Vec::new(),
            held: None,
            packets: 0,
            input_frames: 0,
            tags_written: false,
        })
    }

    /// Returns the pre-skip written to the identification header.
    pub fn pre_skip(&self) -> u16 {
        self.pre_skip
    }

    /// Returns the number of channels encoded.
    pub fn channels(&self) -> u16 {
        self.channels as u16
    }

    fn frame_bytes(&self) -> usize {
        self.channels * self.sample_format.bytes_per_sample()
    }

    /// Encodes interleaved little-endian PCM in the source sample format.
    ///
    /// Samples that do not fill a whole packet are kept until the next call
    /// or until [`flush`](Self::flush).
    pub fn encode(&mut self, pcm: &[u8]) -> Result<(), OggOpusError> {
        let frame_bytes = self.frame_bytes();
        if pcm.len() % frame_bytes != 0 {
            return Err(OggOpusError::PcmLength {
                len: pcm.len(),
                frame_bytes,
            });
        }
        self.input_frames += (pcm.len() / frame_bytes) as u64;

        let block_len = self.frame_size * frame_bytes;
        let mut input = pcm;

        if !self.pending.is_empty() {
            let need = (block_len - self.pending.len()).min(input.len());
            self.pending.extend_from_slice(&input[..need]);
            input = &input[need..];
            if self.pending.len() < block_len {
                return Ok(());
            }
            let block = mem::take(&mut self.pending);
            self.encode_block(&block)?;
        }

        let mut blocks = input.chunks_exact(block_len);
        for block in &mut blocks {
            self.encode_block(block)?;
        }
        self.pending.extend_from_slice(blocks.remainder());
        Ok(())
    }

    fn encode_block(&mut self, block: &[u8]) -> Result<(), OggOpusError> {
        let frame = match self.sample_format {
            SampleFormat::I16 => self.encoder.encode(&i16_from_le(block), self.frame_size)?,
            SampleFormat::F32 => self
                .encoder
                .encode_float(&f32_from_le(block), self.frame_size)?,
        };
        self.push_packet(frame)
    }

    /// Holds an encoded packet and queues the previously held one.
    ///
    /// The newest packet is held back so that flush can give it the end
    /// granule. Queued packets share Ogg pages.
    fn push_packet(&mut self, frame: Frame) -> Result<(), OggOpusError> {
        if !self.tags_written {
            self.tags_written = true;
            self.ogg
                .write_packet(&OpusTags::default().to_bytes(), 0, false, false)?;
        }

        if let Some(prev) = self.held.replace(frame) {
            self.packets += 1;
            let granule = self.packets * self.frame_48k;
            self.ogg.queue_packet(prev.as_bytes(), granule as i64)?;
        }
        Ok(())
    }

    fn encoded_48k(&self) -> u64 {
        (self.packets + self.held.is_some() as u64) * self.frame_48k
    }

    /// Finishes the stream and returns the complete bitstream.
    ///
    /// Pads the last partial packet with silence, drains the encoder
    /// lookahead and writes the final page with the exact end granule.
    pub fn flush(mut self) -> Result<Vec<u8>, OggOpusError> {
        let block_len = self.frame_size * self.frame_bytes();

        if !self.pending.is_empty() {
            let mut block = mem::take(&mut self.pending);
            block.resize(block_len, 0);
            self.encode_block(&block)?;
        }

        let end_granule = to_48k(self.input_frames, self.sample_rate)
            .and_then(|n| n.checked_add(self.pre_skip as u64))
            .filter(|&g| g <= i64::MAX as u64)
            .ok_or_else(|| OggOpusError::invalid("granule position out of range"))?;
        let silence = vec![0u8; block_len];
        while self.encoded_48k() < end_granule {
            self.encode_block(&silence)?;
        }

        match self.held.take() {
            Some(last) => {
                self.packets += 1;
                self.ogg.queue_packet(last.as_bytes(), end_granule as i64)?;
                self.ogg.flush_page(true)?;
            }
            None => {
                self.ogg
                    .write_packet(&OpusTags::default().to_bytes(), 0, false, true)?;
            }
        }
        self.ogg.flush()?;

        debug!(
            packets = self.packets,
            pages = self.ogg.pages_written(),
            input_frames = self.input_frames,
            end_granule,
            "oggopus: encoder session flushed"
        );

        Ok(self.ogg.into_inner())
    }
}
