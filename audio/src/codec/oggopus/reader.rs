//! Ogg/Opus stream reader.

use std::io::Read;

use tracing::debug;

use super::header::{OpusHead, OpusTags};
use super::{from_48k, OggOpusError, GRANULE_RATE};
use crate::codec::ogg::OggSync;
use crate::codec::opus::{is_supported_sample_rate, Decoder, Frame};

/// Fully decoded stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Interleaved float samples.
    pub pcm: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Decoded {
    /// Returns the number of frames.
    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.pcm.len() / self.channels as usize
    }
}

/// Reads one Opus logical stream from an Ogg container.
///
/// [`OggOpusReader::open`] parses the headers only, so callers can inspect
/// the channel count before any audio is decoded.
pub struct OggOpusReader<R: Read> {
    sync: OggSync<R>,
    head: OpusHead,
    tags: OpusTags,
    serial: u32,
}

impl<R: Read> OggOpusReader<R> {
    /// Opens a stream and parses its OpusHead and OpusTags packets.
    pub fn open(reader: R) -> Result<Self, OggOpusError> {
        let mut sync = OggSync::new(reader);

        let first = sync
            .read_packet()?
            .ok_or_else(|| OggOpusError::invalid("empty stream"))?;
        if !first.bos {
            return Err(OggOpusError::invalid("first page is not a beginning of stream"));
        }
        let head = OpusHead::parse(&first.data)?;
        let serial = first.serial;

        // Other multiplexed streams may begin before our comment header.
        let tags = loop {
            let packet = sync
                .read_packet()?
                .ok_or_else(|| OggOpusError::invalid("missing OpusTags"))?;
            if packet.serial == serial {
                break OpusTags::parse(&packet.data)?;
            }
        };

        debug!(
            serial,
            channels = head.channels,
            pre_skip = head.pre_skip,
            input_rate = head.input_sample_rate,
            vendor = %tags.vendor,
            "oggopus: opened stream"
        );

        Ok(Self {
            sync,
            head,
            tags,
            serial,
        })
    }

    /// Returns the identification header.
    pub fn head(&self) -> &OpusHead {
        &self.head
    }

    /// Returns the comment header.
    pub fn tags(&self) -> &OpusTags {
        &self.tags
    }

    /// Returns the channel count from the identification header.
    pub fn channels(&self) -> u16 {
        self.head.channels as u16
    }

    /// Returns the rate audio is decoded at: the original input rate when
    /// libopus can produce it, otherwise 48kHz.
    pub fn decode_rate(&self) -> u32 {
        if is_supported_sample_rate(self.head.input_sample_rate) {
            self.head.input_sample_rate
        } else {
            GRANULE_RATE
        }
    }

    /// Decodes every remaining audio packet.
    ///
    /// Pre-skip samples are dropped from the start, the last granule
    /// position trims the end padding and the header output gain is applied.
    pub fn decode_all(mut self) -> Result<Decoded, OggOpusError> {
        let sample_rate = self.decode_rate();
        let channels = self.channels();
        if channels == 0 {
            return Err(OggOpusError::UnsupportedChannels(0));
        }
        let mut decoder = Decoder::new(sample_rate, channels)?;

        let mut pcm = Vec::new();
        let mut packets = 0usize;
        let mut last_granule: i64 = -1;

        while let Some(packet) = self.sync.read_packet()? {
            if packet.serial != self.serial {
                continue;
            }
            if !packet.data.is_empty() {
                decoder.decode_float_into(&Frame::new(packet.data), &mut pcm)?;
                packets += 1;
            }
            if packet.granule_position >= 0 {
                last_granule = packet.granule_position;
            }
            if packet.eos {
                break;
            }
        }

        let ch = channels as usize;
        let decoded_frames = pcm.len() / ch;
        let pre_skip = self.head.pre_skip as u64;
        let skip = from_48k(pre_skip, sample_rate)
            .map_or(decoded_frames, |s| (s as usize).min(decoded_frames));

        let mut end = decoded_frames;
        if last_granule >= 0 {
            let valid_48k = (last_granule as u64).saturating_sub(pre_skip);
            let valid = from_48k(valid_48k, sample_rate)
                .and_then(|v| usize::try_from(v).ok())
                .ok_or_else(|| OggOpusError::invalid("granule position out of range"))?;
            end = end.min(skip.saturating_add(valid));
        }

        pcm.truncate(end * ch);
        pcm.drain(..skip * ch);
        if self.head.output_gain != 0 {
            apply_gain(&mut pcm, self.head.output_gain);
        }

        debug!(
            packets,
            decoded_frames,
            frames = end - skip,
            sample_rate,
            channels,
            "oggopus: decoded stream"
        );

        Ok(Decoded {
            pcm,
            sample_rate,
            channels,
        })
    }
}

/// Scales samples by an OpusHead output gain given in Q7.8 dB.
fn apply_gain(pcm: &mut [f32], gain_q8: i16) {
    let scale = 10f32.powf(gain_q8 as f32 / (20.0 * 256.0));
    for sample in pcm {
        *sample *= scale;
    }
}

/// Decodes a complete Ogg/Opus bitstream held in memory.
pub fn decode(bytes: &[u8]) -> Result<Decoded, OggOpusError> {
    OggOpusReader::open(bytes)?.decode_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ogg::OggEncoder;
    use crate::codec::oggopus::{EncoderOptions, EncoderSession};
    use crate::codec::opus::Application;
    use crate::pcm::sample::f32_to_le;
    use crate::pcm::{AudioFormat, SampleFormat};

    fn headers(channels: u8, pre_skip: u16, rate: u32) -> Vec<u8> {
        let mut ogg = OggEncoder::new(Vec::new(), 7);
        ogg.write_packet(&OpusHead::new(channels, pre_skip, rate).to_bytes(), 0, true, false)
            .unwrap();
        ogg.write_packet(&OpusTags::default().to_bytes(), 0, false, false)
            .unwrap();
        ogg.into_inner()
    }

    #[test]
    fn test_open_headers() {
        let data = headers(2, 312, 44100);
        let reader = OggOpusReader::open(data.as_slice()).unwrap();
        assert_eq!(reader.channels(), 2);
        assert_eq!(reader.head().pre_skip, 312);
        assert!(reader.tags().vendor.starts_with("opusconv"));
        // 44.1kHz is not a libopus rate.
        assert_eq!(reader.decode_rate(), 48000);
    }

    #[test]
    fn test_decode_rate_follows_input() {
        let data = headers(1, 0, 16000);
        let reader = OggOpusReader::open(data.as_slice()).unwrap();
        assert_eq!(reader.decode_rate(), 16000);
    }

    #[test]
    fn test_open_rejects_garbage() {
        assert!(matches!(
            OggOpusReader::open(&b"not an ogg stream at all"[..]),
            Err(OggOpusError::Ogg(_))
        ));
        assert!(matches!(
            OggOpusReader::open(&[][..]),
            Err(OggOpusError::InvalidStream(_))
        ));
    }

    #[test]
    fn test_open_missing_tags() {
        let mut ogg = OggEncoder::new(Vec::new(), 7);
        ogg.write_packet(&OpusHead::new(1, 0, 48000).to_bytes(), 0, true, true)
            .unwrap();
        let data = ogg.into_inner();
        assert!(matches!(
            OggOpusReader::open(data.as_slice()),
            Err(OggOpusError::InvalidStream(_))
        ));
    }

    #[test]
    fn test_open_accepts_many_channels() {
        // Layout checks belong to the caller.
        let data = headers(6, 0, 48000);
        let reader = OggOpusReader::open(data.as_slice()).unwrap();
        assert_eq!(reader.channels(), 6);
    }

    #[test]
    fn test_decode_headers_only() {
        let decoded = decode(&headers(1, 0, 48000)).unwrap();
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.sample_rate, 48000);
        assert_eq!(decoded.frame_count(), 0);
    }

    fn encoded_sine(rate: u32) -> Vec<u8> {
        let format = AudioFormat::interleaved(rate, 1, SampleFormat::F32);
        let mut session =
            EncoderSession::new(&format, rate, Application::Audio, &EncoderOptions::default())
                .unwrap();
        let samples: Vec<f32> = (0..rate as usize / 10)
            .map(|i| (i as f32 * 0.07).sin() * 0.4)
            .collect();
        session.encode(&f32_to_le(&samples)).unwrap();
        session.flush().unwrap()
    }

    /// Rewrites the OpusHead output gain, recomputing the page checksum.
    fn with_output_gain(stream: &[u8], gain: i16) -> Vec<u8> {
        let mut sync = OggSync::new(stream);
        let mut out = Vec::new();
        while let Some(mut page) = sync.read_page().unwrap() {
            if page.sequence == 0 {
                page.body[16..18].copy_from_slice(&gain.to_le_bytes());
            }
            out.extend_from_slice(&page.to_bytes());
        }
        out
    }

    #[test]
    fn test_apply_gain() {
        let mut pcm = vec![0.5f32, -0.25, 1.0];
        apply_gain(&mut pcm, 0);
        assert_eq!(pcm, vec![0.5, -0.25, 1.0]);

        // 256 * 20 * log10(2) is about 1541.
        apply_gain(&mut pcm, 1541);
        assert!((pcm[0] - 1.0).abs() < 1e-3);
        assert!((pcm[1] + 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_decode_applies_output_gain() {
        let stream = encoded_sine(48000);
        let plain = decode(&stream).unwrap();
        let halved = decode(&with_output_gain(&stream, -1541)).unwrap();

        assert_eq!(halved.frame_count(), plain.frame_count());
        let scale = 10f32.powf(-1541.0 / 5120.0);
        assert!((scale - 0.5).abs() < 1e-3);
        for (h, p) in halved.pcm.iter().zip(&plain.pcm) {
            assert!((h - p * scale).abs() < 1e-6);
        }
        assert!(plain.pcm.iter().any(|s| s.abs() > 0.1));
    }

    #[test]
    fn test_decode_rejects_granule_overflow() {
        let mut data = headers(1, 312, 48000);
        let mut tail = OggEncoder::new(Vec::new(), 7);
        tail.write_packet(&[], 1 << 60, false, true).unwrap();
        data.extend_from_slice(&tail.into_inner());

        assert!(matches!(
            decode(&data),
            Err(OggOpusError::InvalidStream(msg)) if msg.contains("granule")
        ));
    }

    #[test]
    fn test_decode_zero_channels() {
        let data = headers(0, 0, 48000);
        let reader = OggOpusReader::open(data.as_slice()).unwrap();
        assert_eq!(reader.channels(), 0);
        assert!(matches!(
            reader.decode_all(),
            Err(OggOpusError::UnsupportedChannels(0))
        ));
    }

    #[test]
    fn test_decode_skips_other_streams() {
        let mut data = headers(1, 0, 48000);
        let mut other = OggEncoder::new(Vec::new(), 99);
        other.write_packet(&[0xFF; 3], 960, false, true).unwrap();
        data.extend_from_slice(&other.into_inner());

        let decoded = decode(&data).unwrap();
        assert_eq!(decoded.frame_count(), 0);
    }
}
