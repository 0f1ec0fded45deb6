//! Opus decoder.

use std::ptr;

use super::ffi::{self, OpusDecoder as OpusDecoderHandle};
use super::frame::Frame;

/// Opus decoder error.
#[derive(Debug)]
pub enum DecoderError {
    /// Failed to create decoder.
    CreateFailed(String),
    /// The packet TOC is malformed.
    InvalidPacket,
    /// Decoding failed.
    DecodeFailed(String),
}

impl std::fmt::Display for DecoderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateFailed(msg) => write!(f, "opus: decoder create failed: {}", msg),
            Self::InvalidPacket => write!(f, "opus: invalid packet"),
            Self::DecodeFailed(msg) => write!(f, "opus: decode failed: {}", msg),
        }
    }
}

impl std::error::Error for DecoderError {}

/// Opus decoder.
///
/// The libopus handle is released on drop.
pub struct Decoder {
    sample_rate: u32,
    channels: u16,
    handle: *mut OpusDecoderHandle,
}

// Safety: The decoder handle is owned exclusively and never shared across threads.
unsafe impl Send for Decoder {}

impl Drop for Decoder {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { ffi::opus_decoder_destroy(self.handle) };
            self.handle = ptr::null_mut();
        }
    }
}

impl Decoder {
    /// Creates a new Opus decoder.
    ///
    /// # Parameters
    /// - `sample_rate`: Sample rate to decode at (8000, 12000, 16000, 24000, or 48000)
    /// - `channels`: Number of channels (1 or 2)
    pub fn new(sample_rate: u32, channels: u16) -> Result<Self, DecoderError> {
        let mut error: i32 = 0;
        let handle = unsafe {
            ffi::opus_decoder_create(sample_rate as i32, channels as i32, &mut error)
        };

        if handle.is_null() || error != ffi::OPUS_OK {
            return Err(DecoderError::CreateFailed(ffi::error_string(error)));
        }

        Ok(Self {
            sample_rate,
            channels,
            handle,
        })
    }

    /// Decodes an Opus packet and appends interleaved f32 samples to `out`.
    ///
    /// The output region is sized from the packet TOC before decoding.
    /// Returns the number of samples per channel appended.
    pub fn decode_float_into(&mut self, frame: &Frame, out: &mut Vec<f32>) -> Result<usize, DecoderError> {
        let frame_size = frame
            .samples(self.sample_rate)
            .ok_or(DecoderError::InvalidPacket)? as usize;
        let channels = self.channels as usize;

        let start = out.len();
        out.resize(start + frame_size * channels, 0.0);

        let n = unsafe {
            ffi::opus_decode_float(
                self.handle,
                frame.as_bytes().as_ptr(),
                frame.len() as i32,
                out[start..].as_mut_ptr(),
                frame_size as i32,
                0, // decode_fec
            )
        };

        if n < 0 {
            out.truncate(start);
            return Err(DecoderError::DecodeFailed(ffi::error_string(n)));
        }

        out.truncate(start + n as usize * channels);
        Ok(n as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::encoder::{Application, Encoder};

    #[test]
    fn test_decoder_create() {
        assert!(Decoder::new(16000, 1).is_ok());
        assert!(Decoder::new(8000, 2).is_ok());
    }

    #[test]
    fn test_decoder_create_invalid() {
        assert!(matches!(Decoder::new(44100, 1), Err(DecoderError::CreateFailed(_))));
        assert!(matches!(Decoder::new(48000, 3), Err(DecoderError::CreateFailed(_))));
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let mut encoder = Encoder::new(16000, 1, Application::VoIP).unwrap();
        let mut decoder = Decoder::new(16000, 1).unwrap();

        let pcm: Vec<i16> = (0..320).map(|i| (i * 100 % 32768) as i16).collect();

        let frame = encoder.encode(&pcm, 320).unwrap();
        let mut decoded = Vec::new();
        assert_eq!(decoder.decode_float_into(&frame, &mut decoded).unwrap(), 320);
        assert_eq!(decoded.len(), 320);
    }

    #[test]
    fn test_decode_stereo_appends() {
        let mut encoder = Encoder::new(48000, 2, Application::Audio).unwrap();
        let mut decoder = Decoder::new(48000, 2).unwrap();
        let frame = encoder.encode_float(&vec![0.0f32; 960 * 2], 960).unwrap();

        let mut out = vec![1.0f32; 4];
        let n = decoder.decode_float_into(&frame, &mut out).unwrap();
        assert_eq!(n, 960);
        assert_eq!(out.len(), 4 + 960 * 2);
        assert_eq!(&out[..4], &[1.0; 4]);
    }

    #[test]
    fn test_decode_invalid_packet() {
        let mut decoder = Decoder::new(48000, 1).unwrap();
        let mut out = Vec::new();
        let result = decoder.decode_float_into(&Frame::new(vec![]), &mut out);
        assert!(matches!(result, Err(DecoderError::InvalidPacket)));
        assert!(out.is_empty());
    }
}
