//! Opus encoder.

use std::ptr;

use serde::{Deserialize, Serialize};

use super::ffi::{self, OpusEncoder as OpusEncoderHandle};
use super::frame::Frame;
use super::toc::FrameDuration;

/// Opus application type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Application {
    /// Best quality for voice signals.
    #[default]
    #[serde(rename = "voip", alias = "voice")]
    VoIP,
    /// Best quality for non-voice signals.
    #[serde(rename = "audio")]
    Audio,
    /// Minimum possible coding delay.
    #[serde(rename = "restricted_lowdelay")]
    RestrictedLowdelay,
}

impl Application {
    fn to_ffi(&self) -> i32 {
        match self {
            Self::VoIP => ffi::OPUS_APPLICATION_VOIP,
            Self::Audio => ffi::OPUS_APPLICATION_AUDIO,
            Self::RestrictedLowdelay => ffi::OPUS_APPLICATION_RESTRICTED_LOWDELAY,
        }
    }
}

impl std::fmt::Display for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VoIP => write!(f, "voip"),
            Self::Audio => write!(f, "audio"),
            Self::RestrictedLowdelay => write!(f, "restricted_lowdelay"),
        }
    }
}

/// Opus encoder error.
#[derive(Debug)]
pub enum EncoderError {
    /// Failed to create encoder.
    CreateFailed(String),
    /// Encoding failed.
    EncodeFailed(String),
    /// Failed to set or query an option.
    SetOptionFailed(String),
    /// The PCM slice holds fewer samples than the frame needs.
    ShortInput { expected: usize, got: usize },
}

impl std::fmt::Display for EncoderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateFailed(msg) => write!(f, "opus: encoder create failed: {}", msg),
            Self::EncodeFailed(msg) => write!(f, "opus: encode failed: {}", msg),
            Self::SetOptionFailed(msg) => write!(f, "opus: set option failed: {}", msg),
            Self::ShortInput { expected, got } => {
                write!(f, "opus: short input: need {} samples, got {}", expected, got)
            }
        }
    }
}

impl std::error::Error for EncoderError {}

/// Opus encoder.
///
/// The libopus handle is released on drop.
pub struct Encoder {
    sample_rate: u32,
    channels: u16,
    handle: *mut OpusEncoderHandle,
}

// Safety: The encoder handle is owned exclusively and never shared across threads.
unsafe impl Send for Encoder {}

impl Drop for Encoder {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { ffi::opus_encoder_destroy(self.handle) };
            self.handle = ptr::null_mut();
        }
    }
}

impl Encoder {
    /// Creates a new Opus encoder.
    ///
    /// # Parameters
    /// - `sample_rate`: Sample rate (8000, 12000, 16000, 24000, or 48000)
    /// - `channels`: Number of channels (1 or 2)
    /// - `application`: Intended application type
    pub fn new(sample_rate: u32, channels: u16, application: Application) -> Result<Self, EncoderError> {
        let mut error: i32 = 0;
        let handle = unsafe {
            ffi::opus_encoder_create(
                sample_rate as i32,
                channels as i32,
                application.to_ffi(),
                &mut error,
            )
        };

        if handle.is_null() || error != ffi::OPUS_OK {
            return Err(EncoderError::CreateFailed(ffi::error_string(error)));
        }

        Ok(Self {
            sample_rate,
            channels,
            handle,
        })
    }

    fn check_input(&self, len: usize, frame_size: usize) -> Result<(), EncoderError> {
        let expected = frame_size * self.channels as usize;
        if len < expected {
            return Err(EncoderError::ShortInput { expected, got: len });
        }
        Ok(())
    }

    /// Encodes interleaved i16 samples to an Opus frame.
    ///
    /// # Parameters
    /// - `pcm`: Input PCM samples (frame_size * channels samples)
    /// - `frame_size`: Number of samples per channel
    pub fn encode(&mut self, pcm: &[i16], frame_size: usize) -> Result<Frame, EncoderError> {
        self.check_input(pcm.len(), frame_size)?;

        let mut buf = vec![0u8; ffi::MAX_PACKET_BYTES];
        let n = unsafe {
            ffi::opus_encode(
                self.handle,
                pcm.as_ptr(),
                frame_size as i32,
                buf.as_mut_ptr(),
                buf.len() as i32,
            )
        };

        if n < 0 {
            return Err(EncoderError::EncodeFailed(ffi::error_string(n)));
        }

        buf.truncate(n as usize);
        Ok(Frame::new(buf))
    }

    /// Encodes interleaved f32 samples to an Opus frame.
    pub fn encode_float(&mut self, pcm: &[f32], frame_size: usize) -> Result<Frame, EncoderError> {
        self.check_input(pcm.len(), frame_size)?;

        let mut buf = vec![0u8; ffi::MAX_PACKET_BYTES];
        let n = unsafe {
            ffi::opus_encode_float(
                self.handle,
                pcm.as_ptr(),
                frame_size as i32,
                buf.as_mut_ptr(),
                buf.len() as i32,
            )
        };

        if n < 0 {
            return Err(EncoderError::EncodeFailed(ffi::error_string(n)));
        }

        buf.truncate(n as usize);
        Ok(Frame::new(buf))
    }

    /// Sets the target bitrate in bits per second.
    pub fn set_bitrate(&mut self, bitrate: i32) -> Result<(), EncoderError> {
        let ret = unsafe {
            ffi::opus_encoder_ctl(self.handle, ffi::OPUS_SET_BITRATE_REQUEST, bitrate)
        };

        if ret != ffi::OPUS_OK {
            return Err(EncoderError::SetOptionFailed(ffi::error_string(ret)));
        }

        Ok(())
    }

    /// Sets the encoder complexity (0-10).
    pub fn set_complexity(&mut self, complexity: i32) -> Result<(), EncoderError> {
        let ret = unsafe {
            ffi::opus_encoder_ctl(self.handle, ffi::OPUS_SET_COMPLEXITY_REQUEST, complexity)
        };

        if ret != ffi::OPUS_OK {
            return Err(EncoderError::SetOptionFailed(ffi::error_string(ret)));
        }

        Ok(())
    }

    /// Returns the encoder lookahead in samples per channel at the encoder rate.
    pub fn lookahead(&self) -> Result<u32, EncoderError> {
        let mut value: i32 = 0;
        let ret = unsafe {
            ffi::opus_encoder_ctl(
                self.handle,
                ffi::OPUS_GET_LOOKAHEAD_REQUEST,
                &mut value as *mut i32,
            )
        };

        if ret != ffi::OPUS_OK || value < 0 {
            return Err(EncoderError::SetOptionFailed(ffi::error_string(ret)));
        }

        Ok(value as u32)
    }

    /// Returns the frame size for a given duration.
    pub fn frame_size_for_duration(&self, fd: FrameDuration) -> usize {
        fd.samples(self.sample_rate) as usize
    }
}
