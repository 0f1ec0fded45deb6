//! PCM (Pulse Code Modulation) buffer handling.
//!
//! # Key Types
//!
//! - [`AudioFormat`]: sample rate, channels, sample representation and interleaving
//! - [`PcmBuffer`]: an owned byte region validated against its format
//! - [`ChannelLayout`]: canonical layout for a channel count
//!
//! # Example
//!
//! ```rust
//! use opusconv_audio::pcm::{build_buffer, AudioFormat, SampleFormat};
//!
//! // 10 frames of 16kHz mono i16
//! let format = AudioFormat::interleaved(16000, 1, SampleFormat::I16);
//! let buffer = build_buffer(&[0u8; 20], format).unwrap();
//! assert_eq!(buffer.frame_count(), 10);
//! ```

mod buffer;
mod format;
mod layout;
pub mod sample;

pub use buffer::{build_buffer, extract_channel_bytes, PcmBuffer};
pub use format::{AudioFormat, SampleFormat};
pub use layout::{resolve_layout, ChannelLayout};
