//! Opus audio codec.
//!
//! Thin bindings to libopus (RFC 6716) plus pure-Rust TOC parsing used to
//! size decode buffers exactly.
//!
//! # Example
//!
//! ```ignore
//! use opusconv_audio::codec::opus::{Application, Decoder, Encoder};
//!
//! let mut encoder = Encoder::new(16000, 1, Application::VoIP)?;
//! encoder.set_bitrate(24000)?;
//!
//! let pcm: Vec<i16> = vec![0i16; 320]; // 20ms at 16kHz
//! let frame = encoder.encode(&pcm, 320)?;
//!
//! let mut decoder = Decoder::new(16000, 1)?;
//! let mut decoded = Vec::new();
//! decoder.decode_float_into(&frame, &mut decoded)?;
//! ```

mod ffi;
mod encoder;
mod decoder;
mod frame;
mod toc;

pub use encoder::*;
pub use decoder::*;
pub use frame::*;
pub use toc::*;
pub use ffi::{is_supported_sample_rate, SUPPORTED_SAMPLE_RATES};
