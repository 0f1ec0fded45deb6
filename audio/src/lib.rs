//! Bidirectional Ogg/Opus <-> PCM conversion.
//!
//! - `pcm`: PCM buffers, formats and channel layouts
//! - `codec`: Opus, Ogg and Ogg/Opus codecs
//! - `container`: uncompressed container file I/O (WAV)
//! - `convert`: decode/encode adapters and file orchestrators
//!
//! # Example
//!
//! ```no_run
//! use opusconv_audio::convert::{compressed_to_container_file, container_file_to_compressed};
//!
//! // Ogg/Opus -> WAV (f32)
//! compressed_to_container_file("speech.ogg", "speech.wav")?;
//!
//! // WAV -> Ogg/Opus (first channel, VoIP)
//! container_file_to_compressed("speech.wav", "speech.ogg")?;
//! # Ok::<(), opusconv_audio::Error>(())
//! ```

pub mod codec;
pub mod container;
pub mod convert;
pub mod error;
pub mod options;
pub mod pcm;

pub use codec::opus::{Application, FrameDuration};
pub use container::{ContainerFrames, ContainerIo, WavContainer};
pub use convert::{compressed_to_container_file, container_file_to_compressed, Converter};
pub use error::{Error, Result};
pub use options::ConvertOptions;
pub use pcm::{AudioFormat, PcmBuffer, SampleFormat};
