//! Conversion orchestrators between Ogg/Opus files and container files.
//!
//! [`Converter`] chains file I/O, the decode or encode adapter and a
//! [`ContainerIo`] backend. The free functions use [`WavContainer`] with
//! default options.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::container::{ContainerIo, WavContainer};
use crate::error::{Error, Result};
use crate::options::ConvertOptions;
use crate::pcm::{AudioFormat, PcmBuffer, SampleFormat};

mod decode;
mod encode;

pub use decode::decode;
pub use encode::encode;

/// Runs conversions through a container backend.
#[derive(Debug, Clone, Default)]
pub struct Converter<C: ContainerIo = WavContainer> {
    container: C,
    options: ConvertOptions,
}

impl<C: ContainerIo> Converter<C> {
    /// Creates a converter.
    pub fn new(container: C, options: ConvertOptions) -> Self {
        Self { container, options }
    }

    /// Returns the options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Decodes an in-memory Ogg/Opus bitstream.
    pub fn decode_to_buffer(&self, compressed: &[u8]) -> Result<PcmBuffer> {
        decode(compressed).map(|(buffer, _)| buffer)
    }

    /// Encodes a buffer at its own sample rate with the configured options.
    pub fn encode_buffer(&self, buffer: &PcmBuffer) -> Result<Vec<u8>> {
        encode(
            buffer,
            buffer.format().sample_rate,
            self.options.application,
            &self.options.encoder,
        )
    }

    /// Decodes the Ogg/Opus file `src` and writes it to the container file `dest`.
    ///
    /// Nothing is written to `dest` unless decoding succeeds.
    pub fn compressed_to_container_file(&self, src: &Path, dest: &Path) -> Result<()> {
        let compressed = fs::read(src).map_err(Error::external)?;
        debug!(src = %src.display(), bytes = compressed.len(), "opusconv: read compressed");

        let (buffer, format) = decode(&compressed)?;
        self.container.write(dest, &buffer)?;

        info!(
            src = %src.display(),
            dest = %dest.display(),
            %format,
            frames = buffer.frame_count(),
            "opusconv: decoded to container"
        );
        Ok(())
    }

    /// Encodes the container file `src` into the Ogg/Opus file `dest`.
    ///
    /// The file is read as planar i16, so only its first channel is encoded.
    /// `dest` is replaced in full.
    pub fn container_file_to_compressed(&self, src: &Path, dest: &Path) -> Result<()> {
        let frames = self.container.read(src, SampleFormat::I16, false)?;
        let format = AudioFormat::planar(frames.sample_rate, frames.channels, SampleFormat::I16);
        let buffer = PcmBuffer::from_planes(&frames.planes, format)?;

        let compressed = self.encode_buffer(&buffer)?;
        fs::write(dest, &compressed).map_err(Error::external)?;

        info!(
            src = %src.display(),
            dest = %dest.display(),
            %format,
            frames = buffer.frame_count(),
            application = %self.options.application,
            bytes = compressed.len(),
            "opusconv: encoded from container"
        );
        Ok(())
    }
}

/// Decodes `src` into a WAV file at `dest` with default options.
pub fn compressed_to_container_file(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<()> {
    Converter::<WavContainer>::default().compressed_to_container_file(src.as_ref(), dest.as_ref())
}

/// Encodes the WAV file `src` into an Ogg/Opus file at `dest` with default options.
pub fn container_file_to_compressed(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<()> {
    Converter::<WavContainer>::default().container_file_to_compressed(src.as_ref(), dest.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ContainerFrames;
    use crate::pcm::sample::i16_to_le;
    use std::cell::RefCell;
    use std::path::PathBuf;

    /// In-memory backend recording writes.
    #[derive(Default)]
    struct MemoryContainer {
        frames: Option<ContainerFrames>,
        written: RefCell<Vec<(PathBuf, PcmBuffer)>>,
    }

    impl ContainerIo for MemoryContainer {
        fn read(&self, _path: &Path, _forced: SampleFormat, _interleaved: bool) -> Result<ContainerFrames> {
            self.frames
                .clone()
                .ok_or_else(|| Error::external("no frames"))
        }

        fn write(&self, path: &Path, buffer: &PcmBuffer) -> Result<()> {
            self.written
                .borrow_mut()
                .push((path.to_path_buf(), buffer.clone()));
            Ok(())
        }
    }

    #[test]
    fn test_converter_with_custom_backend() {
        let dir = tempfile::tempdir().unwrap();
        let ogg = dir.path().join("out.ogg");

        let samples = vec![500i16; 1600];
        let container = MemoryContainer {
            frames: Some(ContainerFrames {
                planes: vec![i16_to_le(&samples)],
                sample_rate: 16000,
                channels: 1,
                frame_count: 1600,
            }),
            ..Default::default()
        };
        let converter = Converter::new(container, ConvertOptions::default());

        converter
            .container_file_to_compressed(Path::new("in.wav"), &ogg)
            .unwrap();
        assert!(ogg.exists());

        converter
            .compressed_to_container_file(&ogg, Path::new("back.wav"))
            .unwrap();
        let written = converter.container.written.borrow();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, PathBuf::from("back.wav"));
        assert_eq!(
            written[0].1.format(),
            AudioFormat::interleaved(16000, 1, SampleFormat::F32)
        );
        assert_eq!(written[0].1.frame_count(), 1600);
    }

    #[test]
    fn test_decode_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("bad.ogg");
        fs::write(&src, b"garbage").unwrap();

        let converter = Converter::new(MemoryContainer::default(), ConvertOptions::default());
        assert!(matches!(
            converter.compressed_to_container_file(&src, Path::new("never.wav")),
            Err(Error::DecoderInitFailed(_))
        ));
        assert!(converter.container.written.borrow().is_empty());
    }

    #[test]
    fn test_read_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.ogg");
        let converter = Converter::new(MemoryContainer::default(), ConvertOptions::default());
        assert!(matches!(
            converter.container_file_to_compressed(Path::new("in.wav"), &dest),
            Err(Error::External(_))
        ));
        assert!(!dest.exists());
    }
}
