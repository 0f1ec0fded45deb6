//! WAV backend built on `hound`.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::{ContainerFrames, ContainerIo};
use crate::error::{Error, Result};
use crate::pcm::sample::{self, f32_from_le, f32_to_i16, f32_to_le, i16_from_le, i16_to_le};
use crate::pcm::{PcmBuffer, SampleFormat};

/// Reads integer or float WAV files, writes 16-bit int or 32-bit float.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavContainer;

impl WavContainer {
    pub fn new() -> Self {
        Self
    }
}

/// Rescales an integer sample of `bits` width to 16 bits.
fn int_to_i16(s: i32, bits: u16) -> i16 {
    if bits >= 16 {
        (s >> (bits - 16)) as i16
    } else {
        (s << (16 - bits)) as i16
    }
}

fn read_samples<R: std::io::Read>(
    reader: hound::WavReader<R>,
    forced: SampleFormat,
) -> Result<Vec<u8>> {
    let spec = reader.spec();
    let bytes = match (spec.sample_format, forced) {
        (hound::SampleFormat::Int, SampleFormat::I16) => {
            let bits = spec.bits_per_sample;
            let samples = reader
                .into_samples::<i32>()
                .map(|s| s.map(|s| int_to_i16(s, bits)))
                .collect::<std::result::Result<Vec<i16>, _>>()?;
            i16_to_le(&samples)
        }
        (hound::SampleFormat::Int, SampleFormat::F32) => {
            let max_val = (1u64 << (spec.bits_per_sample - 1)) as f32;
            let samples = reader
                .into_samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_val))
                .collect::<std::result::Result<Vec<f32>, _>>()?;
            f32_to_le(&samples)
        }
        (hound::SampleFormat::Float, SampleFormat::F32) => {
            let samples = reader
                .into_samples::<f32>()
                .collect::<std::result::Result<Vec<f32>, _>>()?;
            f32_to_le(&samples)
        }
        (hound::SampleFormat::Float, SampleFormat::I16) => {
            let samples = reader
                .into_samples::<f32>()
                .map(|s| s.map(f32_to_i16))
                .collect::<std::result::Result<Vec<i16>, _>>()?;
            i16_to_le(&samples)
        }
    };
    Ok(bytes)
}

fn write_samples(path: &Path, buffer: &PcmBuffer) -> Result<()> {
    let format = buffer.format();
    let spec = hound::WavSpec {
        channels: format.channels,
        sample_rate: format.sample_rate,
        bits_per_sample: format.sample_format.bits(),
        sample_format: match format.sample_format {
            SampleFormat::I16 => hound::SampleFormat::Int,
            SampleFormat::F32 => hound::SampleFormat::Float,
        },
    };

    let bytes = buffer.interleaved_bytes();
    let mut writer = hound::WavWriter::create(path, spec)?;
    match format.sample_format {
        SampleFormat::I16 => {
            for s in i16_from_le(&bytes) {
                writer.write_sample(s)?;
            }
        }
        SampleFormat::F32 => {
            for s in f32_from_le(&bytes) {
                writer.write_sample(s)?;
            }
        }
    }
    writer.finalize()?;
    Ok(())
}

impl ContainerIo for WavContainer {
    fn read(&self, path: &Path, forced: SampleFormat, interleaved: bool) -> Result<ContainerFrames> {
        let reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        if spec.channels == 0 {
            return Err(Error::UnsupportedChannelCount(0));
        }

        let bytes = read_samples(reader, forced)?;
        let channels = spec.channels as usize;
        let frame_count = bytes.len() / (forced.bytes_per_sample() * channels);

        let planes = if interleaved || channels == 1 {
            vec![bytes]
        } else {
            sample::deinterleave(&bytes, channels, forced.bytes_per_sample())
        };

        debug!(
            path = %path.display(),
            sample_rate = spec.sample_rate,
            channels = spec.channels,
            bits = spec.bits_per_sample,
            frame_count,
            "wav: read"
        );

        Ok(ContainerFrames {
            planes,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            frame_count,
        })
    }

    fn write(&self, path: &Path, buffer: &PcmBuffer) -> Result<()> {
        let result = write_samples(path, buffer);
        if result.is_err() {
            let _ = fs::remove_file(path);
        } else {
            debug!(
                path = %path.display(),
                format = %buffer.format(),
                frame_count = buffer.frame_count(),
                "wav: wrote"
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm::{build_buffer, AudioFormat};

    fn write_int_wav(path: &Path, channels: u16, bits: u16, samples: &[i32]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 16000,
            bits_per_sample: bits,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_int_to_i16() {
        assert_eq!(int_to_i16(i16::MAX as i32, 16), i16::MAX);
        assert_eq!(int_to_i16(127, 8), 127 << 8);
        assert_eq!(int_to_i16(-8_388_608, 24), i16::MIN);
    }

    #[test]
    fn test_read_planar_i16() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_int_wav(&path, 2, 16, &[1, -1, 2, -2, 3, -3]);

        let frames = WavContainer.read(&path, SampleFormat::I16, false).unwrap();
        assert_eq!(frames.channels, 2);
        assert_eq!(frames.sample_rate, 16000);
        assert_eq!(frames.frame_count, 3);
        assert_eq!(frames.planes.len(), 2);
        assert_eq!(i16_from_le(&frames.planes[0]), vec![1, 2, 3]);
        assert_eq!(i16_from_le(&frames.planes[1]), vec![-1, -2, -3]);
    }

    #[test]
    fn test_read_interleaved_f32_from_int() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        write_int_wav(&path, 1, 16, &[16384, -32768]);

        let frames = WavContainer.read(&path, SampleFormat::F32, true).unwrap();
        assert_eq!(frames.planes.len(), 1);
        assert_eq!(f32_from_le(&frames.planes[0]), vec![0.5, -1.0]);
    }

    #[test]
    fn test_read_24bit_as_i16() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hires.wav");
        write_int_wav(&path, 1, 24, &[256, -256]);

        let frames = WavContainer.read(&path, SampleFormat::I16, true).unwrap();
        assert_eq!(i16_from_le(&frames.planes[0]), vec![1, -1]);
    }

    #[test]
    fn test_write_then_read_float() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");

        let samples = [0.25f32, -0.25, 0.5, -0.5];
        let format = AudioFormat::interleaved(48000, 2, SampleFormat::F32);
        let buffer = build_buffer(&f32_to_le(&samples), format).unwrap();
        WavContainer.write(&path, &buffer).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 48000);
        assert_eq!(spec.bits_per_sample, 32);
        assert_eq!(spec.sample_format, hound::SampleFormat::Float);

        let frames = WavContainer.read(&path, SampleFormat::F32, true).unwrap();
        assert_eq!(f32_from_le(&frames.planes[0]), samples.to_vec());
    }

    #[test]
    fn test_write_planar_interleaves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planar.wav");

        let format = AudioFormat::planar(8000, 2, SampleFormat::I16);
        let planes = [i16_to_le(&[1, 2]), i16_to_le(&[-1, -2])];
        let buffer = PcmBuffer::from_planes(&planes, format).unwrap();
        WavContainer.write(&path, &buffer).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![1, -1, 2, -2]);
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        std::fs::write(&path, b"stale contents that are not a wav file").unwrap();

        let format = AudioFormat::interleaved(16000, 1, SampleFormat::I16);
        let buffer = build_buffer(&i16_to_le(&[7, 8, 9]), format).unwrap();
        WavContainer.write(&path, &buffer).unwrap();

        let frames = WavContainer.read(&path, SampleFormat::I16, true).unwrap();
        assert_eq!(frames.frame_count, 3);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = WavContainer
            .read(&dir.path().join("nope.wav"), SampleFormat::I16, true)
            .unwrap_err();
        assert_eq!(err.as_io().map(|e| e.kind()), Some(std::io::ErrorKind::NotFound));
    }

    #[test]
    fn test_write_into_missing_dir_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.wav");
        let format = AudioFormat::interleaved(16000, 1, SampleFormat::I16);
        let buffer = build_buffer(&[0u8; 4], format).unwrap();
        assert!(WavContainer.write(&path, &buffer).is_err());
        assert!(!path.exists());
    }
}
