//! Sample conversions between little-endian byte regions and typed samples.
//!
//! Trailing bytes that do not form a whole sample are ignored; callers pass
//! regions already validated against a frame stride.

/// Decodes little-endian i16 samples.
pub fn i16_from_le(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect()
}

/// Decodes little-endian f32 samples.
pub fn f32_from_le(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

/// Encodes i16 samples as little-endian bytes.
pub fn i16_to_le(samples: &[i16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len() * 2);
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

/// Encodes f32 samples as little-endian bytes.
pub fn f32_to_le(samples: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len() * 4);
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

/// Converts a float sample to i16, clamping to [-1.0, 1.0].
#[inline]
pub fn f32_to_i16(s: f32) -> i16 {
    (s.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

/// Converts an i16 sample to float.
#[inline]
pub fn i16_to_f32(s: i16) -> f32 {
    s as f32 / 32768.0
}

/// Splits an interleaved region into one run per channel.
pub fn deinterleave(bytes: &[u8], channels: usize, bytes_per_sample: usize) -> Vec<Vec<u8>> {
    if channels == 0 || bytes_per_sample == 0 {
        return Vec::new();
    }
    let frame = channels * bytes_per_sample;
    let frames = bytes.len() / frame;
    let mut planes: Vec<Vec<u8>> = (0..channels)
        .map(|_| Vec::with_capacity(frames * bytes_per_sample))
        .collect();
    for chunk in bytes.chunks_exact(frame) {
        for (c, sample) in chunk.chunks_exact(bytes_per_sample).enumerate() {
            planes[c].extend_from_slice(sample);
        }
    }
    planes
}

/// Joins equal-length channel runs into one interleaved region.
///
/// The frame count is taken from the shortest run.
pub fn interleave<P: AsRef<[u8]>>(planes: &[P], bytes_per_sample: usize) -> Vec<u8> {
    if planes.is_empty() || bytes_per_sample == 0 {
        return Vec::new();
    }
    let frames = planes
        .iter()
        .map(|p| p.as_ref().len() / bytes_per_sample)
        .min()
        .unwrap_or(0);
    let mut out = Vec::with_capacity(frames * planes.len() * bytes_per_sample);
    for i in 0..frames {
        let start = i * bytes_per_sample;
        for plane in planes {
            out.extend_from_slice(&plane.as_ref()[start..start + bytes_per_sample]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i16_le() {
        let samples = vec![1000i16, -2000, i16::MIN, i16::MAX];
        let bytes = i16_to_le(&samples);
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[..2], &1000i16.to_le_bytes());
        assert_eq!(i16_from_le(&bytes), samples);
    }

    #[test]
    fn test_f32_from_le_ignores_partial_sample() {
        let mut bytes = f32_to_le(&[0.5, -0.25]);
        bytes.push(0xFF);
        assert_eq!(f32_from_le(&bytes), vec![0.5, -0.25]);
    }

    #[test]
    fn test_f32_to_i16_clamps() {
        assert_eq!(f32_to_i16(2.0), i16::MAX);
        assert_eq!(f32_to_i16(-2.0), -i16::MAX);
        assert_eq!(f32_to_i16(0.0), 0);
        assert_eq!(i16_to_f32(-32768), -1.0);
    }

    #[test]
    fn test_deinterleave_interleave() {
        // L0 R0 L1 R1 as i16
        let bytes = i16_to_le(&[1, 2, 3, 4]);
        let planes = deinterleave(&bytes, 2, 2);
        assert_eq!(planes.len(), 2);
        assert_eq!(i16_from_le(&planes[0]), vec![1, 3]);
        assert_eq!(i16_from_le(&planes[1]), vec![2, 4]);

        assert_eq!(interleave(&planes, 2), bytes);
    }

    #[test]
    fn test_interleave_uses_shortest_plane() {
        let planes = vec![i16_to_le(&[1, 2, 3]), i16_to_le(&[4, 5])];
        assert_eq!(i16_from_le(&interleave(&planes, 2)), vec![1, 4, 2, 5]);
    }

    #[test]
    fn test_deinterleave_zero_channels() {
        assert!(deinterleave(&[1, 2, 3, 4], 0, 2).is_empty());
    }
}
