//! OpusHead and OpusTags header packets.

use super::OggOpusError;

/// Magic signature of the identification header.
pub const OPUS_HEAD_MAGIC: &[u8; 8] = b"OpusHead";

/// Magic signature of the comment header.
pub const OPUS_TAGS_MAGIC: &[u8; 8] = b"OpusTags";

const OPUS_HEAD_SIZE: usize = 19;

/// Identification header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpusHead {
    /// Encapsulation version; only major version 0 is accepted.
    pub version: u8,
    /// Output channel count.
    pub channels: u8,
    /// Samples (at 48kHz) to discard from the decoder output at stream start.
    pub pre_skip: u16,
    /// Sample rate of the original input, informational.
    pub input_sample_rate: u32,
    /// Output gain in Q7.8 dB.
    pub output_gain: i16,
    /// Channel mapping family.
    pub mapping_family: u8,
}

impl OpusHead {
    /// Creates a version 1 header with mapping family 0.
    pub fn new(channels: u8, pre_skip: u16, input_sample_rate: u32) -> Self {
        Self {
            version: 1,
            channels,
            pre_skip,
            input_sample_rate,
            output_gain: 0,
            mapping_family: 0,
        }
    }

    /// Parses an identification header packet.
    pub fn parse(data: &[u8]) -> Result<Self, OggOpusError> {
        if data.len() < OPUS_HEAD_SIZE || &data[..8] != OPUS_HEAD_MAGIC {
            return Err(OggOpusError::invalid("missing OpusHead"));
        }

        let version = data[8];
        if version >> 4 != 0 {
            return Err(OggOpusError::invalid(format!(
                "unsupported OpusHead version {}",
                version
            )));
        }

        // The channel count is not checked here; callers resolve layouts.
        Ok(Self {
            version,
            channels: data[9],
            pre_skip: u16::from_le_bytes([data[10], data[11]]),
            input_sample_rate: u32::from_le_bytes([data[12], data[13], data[14], data[15]]),
            output_gain: i16::from_le_bytes([data[16], data[17]]),
            mapping_family: data[18],
        })
    }

    /// Serializes the header.
    ///
    /// Only mapping family 0 is written, so no channel mapping table follows.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(OPUS_HEAD_SIZE);
        out.extend_from_slice(OPUS_HEAD_MAGIC);
        out.push(self.version);
        out.push(self.channels);
        out.extend_from_slice(&self.pre_skip.to_le_bytes());
        out.extend_from_slice(&self.input_sample_rate.to_le_bytes());
        out.extend_from_slice(&self.output_gain.to_le_bytes());
        out.push(self.mapping_family);
        out
    }
}

/// Comment header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpusTags {
    pub vendor: String,
    pub comments: Vec<String>,
}

impl Default for OpusTags {
    fn default() -> Self {
        Self {
            vendor: concat!("opusconv ", env!("CARGO_PKG_VERSION")).to_string(),
            comments: Vec::new(),
        }
    }
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], OggOpusError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| OggOpusError::invalid("truncated OpusTags"))?;
        let out = &self.data[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn u32(&mut self) -> Result<u32, OggOpusError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn string(&mut self) -> Result<String, OggOpusError> {
        let len = self.u32()? as usize;
        Ok(String::from_utf8_lossy(self.take(len)?).into_owned())
    }
}

impl OpusTags {
    /// Parses a comment header packet.
    pub fn parse(data: &[u8]) -> Result<Self, OggOpusError> {
        if data.len() < 8 || &data[..8] != OPUS_TAGS_MAGIC {
            return Err(OggOpusError::invalid("missing OpusTags"));
        }

        let mut cursor = Cursor { data, pos: 8 };
        let vendor = cursor.string()?;
        let count = cursor.u32()? as usize;

        // Each comment needs at least its 4-byte length.
        if count > (data.len() - cursor.pos) / 4 {
            return Err(OggOpusError::invalid("truncated OpusTags"));
        }

        let mut comments = Vec::with_capacity(count);
        for _ in 0..count {
            comments.push(cursor.string()?);
        }

        Ok(Self { vendor, comments })
    }

    /// Serializes the header.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(OPUS_TAGS_MAGIC);
        out.extend_from_slice(&(self.vendor.len() as u32).to_le_bytes());
        out.extend_from_slice(self.vendor.as_bytes());
        out.extend_from_slice(&(self.comments.len() as u32).to_le_bytes());
        for comment in &self.comments {
            out.extend_from_slice(&(comment.len() as u32).to_le_bytes());
            out.extend_from_slice(comment.as_bytes());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opus_head_layout() {
        let head = OpusHead::new(2, 312, 16000);
        let bytes = head.to_bytes();
        assert_eq!(bytes.len(), 19);
        assert_eq!(&bytes[..8], b"OpusHead");
        assert_eq!(bytes[8], 1);
        assert_eq!(bytes[9], 2);
        assert_eq!(u16::from_le_bytes([bytes[10], bytes[11]]), 312);
        assert_eq!(u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]), 16000);
        assert_eq!(bytes[18], 0);

        assert_eq!(OpusHead::parse(&bytes).unwrap(), head);
    }

    #[test]
    fn test_opus_head_rejects() {
        assert!(OpusHead::parse(b"OpusHead").is_err());
        assert!(OpusHead::parse(&[0u8; 19]).is_err());

        let mut bytes = OpusHead::new(1, 0, 48000).to_bytes();
        bytes[8] = 0x10;
        assert!(OpusHead::parse(&bytes).is_err());
    }

    #[test]
    fn test_opus_head_keeps_zero_channels() {
        let mut bytes = OpusHead::new(1, 0, 48000).to_bytes();
        bytes[9] = 0;
        assert_eq!(OpusHead::parse(&bytes).unwrap().channels, 0);
    }

    #[test]
    fn test_opus_head_output_gain() {
        let mut head = OpusHead::new(1, 312, 48000);
        head.output_gain = -1541;
        let bytes = head.to_bytes();
        assert_eq!(i16::from_le_bytes([bytes[16], bytes[17]]), -1541);
        assert_eq!(OpusHead::parse(&bytes).unwrap().output_gain, -1541);
    }

    #[test]
    fn test_opus_head_accepts_minor_versions() {
        let mut bytes = OpusHead::new(1, 0, 48000).to_bytes();
        bytes[8] = 0x0F;
        assert_eq!(OpusHead::parse(&bytes).unwrap().version, 0x0F);
    }

    #[test]
    fn test_opus_tags() {
        let tags = OpusTags {
            vendor: "libopus".to_string(),
            comments: vec!["TITLE=test".to_string(), "ARTIST=me".to_string()],
        };
        let bytes = tags.to_bytes();
        assert_eq!(&bytes[..8], b"OpusTags");
        assert_eq!(OpusTags::parse(&bytes).unwrap(), tags);
    }

    #[test]
    fn test_opus_tags_truncated() {
        let bytes = OpusTags::default().to_bytes();
        assert!(OpusTags::parse(&bytes[..bytes.len() - 1]).is_err());

        // Vendor length pointing past the end.
        let mut bytes = b"OpusTags".to_vec();
        bytes.extend_from_slice(&1000u32.to_le_bytes());
        assert!(OpusTags::parse(&bytes).is_err());

        // Absurd comment count.
        let mut bytes = b"OpusTags".to_vec();
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(OpusTags::parse(&bytes).is_err());
    }

    #[test]
    fn test_opus_tags_default_vendor() {
        assert!(OpusTags::default().vendor.starts_with("opusconv"));
    }
}
