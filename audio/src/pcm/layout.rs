//! Channel layout resolution.

use std::fmt;

use crate::error::{Error, Result};

/// Canonical channel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    /// One channel.
    Mono,
    /// Two channels, left then right.
    Stereo,
}

impl ChannelLayout {
    /// Returns the number of channels in this layout.
    pub const fn channels(&self) -> u16 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }
}

impl TryFrom<u16> for ChannelLayout {
    type Error = Error;

    fn try_from(channels: u16) -> Result<Self> {
        resolve_layout(channels)
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mono => write!(f, "mono"),
            Self::Stereo => write!(f, "stereo"),
        }
    }
}

/// Maps a channel count to its canonical layout.
pub fn resolve_layout(channels: u16) -> Result<ChannelLayout> {
    match channels {
        1 => Ok(ChannelLayout::Mono),
        2 => Ok(ChannelLayout::Stereo),
        n => Err(Error::UnsupportedChannelCount(n)),
    }
}
