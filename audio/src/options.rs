//! Conversion options.

use serde::{Deserialize, Serialize};

use crate::codec::oggopus::EncoderOptions;
use crate::codec::opus::Application;

/// Options shared by both conversion directions.
///
/// ```yaml
/// application: voip
/// bitrate: 24000
/// complexity: 8
/// frame_duration: 20ms
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Encoder application mode.
    pub application: Application,
    #[serde(flatten)]
    pub encoder: EncoderOptions,
}
