//! Configuration loading.
//!
//! Options are read from ~/.opusconv/config.yaml unless `--config` names
//! another file.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use opusconv_audio::ConvertOptions;

/// Default base configuration directory name.
pub const DEFAULT_BASE_DIR: &str = ".opusconv";
/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Gets the default config file path.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_BASE_DIR).join(DEFAULT_CONFIG_FILE))
}

/// Loads options from `custom_path`, or from the default path when it exists.
///
/// A missing default file yields default options; a missing custom file is
/// an error.
pub fn load_config(custom_path: Option<&str>) -> anyhow::Result<ConvertOptions> {
    match custom_path {
        Some(p) => read_options(Path::new(p)),
        None => match default_config_path() {
            Some(path) if path.exists() => read_options(&path),
            _ => Ok(ConvertOptions::default()),
        },
    }
}

fn read_options(path: &Path) -> anyhow::Result<ConvertOptions> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(ConvertOptions::default());
    }
    let options = serde_yaml::from_str(&content)
        .with_context(|| format!("invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?options, "loaded config");
    Ok(options)
}
