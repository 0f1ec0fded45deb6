//! opusconv - convert between Ogg/Opus and WAV files.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use opusconv_audio::{Converter, WavContainer};
use tracing_subscriber::EnvFilter;

mod config;

/// opusconv - convert between Ogg/Opus and WAV files.
///
///   - decode: Ogg/Opus -> 32-bit float WAV
///   - encode: WAV -> Ogg/Opus (first channel only)
///
/// Encoder options are read from ~/.opusconv/config.yaml when present.
#[derive(Parser)]
#[command(name = "opusconv")]
#[command(about = "Ogg/Opus <-> WAV converter")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.opusconv/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode an Ogg/Opus file into a WAV file
    Decode {
        /// Source Ogg/Opus file
        src: PathBuf,
        /// Destination WAV file
        dest: PathBuf,
    },
    /// Encode a WAV file into an Ogg/Opus file
    Encode {
        /// Source WAV file
        src: PathBuf,
        /// Destination Ogg/Opus file
        dest: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = config::load_config(cli.config.as_deref())?;
    let converter = Converter::new(WavContainer, options);

    match &cli.command {
        Commands::Decode { src, dest } => converter
            .compressed_to_container_file(src, dest)
            .with_context(|| format!("decode {} -> {}", src.display(), dest.display())),
        Commands::Encode { src, dest } => converter
            .container_file_to_compressed(src, dest)
            .with_context(|| format!("encode {} -> {}", src.display(), dest.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_decode() {
        let cli = Cli::parse_from(["opusconv", "-v", "decode", "in.ogg", "out.wav"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Decode { ref src, ref dest }
                if src == &PathBuf::from("in.ogg") && dest == &PathBuf::from("out.wav")
        ));
    }

    #[test]
    fn test_parse_encode_with_config() {
        let cli = Cli::parse_from(["opusconv", "encode", "in.wav", "out.ogg", "--config", "c.yaml"]);
        assert_eq!(cli.config.as_deref(), Some("c.yaml"));
        assert!(matches!(cli.command, Commands::Encode { .. }));
    }
}
