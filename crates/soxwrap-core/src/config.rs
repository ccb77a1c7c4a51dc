//! Operation defaults and tool configuration
//!
//! Every operation takes an options struct with serde defaults, so the
//! whole set can also be loaded from a TOML file and shared between the
//! library and the CLI.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Channel selection for conversion remixing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Left,
    Right,
}

impl Channel {
    /// The remix effect selecting this channel into a mono output.
    pub(crate) fn remix_effect(self) -> &'static str {
        match self {
            Channel::Left => "remix 1",
            Channel::Right => "remix 2",
        }
    }
}

impl std::str::FromStr for Channel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "left" => Ok(Channel::Left),
            "right" => Ok(Channel::Right),
            other => anyhow::bail!("unknown channel {:?} (expected left or right)", other),
        }
    }
}

/// Options for format conversion.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConvertOptions {
    #[serde(default = "default_input_format")]
    pub input_format: String,
    #[serde(default = "default_output_format")]
    pub output_format: String,
    /// Extra output options, e.g. "-c 1 -b 16 -r 16k".
    #[serde(default)]
    pub output_options: Option<String>,
    /// Use the stock mono/16-bit/16k preset instead of `output_options`.
    #[serde(default)]
    pub default_preset: bool,
    /// Remix a single channel into the output.
    #[serde(default)]
    pub channel: Option<Channel>,
    /// Delete the source after a successful run.
    #[serde(default)]
    pub gc: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            input_format: default_input_format(),
            output_format: default_output_format(),
            output_options: None,
            default_preset: false,
            channel: None,
            gc: false,
        }
    }
}

/// Options for trimming silence without splitting.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SilenceOptions {
    /// Minimum silence duration in seconds, passed through as text.
    #[serde(default = "default_trim_duration")]
    pub silence_duration: String,
    /// Silence threshold as a percentage, without the % sign.
    #[serde(default = "default_silence_level")]
    pub silence_level: String,
    #[serde(default = "default_input_format")]
    pub input_format: String,
    #[serde(default = "default_output_format")]
    pub output_format: String,
    #[serde(default)]
    pub gc: bool,
}

impl Default for SilenceOptions {
    fn default() -> Self {
        Self {
            silence_duration: default_trim_duration(),
            silence_level: default_silence_level(),
            input_format: default_input_format(),
            output_format: default_output_format(),
            gc: false,
        }
    }
}

/// Options for splitting a stream at silence boundaries.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SplitOptions {
    #[serde(default = "default_split_duration")]
    pub silence_duration: String,
    #[serde(default = "default_silence_level")]
    pub silence_level: String,
    #[serde(default = "default_input_format")]
    pub input_format: String,
    #[serde(default = "default_output_format")]
    pub output_format: String,
    /// Stem of the produced files; the tool appends 001, 002, ...
    #[serde(default = "default_output_filename")]
    pub output_filename: String,
    #[serde(default)]
    pub gc: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            silence_duration: default_split_duration(),
            silence_level: default_silence_level(),
            input_format: default_input_format(),
            output_format: default_output_format(),
            output_filename: default_output_filename(),
            gc: false,
        }
    }
}

/// Options for concatenating same-format files.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConcatOptions {
    #[serde(default = "default_output_format")]
    pub output_format: String,
}

impl Default for ConcatOptions {
    fn default() -> Self {
        Self {
            output_format: default_output_format(),
        }
    }
}

/// Options for the statistics report.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatsOptions {
    #[serde(default = "default_input_format")]
    pub input_format: String,
    #[serde(default)]
    pub gc: bool,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            input_format: default_input_format(),
            gc: false,
        }
    }
}

/// Options for feature extraction.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeatureOptions {
    /// Sample rate handed to the extractor, passed through as text.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: String,
    #[serde(default)]
    pub gc: bool,
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            gc: false,
        }
    }
}

/// Options for the raw command escape hatch.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomOptions {
    #[serde(default)]
    pub global_options: Option<String>,
    #[serde(default)]
    pub input_options: Option<String>,
    #[serde(default)]
    pub output_options: Option<String>,
    #[serde(default)]
    pub effect: Option<String>,
    #[serde(default = "default_output_format")]
    pub output_format: String,
    #[serde(default)]
    pub gc: bool,
}

impl Default for CustomOptions {
    fn default() -> Self {
        Self {
            global_options: None,
            input_options: None,
            output_options: None,
            effect: None,
            output_format: default_output_format(),
            gc: false,
        }
    }
}

/// Aggregate configuration: binary names plus per-operation defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SoxwrapConfig {
    #[serde(default = "default_sox_program")]
    pub sox_program: String,
    #[serde(default = "default_feature_program")]
    pub feature_program: String,
    #[serde(default)]
    pub convert: ConvertOptions,
    #[serde(default)]
    pub remove_silence: SilenceOptions,
    #[serde(default)]
    pub split: SplitOptions,
    #[serde(default)]
    pub concat: ConcatOptions,
    #[serde(default)]
    pub stats: StatsOptions,
    #[serde(default)]
    pub features: FeatureOptions,
}

impl Default for SoxwrapConfig {
    fn default() -> Self {
        Self {
            sox_program: default_sox_program(),
            feature_program: default_feature_program(),
            convert: ConvertOptions::default(),
            remove_silence: SilenceOptions::default(),
            split: SplitOptions::default(),
            concat: ConcatOptions::default(),
            stats: StatsOptions::default(),
            features: FeatureOptions::default(),
        }
    }
}

impl SoxwrapConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        let config: SoxwrapConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML config: {}", e))?;
        Ok(config)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.sox_program.is_empty() {
            anyhow::bail!("sox_program must not be empty");
        }
        if self.feature_program.is_empty() {
            anyhow::bail!("feature_program must not be empty");
        }
        Ok(())
    }
}

fn default_sox_program() -> String {
    "sox".to_string()
}
fn default_feature_program() -> String {
    "yaafehero".to_string()
}
fn default_input_format() -> String {
    "mp3".to_string()
}
fn default_output_format() -> String {
    "wav".to_string()
}
fn default_trim_duration() -> String {
    "0.1".to_string()
}
fn default_split_duration() -> String {
    "0.5".to_string()
}
fn default_silence_level() -> String {
    "0.03".to_string()
}
fn default_output_filename() -> String {
    "out".to_string()
}
fn default_sample_rate() -> String {
    "8000".to_string()
}

/// The stock conversion preset: mono, 16-bit, 16k sample rate.
pub(crate) const DEFAULT_PRESET: &str = "-c 1 -b 16 -r 16k";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SoxwrapConfig::default();
        assert_eq!(config.sox_program, "sox");
        assert_eq!(config.feature_program, "yaafehero");
        assert_eq!(config.convert.input_format, "mp3");
        assert_eq!(config.convert.output_format, "wav");
        assert_eq!(config.remove_silence.silence_duration, "0.1");
        assert_eq!(config.split.silence_duration, "0.5");
        assert_eq!(config.features.sample_rate, "8000");
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_toml_overrides() {
        let toml_str = r#"
            sox_program = "/opt/sox/bin/sox"

            [convert]
            output_format = "flac"
            channel = "left"

            [split]
            silence_duration = "1.0"
            output_filename = "segment"
        "#;

        let config: SoxwrapConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sox_program, "/opt/sox/bin/sox");
        assert_eq!(config.convert.output_format, "flac");
        assert_eq!(config.convert.channel, Some(Channel::Left));
        // Untouched sections keep their defaults.
        assert_eq!(config.convert.input_format, "mp3");
        assert_eq!(config.split.silence_duration, "1.0");
        assert_eq!(config.split.output_filename, "segment");
        assert_eq!(config.stats.input_format, "mp3");
    }

    #[test]
    fn test_channel_from_str() {
        assert_eq!("left".parse::<Channel>().unwrap(), Channel::Left);
        assert_eq!("right".parse::<Channel>().unwrap(), Channel::Right);
        assert!("center".parse::<Channel>().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_program() {
        let config = SoxwrapConfig {
            sox_program: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
