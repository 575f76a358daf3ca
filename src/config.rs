// Parser configuration.
//
// Supports configuration from multiple sources:
// 1. Config file path from MSG2BUCKET_CONFIG env var
// 2. Config file contents from MSG2BUCKET_CONFIG_CONTENT env var
// 3. Default config file locations (./msg2bucket.toml, ./.msg2bucket.toml)

use crate::pattern;
use anyhow::{bail, Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::warn;

/// Partitioning configuration, resolved once at startup and treated as
/// immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// JSON field path holding the message timestamp (`a.b.c` descends
    /// nested objects).
    pub timestamp_field: String,

    /// How timestamps appear in payloads, in `yyyy-MM-dd HH:mm:ss` style.
    pub input_pattern: String,

    /// IANA time zone applied to both parsing and key formatting.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    /// Width of the offset buckets appended to partition keys.
    #[serde(default = "default_offsets_per_partition")]
    pub offsets_per_partition: u64,

    #[serde(default)]
    pub strategy: Strategy,
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

fn default_offsets_per_partition() -> u64 {
    1_000_000
}

/// Which partitioning strategy to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    #[default]
    DateOffset,
    Offset,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::DateOffset => write!(f, "date-offset"),
            Strategy::Offset => write!(f, "offset"),
        }
    }
}

impl ParserConfig {
    /// Load configuration from environment variables and default file
    /// locations. Fails when no source is found: partitioning has no
    /// meaningful zero configuration.
    pub fn load() -> Result<Self> {
        if let Ok(path) = env::var("MSG2BUCKET_CONFIG") {
            return Self::load_from_path(Path::new(&path));
        }

        if let Ok(content) = env::var("MSG2BUCKET_CONFIG_CONTENT") {
            let config: Self = toml::from_str(&content)
                .context("Failed to parse inline config from MSG2BUCKET_CONFIG_CONTENT")?;
            config.validate()?;
            return Ok(config);
        }

        for path in &["./msg2bucket.toml", "./.msg2bucket.toml"] {
            if Path::new(path).exists() {
                return Self::load_from_path(Path::new(path));
            }
        }

        bail!("no configuration found: set MSG2BUCKET_CONFIG, MSG2BUCKET_CONFIG_CONTENT, or provide ./msg2bucket.toml")
    }

    /// Load configuration from a specific TOML file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate that required fields are present and values are sensible.
    pub fn validate(&self) -> Result<()> {
        if self.timestamp_field.is_empty() {
            bail!("timestamp_field must not be empty");
        }

        pattern::to_strftime(&self.input_pattern)
            .with_context(|| format!("invalid input_pattern: '{}'", self.input_pattern))?;

        if self.time_zone.parse::<Tz>().is_err() {
            bail!("time_zone '{}' is not a known IANA identifier", self.time_zone);
        }

        if self.offsets_per_partition == 0 {
            bail!("offsets_per_partition must be greater than 0");
        }

        // Tiny buckets are valid but explode the partition count
        if self.offsets_per_partition < 1000 {
            warn!(
                offsets_per_partition = self.offsets_per_partition,
                "offsets_per_partition is very small; expect many partitions per day"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_applies_defaults() {
        let config: ParserConfig = toml::from_str(
            r#"
            timestamp_field = "ts"
            input_pattern = "yyyy-MM-dd"
            "#,
        )
        .unwrap();

        assert_eq!(config.time_zone, "UTC");
        assert_eq!(config.offsets_per_partition, 1_000_000);
        assert_eq!(config.strategy, Strategy::DateOffset);
        config.validate().unwrap();
    }

    #[test]
    fn test_full_config() {
        let config: ParserConfig = toml::from_str(
            r#"
            timestamp_field = "meta.created_at"
            input_pattern = "yyyy-MM-dd HH:mm:ss"
            time_zone = "America/Los_Angeles"
            offsets_per_partition = 500000
            strategy = "offset"
            "#,
        )
        .unwrap();

        assert_eq!(config.strategy, Strategy::Offset);
        assert_eq!(config.offsets_per_partition, 500_000);
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_required_field_is_a_parse_error() {
        let result: std::result::Result<ParserConfig, _> =
            toml::from_str(r#"input_pattern = "yyyy-MM-dd""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = |edit: fn(&mut ParserConfig)| {
            let mut config = ParserConfig {
                timestamp_field: "ts".to_string(),
                input_pattern: "yyyy-MM-dd".to_string(),
                time_zone: "UTC".to_string(),
                offsets_per_partition: 1_000_000,
                strategy: Strategy::DateOffset,
            };
            edit(&mut config);
            config
        };

        assert!(base(|c| c.timestamp_field.clear()).validate().is_err());
        assert!(base(|c| c.input_pattern = "qqq".to_string()).validate().is_err());
        assert!(base(|c| c.time_zone = "Mars/Olympus".to_string())
            .validate()
            .is_err());
        assert!(base(|c| c.offsets_per_partition = 0).validate().is_err());
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let result: std::result::Result<ParserConfig, _> = toml::from_str(
            r#"
            timestamp_field = "ts"
            input_pattern = "yyyy-MM-dd"
            strategy = "round-robin"
            "#,
        );
        assert!(result.is_err());
    }
}
