use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

use crate::scan::html::DEFAULT_CHUNK_SIZE;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

pub const CONFIG_VERSION: u32 = 1;

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            scan: ScanConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let cfg: Config =
            toml::from_str(&contents).with_context(|| "Failed to parse config TOML")?;
        anyhow::ensure!(
            cfg.version == CONFIG_VERSION,
            "Unsupported config version {} in {}, expected {CONFIG_VERSION}",
            cfg.version,
            path.display()
        );
        Ok(cfg)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScanConfig {
    /// Bytes read from the input per tokenizer pass
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_toml() -> anyhow::Result<()> {
        let toml_str = r#"
version = 1

[scan]
chunk_size = 512

[output]
format = "json"
"#;

        let cfg: Config = toml::from_str(toml_str)?;

        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.scan.chunk_size, 512);
        assert_eq!(cfg.output.format, OutputFormat::Json);

        Ok(())
    }

    #[test]
    fn test_missing_sections_use_defaults() -> anyhow::Result<()> {
        let cfg: Config = toml::from_str("")?;

        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.scan.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(cfg.output.format, OutputFormat::Text);

        Ok(())
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let toml_str = r#"
[output]
format = "yaml"
"#;

        assert!(toml::from_str::<Config>(toml_str).is_err());
    }

    #[test]
    fn test_load_from_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("headmeta.toml");
        std::fs::write(&path, "[scan]\nchunk_size = 64\n")?;

        let cfg = Config::load(&path)?;

        assert_eq!(cfg.scan.chunk_size, 64);
        assert_eq!(cfg.output.format, OutputFormat::Text);

        Ok(())
    }

    #[test]
    fn test_load_rejects_unknown_version() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("headmeta.toml");
        std::fs::write(&path, "version = 2\n")?;

        let err = Config::load(&path).unwrap_err();

        assert!(err.to_string().contains("Unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(&dir.path().join("absent.toml")).is_err());
    }
}
