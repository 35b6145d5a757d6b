use anyhow::{anyhow, Context as AnyhowContext, Result};
use mdchunk_core::ChunkerConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming a default `tokenizer.json`
pub const TOKENIZER_ENV: &str = "MDCHUNK_TOKENIZER";

pub const DEFAULT_CONTENT_FIELD: &str = "contenu";
pub const DEFAULT_TITLE_FIELD: &str = "titre";

/// Settings file contents (JSON or TOML)
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub chunker: Option<ChunkerConfig>,
    pub tokenizer: Option<PathBuf>,
    pub special_tokens: Option<bool>,
    pub content_field: Option<String>,
    pub title_field: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        parse_raw(&bytes).with_context(|| format!("Invalid config {}", path.display()))
    }
}

fn parse_raw(bytes: &[u8]) -> Result<FileConfig> {
    let value: serde_json::Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(json_err) => {
            let utf8 = std::str::from_utf8(bytes).map_err(|err| anyhow!("{json_err}; {err}"))?;
            let toml_value: toml::Value = toml::from_str(utf8).map_err(|toml_err| {
                anyhow!("Config is not valid JSON or TOML ({json_err}); TOML parse error: {toml_err}")
            })?;
            serde_json::to_value(toml_value)
                .map_err(|err| anyhow!("Failed to convert TOML config to JSON: {err}"))?
        }
    };

    serde_json::from_value(value).map_err(|err| anyhow!("Config parse error: {err}"))
}

/// Command-line values that take precedence over the settings file
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub tokenizer: Option<PathBuf>,
    pub max_tokens: Option<usize>,
    pub min_tokens: Option<usize>,
    pub top_level: Option<usize>,
    pub no_headings: bool,
    pub no_special_tokens: bool,
    pub content_field: Option<String>,
    pub title_field: Option<String>,
}

/// Fully resolved driver settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub chunker: ChunkerConfig,
    pub tokenizer: Option<PathBuf>,
    pub special_tokens: bool,
    pub content_field: String,
    pub title_field: String,
}

impl Settings {
    /// Merge defaults, the settings file, the environment and flags (in increasing priority)
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let mut chunker = file.chunker.unwrap_or_default();
        if let Some(max_tokens) = overrides.max_tokens {
            chunker = chunker.with_max_tokens(max_tokens);
        }
        if let Some(min_tokens) = overrides.min_tokens {
            chunker = chunker.with_min_tokens(min_tokens);
        }
        if overrides.no_headings {
            chunker = chunker.with_top_level(None);
        } else if let Some(level) = overrides.top_level {
            chunker = chunker.with_top_level(Some(level));
        }
        chunker.validate().map_err(|err| anyhow!("Invalid chunker config: {err}"))?;

        let tokenizer = overrides
            .tokenizer
            .or_else(|| std::env::var_os(TOKENIZER_ENV).map(PathBuf::from))
            .or(file.tokenizer);

        Ok(Self {
            chunker,
            tokenizer,
            special_tokens: !overrides.no_special_tokens && file.special_tokens.unwrap_or(true),
            content_field: overrides
                .content_field
                .or(file.content_field)
                .unwrap_or_else(|| DEFAULT_CONTENT_FIELD.to_string()),
            title_field: overrides
                .title_field
                .or(file.title_field)
                .unwrap_or_else(|| DEFAULT_TITLE_FIELD.to_string()),
        })
    }
}
