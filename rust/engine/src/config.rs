use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

use crate::player::STARTING_STACK;

pub const CONFIG_ENV: &str = "HOLDEM_CONFIG";

/// Stakes and seating for one table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableConfig {
    pub small_blind: u32,
    pub big_blind: u32,
    pub ante: u32,
    pub starting_stack: u32,
    /// Seat holding the button for the first hand
    pub button: usize,
    /// Seeds the per-hand shuffles; `None` draws from the OS
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            small_blind: 50,
            big_blind: 100,
            ante: 0,
            starting_stack: STARTING_STACK,
            button: 0,
            seed: None,
        }
    }
}

impl TableConfig {
    pub fn with_blinds(small_blind: u32, big_blind: u32) -> Self {
        Self {
            small_blind,
            big_blind,
            ..Self::default()
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: TableConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.big_blind == 0 {
            return Err(ConfigError::Invalid("big_blind must be >0".into()));
        }
        if self.small_blind > self.big_blind {
            return Err(ConfigError::Invalid(
                "small_blind must not exceed big_blind".into(),
            ));
        }
        if self.starting_stack == 0 {
            return Err(ConfigError::Invalid("starting_stack must be >0".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub small_blind: ValueSource,
    pub big_blind: ValueSource,
    pub ante: ValueSource,
    pub starting_stack: ValueSource,
    pub button: ValueSource,
    pub seed: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            small_blind: ValueSource::Default,
            big_blind: ValueSource::Default,
            ante: ValueSource::Default,
            starting_stack: ValueSource::Default,
            button: ValueSource::Default,
            seed: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: TableConfig,
    pub sources: ConfigSources,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub fn load() -> Result<TableConfig, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Defaults, then the TOML file named by `HOLDEM_CONFIG`, then `HOLDEM_*` variables.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    load_from(|key| std::env::var(key).ok())
}

fn load_from<F>(env: F) -> Result<ConfigResolved, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = TableConfig::default();
    let mut sources = ConfigSources::default();

    if let Some(path) = env(CONFIG_ENV) {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.small_blind {
            cfg.small_blind = v;
            sources.small_blind = ValueSource::File;
        }
        if let Some(v) = f.big_blind {
            cfg.big_blind = v;
            sources.big_blind = ValueSource::File;
        }
        if let Some(v) = f.ante {
            cfg.ante = v;
            sources.ante = ValueSource::File;
        }
        if let Some(v) = f.starting_stack {
            cfg.starting_stack = v;
            sources.starting_stack = ValueSource::File;
        }
        if let Some(v) = f.button {
            cfg.button = v;
            sources.button = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
    }

    if let Some(v) = env_number(&env, "HOLDEM_SMALL_BLIND")? {
        cfg.small_blind = v;
        sources.small_blind = ValueSource::Env;
    }
    if let Some(v) = env_number(&env, "HOLDEM_BIG_BLIND")? {
        cfg.big_blind = v;
        sources.big_blind = ValueSource::Env;
    }
    if let Some(v) = env_number(&env, "HOLDEM_ANTE")? {
        cfg.ante = v;
        sources.ante = ValueSource::Env;
    }
    if let Some(v) = env_number(&env, "HOLDEM_STARTING_STACK")? {
        cfg.starting_stack = v;
        sources.starting_stack = ValueSource::Env;
    }
    if let Some(v) = env_number(&env, "HOLDEM_BUTTON")? {
        cfg.button = v;
        sources.button = ValueSource::Env;
    }
    if let Some(v) = env_number(&env, "HOLDEM_SEED")? {
        cfg.seed = Some(v);
        sources.seed = ValueSource::Env;
    }

    cfg.validate()?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn env_number<F, T>(env: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match env(key) {
        Some(v) if !v.is_empty() => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{key} is not a valid number"))),
        _ => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    small_blind: Option<u32>,
    #[serde(default)]
    big_blind: Option<u32>,
    #[serde(default)]
    ante: Option<u32>,
    #[serde(default)]
    starting_stack: Option<u32>,
    #[serde(default)]
    button: Option<usize>,
    #[serde(default)]
    seed: Option<u64>,
}
