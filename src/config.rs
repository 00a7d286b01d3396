use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::matcher::SkipSet;

/// Optional settings file, every field has a default
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub matching: Matching,
    pub discovery: Discovery,
    pub output: Output,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.to_string_lossy()))?;
        toml::from_str(&contents).with_context(|| "Failed to parse config TOML")
    }

    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Config> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Config::default()),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, Copy)]
#[serde(default)]
pub struct Matching {
    pub skip_set: SkipSet,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Discovery {
    pub directory: PathBuf,
    pub extensions: Vec<String>,
}

impl Default for Discovery {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            extensions: vec!["mp3".to_string()],
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Output {
    /// unset means colored only when stdout is a terminal
    pub color: Option<bool>,
    pub farewell: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            color: None,
            farewell: true,
        }
    }
}
