//! Cost configuration loaded from TOML.
//!
//! Defaults are embedded via `include_str!("default_config.toml")` and
//! validated at compile time by build.rs. Unlike a process-wide singleton,
//! the parsed config is a plain value passed into [`Tokenizer`] explicitly,
//! so tests can run with different cost tables side by side.
//!
//! [`Tokenizer`]: crate::tokenizer::Tokenizer

use serde::Deserialize;

pub const DEFAULT_CONFIG_TOML: &str = include_str!("default_config.toml");

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenizerConfig {
    pub cost: CostConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CostConfig {
    /// Emission cost for synthetic unknown-word fallback nodes.
    pub unknown_word_cost: i16,
    /// Subtracted from a fallback node's cost when the character is katakana.
    pub katakana_unknown_bonus: i64,
    /// Added to a fallback node's cost when the character is Latin/ASCII.
    pub latin_unknown_penalty: i64,
}

impl TokenizerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        // The embedded TOML is validated by build.rs, so this cannot fail.
        Self::from_toml_str(DEFAULT_CONFIG_TOML).expect("embedded config TOML must be valid")
    }
}
