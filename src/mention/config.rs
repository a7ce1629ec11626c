//! Configuration for the mention engine
//!
//! Every field is defaulted so hosts can pass `{}` (or nothing) and only
//! override what they need.

use serde::{Deserialize, Serialize};

use super::grammar::{DEFAULT_MARKER, MAX_MENTION_LEN};

/// Mention engine configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MentionConfig {
    /// Character that opens a mention. Default: `@`
    #[serde(default = "default_marker")]
    pub marker: char,
    /// Longest mention text (marker included) the heuristic fixer accepts. Default: 50
    #[serde(default = "default_max_len")]
    pub max_mention_len: usize,
    /// Only insert the separating space when the typed character could extend
    /// the mention. Default: false (always separate)
    #[serde(default)]
    pub guard_body_chars_only: bool,
    /// Suppress Backspace on the single space that trails a mention when text
    /// follows it. Default: true
    #[serde(default = "default_true")]
    pub trailing_space_guard: bool,
}

fn default_marker() -> char { DEFAULT_MARKER }
fn default_max_len() -> usize { MAX_MENTION_LEN }
fn default_true() -> bool { true }

impl Default for MentionConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER,
            max_mention_len: MAX_MENTION_LEN,
            guard_body_chars_only: false,
            trailing_space_guard: true,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    InvalidMarker(char),
    MaxLenTooSmall,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "Invalid config: {}", msg),
            ConfigError::InvalidMarker(c) => {
                write!(f, "Invalid config: marker {:?} collides with the mention body", c)
            }
            ConfigError::MaxLenTooSmall => write!(f, "Invalid config: max_mention_len must be at least 2"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl MentionConfig {
    /// Parse a JSON config string, then validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: MentionConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the scanner cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if super::grammar::is_body_char(self.marker)
            || super::grammar::is_zero_width(self.marker)
            || self.marker.is_whitespace()
        {
            return Err(ConfigError::InvalidMarker(self.marker));
        }
        // marker plus at least one body character
        if self.max_mention_len < 2 {
            return Err(ConfigError::MaxLenTooSmall);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = MentionConfig::from_json("{}").unwrap();
        assert_eq!(config, MentionConfig::default());
        assert_eq!(config.marker, '@');
        assert_eq!(config.max_mention_len, 50);
        assert!(config.trailing_space_guard);
        assert!(!config.guard_body_chars_only);
    }

    #[test]
    fn test_partial_override() {
        let config = MentionConfig::from_json(r#"{"marker":"+","guard_body_chars_only":true}"#).unwrap();
        assert_eq!(config.marker, '+');
        assert!(config.guard_body_chars_only);
        assert_eq!(config.max_mention_len, 50);
    }

    #[test]
    fn test_marker_in_body_class_rejected() {
        let err = MentionConfig::from_json(r#"{"marker":"a"}"#).unwrap_err();
        assert_eq!(err, ConfigError::InvalidMarker('a'));
    }

    #[test]
    fn test_tiny_max_len_rejected() {
        let err = MentionConfig::from_json(r#"{"max_mention_len":1}"#).unwrap_err();
        assert_eq!(err, ConfigError::MaxLenTooSmall);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = MentionConfig::from_json("{marker").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Invalid config:"));
    }
}
