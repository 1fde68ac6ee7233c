//! Grammar settings for helper arguments
//!
//! The characters allowed inside a helper argument and the handling of quotes
//! are not fixed: a [`Grammar`] can be built in code or loaded from a TOML
//! file with a `[grammar]` table.
//!
//! ```toml
//! [grammar]
//! hyphenated_names = true
//! charset = "standard"
//! extra_argument_chars = "#"
//! quotes = "raw"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading grammar settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Base set of characters accepted in a literal argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Charset {
    /// Letters, digits and `_ . , ' " | -` plus the space character
    Standard,
    /// Standard plus `/ \ + *`
    #[default]
    Extended,
}

impl Charset {
    fn allows(self, c: char) -> bool {
        if c.is_ascii_alphanumeric() || "_.,'\" |-".contains(c) {
            return true;
        }
        match self {
            Charset::Standard => false,
            Charset::Extended => "/\\+*".contains(c),
        }
    }
}

/// What happens to quotes around a literal argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuotePolicy {
    /// `'now'` and `"now"` are delivered as `now`; unbalanced quotes are kept
    #[default]
    StripMatching,
    /// The argument is delivered exactly as written
    Raw,
}

impl QuotePolicy {
    /// Apply the policy to a literal argument
    pub fn apply<'a>(self, argument: &'a str) -> &'a str {
        match self {
            QuotePolicy::Raw => argument,
            QuotePolicy::StripMatching => {
                let bytes = argument.as_bytes();
                let quoted = bytes.len() >= 2
                    && matches!(bytes[0], b'\'' | b'"')
                    && bytes[bytes.len() - 1] == bytes[0];
                if quoted {
                    &argument[1..argument.len() - 1]
                } else {
                    argument
                }
            }
        }
    }
}

/// Grammar of the helper calls found inside placeholders
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Grammar {
    /// Accept `-` inside helper names (`format-date(...)`)
    pub hyphenated_names: bool,

    /// Base character set for literal arguments
    pub charset: Charset,

    /// Additional characters accepted in literal arguments
    pub extra_argument_chars: String,

    /// Quote handling for literal arguments
    pub quotes: QuotePolicy,
}

/// TOML document layout for grammar files
#[derive(Deserialize)]
struct TomlConfig {
    #[serde(default)]
    grammar: Grammar,
}

impl Default for Grammar {
    fn default() -> Self {
        Self {
            hyphenated_names: true,
            charset: Charset::default(),
            extra_argument_chars: String::new(),
            quotes: QuotePolicy::default(),
        }
    }
}

impl Grammar {
    /// Create a grammar with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load grammar settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load grammar settings from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        Ok(parsed.grammar)
    }

    /// Enable or disable hyphens in helper names
    pub fn with_hyphenated_names(mut self, enabled: bool) -> Self {
        self.hyphenated_names = enabled;
        self
    }

    /// Set the base argument character set
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Accept additional characters in literal arguments
    pub fn with_extra_argument_chars(mut self, chars: impl Into<String>) -> Self {
        self.extra_argument_chars = chars.into();
        self
    }

    /// Set the quote policy
    pub fn with_quotes(mut self, quotes: QuotePolicy) -> Self {
        self.quotes = quotes;
        self
    }

    /// Whether `c` may appear in a literal argument
    pub fn allows(&self, c: char) -> bool {
        self.charset.allows(c) || self.extra_argument_chars.contains(c)
    }

    /// Whether `name` is a helper name this grammar can call
    pub fn accepts_name(&self, name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || (c == '-' && self.hyphenated_names))
    }
}
