//! Options controlling how an explanation is computed and phrased.
//!
//! # Examples
//!
//! ```ignore
//! use ratelimit_explain::{Audience, ExplainOptions, Style};
//!
//! // End-user phrasing, full words, current time
//! let options = ExplainOptions::default();
//!
//! // Developer phrasing, compact units, pinned clock
//! let options = ExplainOptions::new()
//!     .with_audience(Audience::Developer)
//!     .with_style(Style::Short)
//!     .with_now_millis(1_707_379_100_000.0);
//!
//! // From a JSON document
//! let options = ExplainOptions::from_json(r#"{"audience": "developer", "style": "short"}"#)?;
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ExplainError, Result};
use crate::number::NumberParsing;

/// Who the message is written for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    /// End users: plain phrasing, no protocol details.
    #[default]
    User,
    /// Developers: mentions the limit and uses diagnostic phrasing.
    Developer,
}

impl Audience {
    /// Label used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Developer => "developer",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Audience {
    type Err = ExplainError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "developer" => Ok(Self::Developer),
            other => Err(ExplainError::InvalidAudience(other.to_string())),
        }
    }
}

/// How verbose durations and limits are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Compact units (`40s`, `2m`).
    Short,
    /// Full words (`40 seconds`, `2 minutes`).
    #[default]
    Verbose,
}

impl Style {
    /// Label used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Verbose => "verbose",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = ExplainError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "short" => Ok(Self::Short),
            "verbose" => Ok(Self::Verbose),
            other => Err(ExplainError::InvalidStyle(other.to_string())),
        }
    }
}

/// Explanation options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExplainOptions {
    /// Reference instant in milliseconds since the Unix epoch.
    /// The current time is used when absent or non-finite.
    #[serde(skip_serializing_if = "Option::is_none")]
    now: Option<f64>,

    /// Message audience.
    audience: Audience,

    /// Message verbosity.
    style: Style,

    /// Parse mode for textual header values.
    number_parsing: NumberParsing,
}

impl ExplainOptions {
    /// Create options with the defaults: user audience, verbose style,
    /// lenient number parsing and the current time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode options from a JSON document.
    ///
    /// Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pin the reference instant (milliseconds since the Unix epoch).
    pub fn with_now_millis(mut self, now_ms: f64) -> Self {
        self.now = Some(now_ms);
        self
    }

    /// Pin the reference instant.
    pub fn with_now(self, now: DateTime<Utc>) -> Self {
        self.with_now_millis(now.timestamp_millis() as f64)
    }

    /// Set the audience.
    pub fn with_audience(mut self, audience: Audience) -> Self {
        self.audience = audience;
        self
    }

    /// Set the style.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the number parsing mode.
    pub fn with_number_parsing(mut self, mode: NumberParsing) -> Self {
        self.number_parsing = mode;
        self
    }

    /// Get the pinned reference instant, if any.
    pub fn now_millis(&self) -> Option<f64> {
        self.now
    }

    /// Get the audience.
    pub fn audience(&self) -> Audience {
        self.audience
    }

    /// Get the style.
    pub fn style(&self) -> Style {
        self.style
    }

    /// Get the number parsing mode.
    pub fn number_parsing(&self) -> NumberParsing {
        self.number_parsing
    }

    /// Get the reference instant in milliseconds since the Unix epoch.
    ///
    /// Returns the pinned instant when it is finite, otherwise the system clock.
    pub fn effective_now_millis(&self) -> f64 {
        match self.now {
            Some(now) if now.is_finite() => now,
            _ => Utc::now().timestamp_millis() as f64,
        }
    }
}
