//! Numeric normalization of raw header values.
//!
//! Every field is reduced to an optional finite number. Anything that is
//! missing, empty, unparseable or non-finite becomes `None`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExplainError;
use crate::headers::RawValue;

/// How textual header values are parsed into numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberParsing {
    /// Take the longest leading float literal and ignore the rest
    /// (`"100abc"` parses to `100`).
    #[default]
    Lenient,
    /// The whole trimmed value must be a float literal.
    Strict,
}

impl NumberParsing {
    /// Label used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lenient => "lenient",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for NumberParsing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NumberParsing {
    type Err = ExplainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(ExplainError::InvalidNumberParsing(other.to_string())),
        }
    }
}

/// Normalize a raw header value into a finite number.
pub fn parse_number(value: Option<&RawValue<'_>>, mode: NumberParsing) -> Option<f64> {
    let parsed = match value? {
        RawValue::Number(number) => *number,
        RawValue::Text(text) => parse_text(text, mode)?,
    };
    parsed.is_finite().then_some(parsed)
}

/// Floor a request count at zero. Negative zero becomes zero.
pub fn clamp_count(value: f64) -> f64 {
    if value <= 0.0 { 0.0 } else { value }
}

fn parse_text(text: &str, mode: NumberParsing) -> Option<f64> {
    let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if trimmed.is_empty() {
        return None;
    }

    let literal = match mode {
        NumberParsing::Lenient => float_prefix(trimmed)?,
        NumberParsing::Strict => trimmed,
    };
    literal.parse::<f64>().ok()
}

/// Longest prefix of `s` shaped like `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`.
fn float_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    // An exponent only counts when it has digits: "1e" is just "1".
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    Some(&s[..end])
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
