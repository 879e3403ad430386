//! Parsing of pasted header text.
//!
//! Handy for tools that accept raw `Key: Value` lines (copied from a
//! browser's network panel or `curl -i`) instead of a live response.

use crate::error::{ExplainError, Result};

/// Parse `Key: Value` lines into header pairs.
///
/// Lines are trimmed; blank lines, lines without `:` and lines with an empty
/// key are skipped. Only the first `:` splits, so values may contain colons.
/// A key repeated exactly keeps its first position and takes the last value.
///
/// The result is a mapping source: lookups through it ignore key case.
pub fn parse_header_text(text: &str) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = Vec::new();

    for line in text.lines() {
        let Some((key, value)) = line.trim().split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = value.trim().to_string();

        match headers.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, existing)) => *existing = value,
            None => headers.push((key.to_string(), value)),
        }
    }

    headers
}

/// Parse a now override given as decimal milliseconds.
///
/// Blank input means "no override". Otherwise the leading integer (with an
/// optional sign) is used and anything after it is ignored.
pub fn parse_now_override(text: &str) -> Result<Option<f64>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let sign_len = usize::from(trimmed.starts_with(['+', '-']));
    let digits = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return Err(ExplainError::InvalidNow(trimmed.to_string()));
    }

    trimmed[..sign_len + digits]
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ExplainError::InvalidNow(trimmed.to_string()))
}
