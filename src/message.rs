//! Natural-language rendering of rate limit state.
//!
//! The message is picked from a fixed decision tree keyed on whether the
//! caller is limited, which fields are known, the [`Audience`] and the
//! [`Style`]. Less information falls through to less specific phrasing,
//! ending at a generic message when nothing was usable.

use crate::options::{Audience, Style};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// The judged facts a message is rendered from.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MessageFacts {
    /// Requests allowed per window.
    pub limit: Option<f64>,
    /// Requests left in the window.
    pub remaining: Option<f64>,
    /// Whole seconds until reset or retry.
    pub resets_in_seconds: Option<u64>,
    /// Whether the caller should hold off.
    pub is_limited: bool,
}

/// Render the message for the given facts.
pub fn render_message(facts: &MessageFacts, audience: Audience, style: Style) -> String {
    let wait = facts
        .resets_in_seconds
        .map(|seconds| format_duration(seconds as f64, style));

    if facts.is_limited {
        return match audience {
            Audience::User => match wait {
                Some(wait) => format!("Too many requests. Try again in {}.", wait),
                None => "Too many requests. Please try again later.".to_string(),
            },
            Audience::Developer => {
                let mut message = String::from("Rate limit exceeded.");
                if let Some(limit) = facts.limit {
                    let limit = format_count(limit);
                    match style {
                        Style::Short => message.push_str(&format!(" Limit {}.", limit)),
                        Style::Verbose => message.push_str(&format!(" Limit is {} requests.", limit)),
                    }
                }
                push_reset_clause(&mut message, wait.as_deref());
                message
            }
        };
    }

    if let Some(remaining) = facts.remaining {
        let count = format!("{} {}", format_count(remaining), pluralize(remaining, "request"));
        let mut message = match (audience, facts.limit) {
            (Audience::User, _) => format!("{} left.", count),
            (Audience::Developer, Some(limit)) => {
                format!("{} remaining of {}.", count, format_count(limit))
            }
            (Audience::Developer, None) => format!("{} remaining.", count),
        };
        push_reset_clause(&mut message, wait.as_deref());
        return message;
    }

    if let Some(wait) = wait {
        return match audience {
            Audience::User => format!("Limits reset in {}.", wait),
            Audience::Developer => format!("Rate limit resets in {}.", wait),
        };
    }

    match (audience, facts.limit) {
        (Audience::Developer, Some(limit)) => match style {
            Style::Short => format!("Rate limit {} requests.", format_count(limit)),
            Style::Verbose => format!("Rate limit is {} requests.", format_count(limit)),
        },
        (Audience::Developer, None) => "Rate limit information unavailable.".to_string(),
        (Audience::User, _) => "Request limits apply.".to_string(),
    }
}

fn push_reset_clause(message: &mut String, wait: Option<&str>) {
    if let Some(wait) = wait {
        message.push_str(&format!(" Resets in {}.", wait));
    }
}

/// Format a wait for display, always rounding up within a unit.
///
/// The input is rounded to whole seconds and floored at zero; non-finite
/// input is treated as zero.
pub fn format_duration(seconds: f64, style: Style) -> String {
    let seconds = seconds.round().max(0.0) as u64;

    let (count, unit, abbrev) = if seconds < MINUTE {
        (seconds, "second", "s")
    } else if seconds < HOUR {
        (seconds.div_ceil(MINUTE), "minute", "m")
    } else if seconds < DAY {
        (seconds.div_ceil(HOUR), "hour", "h")
    } else {
        (seconds.div_ceil(DAY), "day", "d")
    };

    match style {
        Style::Short => format!("{}{}", count, abbrev),
        Style::Verbose => format!("{} {}", count, pluralize(count as f64, unit)),
    }
}

/// Singular for exactly one, plural (`word` + `s`) otherwise.
pub fn pluralize(count: f64, word: &str) -> String {
    if count == 1.0 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

/// Format a count the way it appeared in the header.
///
/// Integers print without a fractional part, negative zero prints as `0`,
/// and very large or very small magnitudes use exponent notation
/// (`1e+21`, `1.5e-7`).
pub fn format_count(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }

    format!("{}", value)
}
