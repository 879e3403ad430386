//! Explanation of a set of rate limit headers.
//!
//! [`explain_rate_limit`] runs the whole pipeline: read the four fields from
//! the source, normalize them to numbers, resolve how long until the window
//! resets, then judge and phrase the result. It never fails; unusable input
//! is treated as absent and the message degrades accordingly.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::headers::{HeaderSource, RawFields, RawValue, names};
use crate::message::{MessageFacts, render_message};
use crate::number::{NumberParsing, clamp_count, parse_number};
use crate::options::ExplainOptions;
use crate::reset::{ResetWindow, resolve};

/// Remaining-to-limit ratio at or below which the state is a warning.
pub const WARNING_RATIO: f64 = 0.10;

/// How urgent an explanation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Plenty of quota left, or nothing known.
    Info,
    /// Quota nearly exhausted.
    Warning,
    /// Limited: do not retry yet.
    Error,
}

impl Severity {
    /// Get the severity name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the caller should hold off on the next request.
///
/// A known `remaining` decides on its own. Otherwise a positive retry-after
/// means limited. Without either, the caller is assumed not limited.
pub fn is_limited(remaining: Option<f64>, retry_after_seconds: Option<u64>) -> bool {
    match (remaining, retry_after_seconds) {
        (Some(remaining), _) => remaining <= 0.0,
        (None, Some(retry_after)) => retry_after > 0,
        (None, None) => false,
    }
}

/// Classify severity from the remaining quota, falling back to `limited`.
pub fn classify_severity(remaining: Option<f64>, limit: Option<f64>, limited: bool) -> Severity {
    match remaining {
        Some(remaining) if remaining <= 0.0 => Severity::Error,
        Some(remaining) => match limit {
            Some(limit) if limit > 0.0 && remaining / limit <= WARNING_RATIO => Severity::Warning,
            _ => Severity::Info,
        },
        None if limited => Severity::Error,
        None => Severity::Info,
    }
}

/// Human-readable explanation of rate limit headers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    /// Requests allowed per window.
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<f64>,

    /// Requests left in the current window.
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining: Option<f64>,

    /// When the window resets or the retry wait elapses.
    #[serde(flatten)]
    reset: Option<ResetWindow>,

    /// Whether the caller should hold off.
    is_limited: bool,

    /// Rendered message.
    message: String,

    /// How urgent this is.
    severity: Severity,

    /// Retry-after wait, if the header was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_seconds: Option<u64>,
}

impl Explanation {
    /// Explain the rate limit headers in `source`.
    pub fn from_headers<H: HeaderSource + ?Sized>(source: &H, options: &ExplainOptions) -> Self {
        explain_rate_limit(source, options)
    }

    /// Requests allowed per window.
    pub fn limit(&self) -> Option<f64> {
        self.limit
    }

    /// Requests left in the current window.
    pub fn remaining(&self) -> Option<f64> {
        self.remaining
    }

    /// Seconds until the window resets or the retry wait elapses.
    pub fn resets_in_seconds(&self) -> Option<u64> {
        self.reset.map(|window| window.resets_in_seconds())
    }

    /// Time until reset as a Duration.
    pub fn resets_in(&self) -> Option<Duration> {
        self.reset.map(|window| window.resets_in())
    }

    /// The instant the window resets.
    pub fn resets_at(&self) -> Option<DateTime<Utc>> {
        self.reset.map(|window| window.resets_at())
    }

    /// The reset window, if known.
    pub fn reset_window(&self) -> Option<&ResetWindow> {
        self.reset.as_ref()
    }

    /// Retry-after wait in seconds, if the header was supplied.
    pub fn retry_after_seconds(&self) -> Option<u64> {
        self.retry_after_seconds
    }

    /// Check if the caller is rate limited.
    pub fn is_limited(&self) -> bool {
        self.is_limited
    }

    /// Check if the caller may send another request now.
    pub fn is_allowed(&self) -> bool {
        !self.is_limited
    }

    /// Get the severity.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the rendered message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consume the explanation and return the message.
    pub fn into_message(self) -> String {
        self.message
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Explain the rate limit headers in `source`.
///
/// # Example
///
/// ```ignore
/// use std::collections::HashMap;
/// use ratelimit_explain::{explain_rate_limit, ExplainOptions, Severity};
///
/// let headers = HashMap::from([
///     ("X-RateLimit-Limit", "100"),
///     ("X-RateLimit-Remaining", "3"),
///     ("X-RateLimit-Reset", "1707379200"),
/// ]);
/// let options = ExplainOptions::new().with_now_millis(1_707_379_160_000.0);
///
/// let explanation = explain_rate_limit(&headers, &options);
/// assert_eq!(explanation.severity(), Severity::Warning);
/// assert_eq!(explanation.message(), "3 requests left. Resets in 40 seconds.");
/// ```
pub fn explain_rate_limit<H: HeaderSource + ?Sized>(source: &H, options: &ExplainOptions) -> Explanation {
    let fields = RawFields::extract(source);
    let mode = options.number_parsing();

    let limit = normalize(names::RATE_LIMIT_LIMIT, fields.limit.as_ref(), mode).map(clamp_count);
    let remaining =
        normalize(names::RATE_LIMIT_REMAINING, fields.remaining.as_ref(), mode).map(clamp_count);
    let reset = normalize(names::RATE_LIMIT_RESET, fields.reset.as_ref(), mode);
    let retry_after = normalize(names::RETRY_AFTER, fields.retry_after.as_ref(), mode);

    let now_ms = options.effective_now_millis();
    let resolution = resolve(retry_after, reset, now_ms);

    let limited = is_limited(remaining, resolution.retry_after_seconds);
    let severity = classify_severity(remaining, limit, limited);
    let facts = MessageFacts {
        limit,
        remaining,
        resets_in_seconds: resolution.window.map(|window| window.resets_in_seconds()),
        is_limited: limited,
    };
    let message = render_message(&facts, options.audience(), options.style());

    Explanation {
        limit,
        remaining,
        reset: resolution.window,
        is_limited: limited,
        message,
        severity,
        retry_after_seconds: resolution.retry_after_seconds,
    }
}

fn normalize(header: &str, value: Option<&RawValue<'_>>, mode: NumberParsing) -> Option<f64> {
    let parsed = parse_number(value, mode);
    if let (None, Some(value)) = (parsed, value) {
        debug!(header, value = ?value, mode = mode.as_str(), "Discarding unusable header value");
    }
    parsed
}
