//! Temporal resolution of retry-after and reset headers.
//!
//! Reset headers are not self-describing: the same field carries relative
//! seconds, epoch seconds or epoch milliseconds depending on the server.
//! The magnitude decides which one it is:
//!
//! | Value | Encoding |
//! |-------|----------|
//! | `>= 1e12` | epoch milliseconds |
//! | `>= 1e9` | epoch seconds |
//! | otherwise | seconds from now |
//!
//! All waits are rounded up, so a caller is never told to retry early.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use tracing::trace;

/// Reset values at or above this are epoch milliseconds.
pub const EPOCH_MILLIS_THRESHOLD: f64 = 1e12;

/// Reset values at or above this (and below [`EPOCH_MILLIS_THRESHOLD`]) are epoch seconds.
pub const EPOCH_SECONDS_THRESHOLD: f64 = 1e9;

/// How a reset header value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResetEncoding {
    /// Milliseconds since the Unix epoch.
    EpochMillis,
    /// Seconds since the Unix epoch.
    EpochSeconds,
    /// Seconds from now.
    Relative,
}

impl ResetEncoding {
    /// Classify a reset value by magnitude.
    pub fn classify(value: f64) -> Self {
        if value >= EPOCH_MILLIS_THRESHOLD {
            Self::EpochMillis
        } else if value >= EPOCH_SECONDS_THRESHOLD {
            Self::EpochSeconds
        } else {
            Self::Relative
        }
    }

    /// Get the encoding name (for logging).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EpochMillis => "epoch_millis",
            Self::EpochSeconds => "epoch_seconds",
            Self::Relative => "relative",
        }
    }

    /// Seconds from `now_ms` until `value`, before rounding.
    fn seconds_until(&self, value: f64, now_ms: f64) -> f64 {
        let now_seconds = now_ms / 1000.0;
        match self {
            Self::EpochMillis => value / 1000.0 - now_seconds,
            Self::EpochSeconds => value - now_seconds,
            Self::Relative => value,
        }
    }
}

impl fmt::Display for ResetEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round a wait up to whole seconds, flooring at zero.
///
/// Non-finite input yields zero.
pub fn clamp_seconds(value: f64) -> u64 {
    if !value.is_finite() {
        return 0;
    }
    // `as` saturates for waits beyond u64::MAX.
    value.ceil().max(0.0) as u64
}

/// Seconds from `now_ms` until the window described by a reset value resets.
///
/// Returns `None` when the computation is not finite. Resets in the past
/// resolve to zero.
pub fn resolve_reset_seconds(reset: f64, now_ms: f64) -> Option<u64> {
    if !reset.is_finite() {
        return None;
    }

    let encoding = ResetEncoding::classify(reset);
    let seconds = encoding.seconds_until(reset, now_ms).ceil();
    if !seconds.is_finite() {
        return None;
    }

    let seconds = clamp_seconds(seconds);
    trace!(encoding = encoding.as_str(), reset, seconds, "Resolved reset header");
    Some(seconds)
}

/// When the current rate limit window resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetWindow {
    resets_in_seconds: u64,
    #[serde(serialize_with = "serialize_instant")]
    resets_at: DateTime<Utc>,
}

impl ResetWindow {
    /// Create a window resetting `resets_in_seconds` after `now_ms`.
    ///
    /// Instants beyond chrono's range saturate to its bounds.
    pub fn new(resets_in_seconds: u64, now_ms: f64) -> Self {
        let at_ms = (now_ms + resets_in_seconds as f64 * 1000.0).trunc();
        let resets_at = DateTime::<Utc>::from_timestamp_millis(at_ms as i64).unwrap_or(if at_ms < 0.0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        });

        Self {
            resets_in_seconds,
            resets_at,
        }
    }

    /// Whole seconds until reset.
    pub fn resets_in_seconds(&self) -> u64 {
        self.resets_in_seconds
    }

    /// Time until reset as a Duration.
    pub fn resets_in(&self) -> Duration {
        Duration::from_secs(self.resets_in_seconds)
    }

    /// The instant the window resets.
    pub fn resets_at(&self) -> DateTime<Utc> {
        self.resets_at
    }
}

fn serialize_instant<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Outcome of reconciling the retry-after and reset headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Reset window, if any timing information was usable.
    pub window: Option<ResetWindow>,
    /// Clamped retry-after, if the header was present.
    pub retry_after_seconds: Option<u64>,
}

/// Reconcile retry-after and reset values against `now_ms`.
///
/// Retry-after wins whenever present; the reset value is then ignored.
pub fn resolve(retry_after: Option<f64>, reset: Option<f64>, now_ms: f64) -> Resolution {
    if let Some(retry_after) = retry_after {
        let seconds = clamp_seconds(retry_after);
        trace!(seconds, "Using retry-after header");
        return Resolution {
            window: Some(ResetWindow::new(seconds, now_ms)),
            retry_after_seconds: Some(seconds),
        };
    }

    let window = reset
        .and_then(|reset| resolve_reset_seconds(reset, now_ms))
        .map(|seconds| ResetWindow::new(seconds, now_ms));

    Resolution {
        window,
        retry_after_seconds: None,
    }
}
