//! Human-readable explanations of HTTP rate limit headers.
//!
//! `ratelimit_explain` turns the loosely specified rate limit headers servers
//! send back into a consistent model and a message fit for display:
//!
//! - **Header Sources**: case-insensitive mappings, caller lookups, JSON objects,
//!   and `http::HeaderMap` behind the `http` feature
//! - **Numeric Normalization**: lenient or strict parsing, non-finite values dropped
//! - **Reset Resolution**: relative seconds, epoch seconds and epoch milliseconds
//!   disambiguated by magnitude; `Retry-After` always wins
//! - **Judgment**: limited / not limited, and `info` / `warning` / `error` severity
//! - **Rendering**: user or developer phrasing, short or verbose units
//!
//! # Quick Start
//!
//! ```ignore
//! use std::collections::HashMap;
//! use ratelimit_explain::{explain_rate_limit, Audience, ExplainOptions};
//!
//! let headers = HashMap::from([
//!     ("retry-after", "120"),
//!     ("x-ratelimit-remaining", "0"),
//! ]);
//!
//! let options = ExplainOptions::new().with_audience(Audience::Developer);
//! let explanation = explain_rate_limit(&headers, &options);
//!
//! if explanation.is_limited() {
//!     println!("{} ({})", explanation.message(), explanation.severity());
//! }
//! ```
//!
//! # Headers
//!
//! | Header | Meaning |
//! |--------|---------|
//! | `X-RateLimit-Limit` | Requests allowed per window |
//! | `X-RateLimit-Remaining` | Requests left in the window |
//! | `X-RateLimit-Reset` | Reset as relative seconds, epoch seconds or epoch milliseconds |
//! | `Retry-After` | Seconds to wait; overrides the reset header |
//!
//! # Feature Flags
//!
//! - `http`: `HeaderSource` for `http::HeaderMap` and `http::Response`

pub mod error;
pub mod explanation;
pub mod headers;
pub mod message;
pub mod number;
pub mod options;
pub mod reset;
pub mod text;

// Re-export main types
pub use error::{ExplainError, Result};
pub use explanation::{Explanation, Severity, explain_rate_limit};
pub use headers::{HeaderSource, HeaderValueLike, Lookup, RawValue};
pub use message::format_duration;
pub use number::NumberParsing;
pub use options::{Audience, ExplainOptions, Style};
pub use reset::{ResetEncoding, ResetWindow};
pub use text::{parse_header_text, parse_now_override};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{ExplainError, Result};
    pub use crate::explanation::{Explanation, Severity, explain_rate_limit};
    pub use crate::headers::{HeaderSource, Lookup};
    pub use crate::options::{Audience, ExplainOptions, Style};
}
