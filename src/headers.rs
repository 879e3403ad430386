//! HTTP header sources for rate limit explanation.
//!
//! The engine reads four logical fields from whatever holds the response
//! headers. Two source shapes are supported:
//!
//! - **Lookup**: the caller's own store answers a lookup by the canonical
//!   header name ([`Lookup`], and `http::HeaderMap` with the `http` feature).
//! - **Mapping**: a plain key/value collection whose keys are compared
//!   case-insensitively (`HashMap`, `BTreeMap`, pair slices, JSON objects).
//!
//! Both shapes implement [`HeaderSource`], so the shape is fixed by the type
//! handed to [`explain_rate_limit`](crate::explain_rate_limit).

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

/// Standard rate limit header names, in canonical casing.
pub mod names {
    /// Maximum requests allowed per window.
    pub const RATE_LIMIT_LIMIT: &str = "X-RateLimit-Limit";

    /// Remaining requests in current window.
    pub const RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";

    /// Window reset: relative seconds, epoch seconds or epoch milliseconds.
    pub const RATE_LIMIT_RESET: &str = "X-RateLimit-Reset";

    /// Seconds until the client should retry (standard HTTP header).
    pub const RETRY_AFTER: &str = "Retry-After";

    /// Every header the engine reads.
    pub const ALL: [&str; 4] = [
        RATE_LIMIT_LIMIT,
        RATE_LIMIT_REMAINING,
        RATE_LIMIT_RESET,
        RETRY_AFTER,
    ];
}

/// A header value as found in the source, before numeric normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue<'a> {
    /// Textual header value.
    Text(Cow<'a, str>),
    /// Value already stored as a number (e.g. a JSON number).
    Number(f64),
}

impl RawValue<'_> {
    /// Text view of the value, if it is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(_) => None,
        }
    }
}

impl<'a> From<&'a str> for RawValue<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(Cow::Borrowed(text))
    }
}

impl From<String> for RawValue<'_> {
    fn from(text: String) -> Self {
        Self::Text(Cow::Owned(text))
    }
}

impl From<f64> for RawValue<'_> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Values that can be stored in a header mapping.
pub trait HeaderValueLike {
    /// View the value as a raw header value.
    ///
    /// Returns `None` for values that carry neither text nor a number.
    fn raw_value(&self) -> Option<RawValue<'_>>;
}

impl HeaderValueLike for str {
    fn raw_value(&self) -> Option<RawValue<'_>> {
        Some(RawValue::Text(Cow::Borrowed(self)))
    }
}

impl HeaderValueLike for String {
    fn raw_value(&self) -> Option<RawValue<'_>> {
        self.as_str().raw_value()
    }
}

impl HeaderValueLike for Cow<'_, str> {
    fn raw_value(&self) -> Option<RawValue<'_>> {
        self.as_ref().raw_value()
    }
}

impl<T: HeaderValueLike + ?Sized> HeaderValueLike for &T {
    fn raw_value(&self) -> Option<RawValue<'_>> {
        (**self).raw_value()
    }
}

macro_rules! numeric_header_value {
    ($($ty:ty),*) => {
        $(
            impl HeaderValueLike for $ty {
                fn raw_value(&self) -> Option<RawValue<'_>> {
                    Some(RawValue::Number(*self as f64))
                }
            }
        )*
    };
}

numeric_header_value!(f64, f32, i64, i32, u64, u32, usize);

impl HeaderValueLike for serde_json::Value {
    fn raw_value(&self) -> Option<RawValue<'_>> {
        match self {
            Self::String(text) => text.raw_value(),
            Self::Number(number) => number.as_f64().map(RawValue::Number),
            _ => None,
        }
    }
}

/// Capability to read a header value by name.
///
/// Implementations decide how names are matched: lookup sources pass the
/// canonical name to the underlying store, mapping sources compare keys
/// case-insensitively.
pub trait HeaderSource {
    /// Get a header value by name, or `None` if absent.
    fn header(&self, name: &str) -> Option<RawValue<'_>>;
}

impl<T: HeaderSource + ?Sized> HeaderSource for &T {
    fn header(&self, name: &str) -> Option<RawValue<'_>> {
        (**self).header(name)
    }
}

impl<S: HeaderSource> HeaderSource for Option<S> {
    fn header(&self, name: &str) -> Option<RawValue<'_>> {
        self.as_ref()?.header(name)
    }
}

/// The empty source: no headers at all.
impl HeaderSource for () {
    fn header(&self, _name: &str) -> Option<RawValue<'_>> {
        None
    }
}

// ============================================================================
// Lookup Sources
// ============================================================================

/// A source backed by the caller's own lookup function.
///
/// The function receives the canonical header name (see [`names`]) and is
/// called exactly once per field. Matching is up to the caller.
#[derive(Clone)]
pub struct Lookup<F> {
    lookup: F,
}

impl<F> std::fmt::Debug for Lookup<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lookup").finish_non_exhaustive()
    }
}

impl<F> Lookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Create a new lookup source.
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }
}

impl<F> HeaderSource for Lookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn header(&self, name: &str) -> Option<RawValue<'_>> {
        (self.lookup)(name).map(RawValue::from)
    }
}

#[cfg(feature = "http")]
impl HeaderSource for http::HeaderMap {
    fn header(&self, name: &str) -> Option<RawValue<'_>> {
        let value = self.get(name)?;
        match value.to_str() {
            Ok(text) => Some(RawValue::from(text)),
            Err(_) => {
                tracing::debug!(header = name, "Ignoring header value with non-visible characters");
                None
            }
        }
    }
}

#[cfg(feature = "http")]
impl<B> HeaderSource for http::Response<B> {
    fn header(&self, name: &str) -> Option<RawValue<'_>> {
        self.headers().header(name)
    }
}

// ============================================================================
// Mapping Sources
// ============================================================================

/// Scan entries for the first key equal to `name`, ignoring ASCII case.
fn find_ignore_case<'a, K, V>(
    entries: impl IntoIterator<Item = (&'a K, &'a V)>,
    name: &str,
) -> Option<RawValue<'a>>
where
    K: AsRef<str> + ?Sized + 'a,
    V: HeaderValueLike + ?Sized + 'a,
{
    entries
        .into_iter()
        .find(|(key, _)| {
            let key: &str = (*key).as_ref();
            key.eq_ignore_ascii_case(name)
        })
        .and_then(|(_, value)| value.raw_value())
}

/// Pick among keys equal to `name` ignoring ASCII case without relying on
/// iteration order: an exact match first, otherwise the lowest key.
fn find_ignore_case_unordered<'a, K, V>(
    entries: impl IntoIterator<Item = (&'a K, &'a V)>,
    name: &str,
) -> Option<RawValue<'a>>
where
    K: AsRef<str> + ?Sized + 'a,
    V: HeaderValueLike + ?Sized + 'a,
{
    entries
        .into_iter()
        .map(|(key, value)| (K::as_ref(key), value))
        .filter(|(key, _)| key.eq_ignore_ascii_case(name))
        .min_by_key(|&(key, _)| (key != name, key))
        .and_then(|(_, value)| value.raw_value())
}

impl<K, V, S> HeaderSource for HashMap<K, V, S>
where
    K: AsRef<str>,
    V: HeaderValueLike,
{
    fn header(&self, name: &str) -> Option<RawValue<'_>> {
        find_ignore_case_unordered(self.iter(), name)
    }
}

impl<K, V> HeaderSource for BTreeMap<K, V>
where
    K: AsRef<str>,
    V: HeaderValueLike,
{
    fn header(&self, name: &str) -> Option<RawValue<'_>> {
        find_ignore_case(self.iter(), name)
    }
}

impl<K, V> HeaderSource for [(K, V)]
where
    K: AsRef<str>,
    V: HeaderValueLike,
{
    fn header(&self, name: &str) -> Option<RawValue<'_>> {
        find_ignore_case(self.iter().map(|(key, value)| (key, value)), name)
    }
}

impl<K, V, const N: usize> HeaderSource for [(K, V); N]
where
    K: AsRef<str>,
    V: HeaderValueLike,
{
    fn header(&self, name: &str) -> Option<RawValue<'_>> {
        self.as_slice().header(name)
    }
}

impl<K, V> HeaderSource for Vec<(K, V)>
where
    K: AsRef<str>,
    V: HeaderValueLike,
{
    fn header(&self, name: &str) -> Option<RawValue<'_>> {
        self.as_slice().header(name)
    }
}

impl HeaderSource for serde_json::Map<String, serde_json::Value> {
    fn header(&self, name: &str) -> Option<RawValue<'_>> {
        find_ignore_case(self.iter(), name)
    }
}

/// JSON objects are mappings; any other JSON value has no headers.
impl HeaderSource for serde_json::Value {
    fn header(&self, name: &str) -> Option<RawValue<'_>> {
        self.as_object()?.header(name)
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// The four rate limit fields as read from a source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFields<'a> {
    /// `X-RateLimit-Limit`
    pub limit: Option<RawValue<'a>>,
    /// `X-RateLimit-Remaining`
    pub remaining: Option<RawValue<'a>>,
    /// `X-RateLimit-Reset`
    pub reset: Option<RawValue<'a>>,
    /// `Retry-After`
    pub retry_after: Option<RawValue<'a>>,
}

impl<'a> RawFields<'a> {
    /// Read each field from the source exactly once.
    pub fn extract<H: HeaderSource + ?Sized>(source: &'a H) -> Self {
        Self {
            limit: source.header(names::RATE_LIMIT_LIMIT),
            remaining: source.header(names::RATE_LIMIT_REMAINING),
            reset: source.header(names::RATE_LIMIT_RESET),
            retry_after: source.header(names::RETRY_AFTER),
        }
    }
}
