//! Integration tests for explaining rate limit headers.

use std::collections::HashMap;

use ratelimit_explain::{
    Audience, ExplainOptions, Explanation, Severity, Style, explain_rate_limit,
};

const NOW_MS: f64 = 1_707_379_100_000.0;

fn at(now_ms: f64) -> ExplainOptions {
    ExplainOptions::new().with_now_millis(now_ms)
}

#[test]
fn test_epoch_seconds_reset_with_low_quota() {
    let headers = HashMap::from([
        ("X-RateLimit-Limit", "100"),
        ("X-RateLimit-Remaining", "3"),
        ("X-RateLimit-Reset", "1707379200"),
    ]);
    let options = at(1_707_379_160_000.0)
        .with_audience(Audience::User)
        .with_style(Style::Verbose);

    let explanation = explain_rate_limit(&headers, &options);

    assert_eq!(explanation.remaining(), Some(3.0));
    assert_eq!(explanation.resets_in_seconds(), Some(40));
    assert!(!explanation.is_limited());
    assert_eq!(explanation.severity(), Severity::Warning);
    assert!(
        explanation.message().starts_with("3 requests left"),
        "unexpected message: {}",
        explanation.message()
    );
}

#[test]
fn test_retry_after_overrides_reset() {
    let headers = HashMap::from([
        ("Retry-After", "120"),
        ("X-RateLimit-Reset", "1707379200"),
    ]);

    let explanation = explain_rate_limit(&headers, &at(NOW_MS).with_style(Style::Short));

    assert_eq!(explanation.retry_after_seconds(), Some(120));
    assert_eq!(explanation.resets_in_seconds(), Some(120));
    assert!(explanation.is_limited());
    assert_eq!(explanation.message(), "Too many requests. Try again in 2m.");
}

#[test]
fn test_retry_after_ignores_far_future_reset() {
    let headers = HashMap::from([
        ("Retry-After", "120"),
        ("X-RateLimit-Reset", "1707479100"),
    ]);

    let explanation = explain_rate_limit(&headers, &at(NOW_MS));

    assert_eq!(explanation.resets_in_seconds(), Some(120));
}

#[test]
fn test_fractional_retry_after_rounds_up() {
    let headers = HashMap::from([("Retry-After", "1.2")]);

    let explanation = explain_rate_limit(&headers, &at(NOW_MS));

    assert_eq!(explanation.retry_after_seconds(), Some(2));
    assert_eq!(explanation.message(), "Too many requests. Try again in 2 seconds.");
}

#[test]
fn test_negative_retry_after_is_zero() {
    let headers = HashMap::from([("Retry-After", "-30")]);

    let explanation = explain_rate_limit(&headers, &at(NOW_MS));

    assert_eq!(explanation.retry_after_seconds(), Some(0));
    assert!(!explanation.is_limited());
    assert_eq!(explanation.message(), "Limits reset in 0 seconds.");
}

#[test]
fn test_epoch_millis_and_seconds_agree() {
    let millis = HashMap::from([("X-RateLimit-Reset", "1707379200000")]);
    let seconds = HashMap::from([("X-RateLimit-Reset", "1707379200")]);
    let options = at(NOW_MS).with_audience(Audience::Developer);

    let from_millis = explain_rate_limit(&millis, &options);
    let from_seconds = explain_rate_limit(&seconds, &options);

    assert_eq!(from_millis.resets_in_seconds(), Some(100));
    assert_eq!(from_seconds.resets_in_seconds(), Some(100));
    assert_eq!(from_millis, from_seconds);
    assert_eq!(from_millis.message(), "Rate limit resets in 2 minutes.");
}

#[test]
fn test_relative_reset() {
    let headers = HashMap::from([("X-RateLimit-Reset", "45"), ("X-RateLimit-Remaining", "9")]);

    let explanation = explain_rate_limit(&headers, &at(NOW_MS).with_style(Style::Short));

    assert_eq!(explanation.resets_in_seconds(), Some(45));
    assert_eq!(explanation.message(), "9 requests left. Resets in 45s.");
}

#[test]
fn test_past_reset_clamps_to_zero() {
    let headers = HashMap::from([("X-RateLimit-Reset", "1707379000")]);

    let explanation = explain_rate_limit(&headers, &at(NOW_MS));

    assert_eq!(explanation.resets_in_seconds(), Some(0));
}

#[test]
fn test_resets_at_matches_resets_in() {
    let cases = [
        HashMap::from([("Retry-After", "30")]),
        HashMap::from([("X-RateLimit-Reset", "1707379200")]),
        HashMap::from([("X-RateLimit-Reset", "15")]),
        HashMap::from([("X-RateLimit-Limit", "10")]),
    ];

    for headers in &cases {
        let explanation = explain_rate_limit(headers, &at(NOW_MS));
        assert_eq!(
            explanation.resets_at().is_some(),
            explanation.resets_in_seconds().is_some()
        );
        if let (Some(resets_at), Some(seconds)) = (explanation.resets_at(), explanation.resets_in_seconds()) {
            assert_eq!(resets_at.timestamp_millis(), NOW_MS as i64 + seconds as i64 * 1000);
        }
    }
}

#[test]
fn test_severity_levels_match_remaining_ratio() {
    let options = ExplainOptions::new().with_audience(Audience::Developer);
    let severity = |remaining: &str| {
        let headers = HashMap::from([
            ("X-RateLimit-Limit", "100"),
            ("X-RateLimit-Remaining", remaining),
        ]);
        explain_rate_limit(&headers, &options).severity()
    };

    assert_eq!(severity("10"), Severity::Warning);
    assert_eq!(severity("1"), Severity::Warning);
    assert_eq!(severity("11"), Severity::Info);
    assert_eq!(severity("0"), Severity::Error);
    assert_eq!(severity("-2"), Severity::Error);
}

#[test]
fn test_exhausted_quota_is_always_limited() {
    for remaining in ["0", "-1", "0.0", "-0"] {
        let headers = HashMap::from([("X-RateLimit-Remaining", remaining), ("Retry-After", "0")]);
        let explanation = explain_rate_limit(&headers, &at(NOW_MS));

        assert!(explanation.is_limited(), "remaining {} should be limited", remaining);
        assert_eq!(explanation.severity(), Severity::Error);
    }
}

#[test]
fn test_remaining_overrides_retry_after() {
    let headers = HashMap::from([("X-RateLimit-Remaining", "5"), ("Retry-After", "60")]);

    let explanation = explain_rate_limit(&headers, &at(NOW_MS).with_audience(Audience::Developer));

    assert!(!explanation.is_limited());
    assert_eq!(explanation.severity(), Severity::Info);
    assert_eq!(explanation.message(), "5 requests remaining. Resets in 1 minute.");
}

#[test]
fn test_developer_limited_message() {
    let headers = HashMap::from([
        ("X-RateLimit-Limit", "5000"),
        ("X-RateLimit-Remaining", "0"),
        ("X-RateLimit-Reset", "1707382700"),
    ]);

    let short = explain_rate_limit(
        &headers,
        &at(NOW_MS).with_audience(Audience::Developer).with_style(Style::Short),
    );
    let verbose = explain_rate_limit(&headers, &at(NOW_MS).with_audience(Audience::Developer));

    assert_eq!(short.message(), "Rate limit exceeded. Limit 5000. Resets in 1h.");
    assert_eq!(
        verbose.message(),
        "Rate limit exceeded. Limit is 5000 requests. Resets in 1 hour."
    );
}

#[test]
fn test_no_headers_developer() {
    let headers: HashMap<String, String> = HashMap::new();

    let explanation = explain_rate_limit(&headers, &ExplainOptions::new().with_audience(Audience::Developer));

    assert_eq!(explanation.message(), "Rate limit information unavailable.");
    assert_eq!(explanation.severity(), Severity::Info);
    assert!(!explanation.is_limited());
    assert_eq!(explanation.resets_in_seconds(), None);
    assert_eq!(explanation.resets_at(), None);
}

#[test]
fn test_no_headers_user() {
    let explanation = explain_rate_limit(&(), &ExplainOptions::new());
    assert_eq!(explanation.message(), "Request limits apply.");
}

#[test]
fn test_lenient_parse_keeps_numeric_prefix() {
    let headers = HashMap::from([("X-RateLimit-Remaining", "100abc")]);

    let explanation = explain_rate_limit(&headers, &at(NOW_MS));

    assert_eq!(explanation.remaining(), Some(100.0));
}

#[test]
fn test_strict_parse_rejects_trailing_garbage() {
    use ratelimit_explain::NumberParsing;

    let headers = HashMap::from([("X-RateLimit-Remaining", "100abc"), ("X-RateLimit-Limit", " 200 ")]);
    let options = at(NOW_MS)
        .with_audience(Audience::Developer)
        .with_number_parsing(NumberParsing::Strict);

    let explanation = explain_rate_limit(&headers, &options);

    assert_eq!(explanation.remaining(), None);
    assert_eq!(explanation.limit(), Some(200.0));
    assert_eq!(explanation.message(), "Rate limit is 200 requests.");
}

#[test]
fn test_identical_inputs_identical_output() {
    let headers = HashMap::from([("X-RateLimit-Remaining", "2"), ("X-RateLimit-Reset", "90")]);

    let first = explain_rate_limit(&headers, &at(NOW_MS));
    let second = explain_rate_limit(&headers, &at(NOW_MS));

    assert_eq!(first, second);
}

#[test]
fn test_serialized_shape() {
    let headers = HashMap::from([
        ("X-RateLimit-Limit", "100"),
        ("X-RateLimit-Remaining", "3"),
        ("X-RateLimit-Reset", "1707379200"),
    ]);

    let explanation = explain_rate_limit(&headers, &at(1_707_379_160_000.0));
    let json = serde_json::to_value(&explanation).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "limit": 100.0,
            "remaining": 3.0,
            "resetsInSeconds": 40,
            "resetsAt": "2024-02-08T08:00:00.000Z",
            "isLimited": false,
            "message": "3 requests left. Resets in 40 seconds.",
            "severity": "warning"
        })
    );
}

#[test]
fn test_serialized_shape_omits_absent_fields() {
    let explanation = explain_rate_limit(&(), &ExplainOptions::new());
    let json = serde_json::to_value(&explanation).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "isLimited": false,
            "message": "Request limits apply.",
            "severity": "info"
        })
    );
}

#[test]
fn test_negative_counts_floor_at_zero() {
    let headers = HashMap::from([("X-RateLimit-Limit", "-5"), ("X-RateLimit-Remaining", "-2")]);

    let explanation = explain_rate_limit(&headers, &at(NOW_MS).with_audience(Audience::Developer));

    assert_eq!(explanation.limit(), Some(0.0));
    assert_eq!(explanation.remaining(), Some(0.0));
    assert!(explanation.is_limited());
    assert_eq!(explanation.severity(), Severity::Error);

    let json = serde_json::to_value(&explanation).unwrap();
    assert_eq!(json["limit"], serde_json::json!(0.0));
    assert_eq!(json["remaining"], serde_json::json!(0.0));
}

#[test]
fn test_from_headers_matches_free_function() {
    let headers = HashMap::from([("Retry-After", "90"), ("X-RateLimit-Remaining", "0")]);
    let options = at(NOW_MS).with_style(Style::Short);

    let explanation = Explanation::from_headers(&headers, &options);

    assert_eq!(explanation, explain_rate_limit(&headers, &options));
    let window = explanation.reset_window().copied().unwrap();
    assert_eq!(window.resets_in_seconds(), 90);
    assert_eq!(Some(window.resets_at()), explanation.resets_at());
    assert_eq!(explanation.into_message(), "Too many requests. Try again in 2m.");
}

