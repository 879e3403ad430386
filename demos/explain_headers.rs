//! Explain pasted rate limit headers.
//!
//! Run with:
//! ```
//! printf 'X-RateLimit-Limit: 100\nX-RateLimit-Remaining: 3\nX-RateLimit-Reset: 1707379200\n' \
//!     | cargo run --example explain_headers -- --audience developer --now 1707379160000
//! ```
//!
//! Set `RUST_LOG=debug` to see discarded values.

use std::io::Read;

use clap::Parser;
use ratelimit_explain::{
    Audience, ExplainOptions, Explanation, NumberParsing, Style, parse_header_text,
    parse_now_override,
};
use tracing_subscriber::EnvFilter;

const EXAMPLE_HEADERS: &str = "X-RateLimit-Limit: 100
X-RateLimit-Remaining: 3
X-RateLimit-Reset: 1707379200";

/// Explain rate limit headers read from stdin
#[derive(Parser, Debug)]
#[command(name = "explain_headers")]
#[command(about, long_about = None)]
struct Args {
    /// Who the message is written for (user, developer)
    #[arg(long, default_value_t = Audience::User)]
    audience: Audience,

    /// Message style (short, verbose)
    #[arg(long, default_value_t = Style::Verbose)]
    style: Style,

    /// Current time in epoch milliseconds
    #[arg(long)]
    now: Option<String>,

    /// Reject header values with trailing garbage
    #[arg(long)]
    strict: bool,
}

impl Args {
    fn options(&self) -> ratelimit_explain::Result<ExplainOptions> {
        let mut options = ExplainOptions::new()
            .with_audience(self.audience)
            .with_style(self.style);
        if let Some(now) = self.now.as_deref() {
            if let Some(now) = parse_now_override(now)? {
                options = options.with_now_millis(now);
            }
        }
        if self.strict {
            options = options.with_number_parsing(NumberParsing::Strict);
        }
        Ok(options)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = Args::parse().options()?;

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    if input.trim().is_empty() {
        input = EXAMPLE_HEADERS.to_string();
    }

    let headers = parse_header_text(&input);
    let explanation = Explanation::from_headers(&headers, &options);
    let severity = explanation.severity();

    println!("=== Rate Limit Explanation ===\n");
    println!("--- JSON ---");
    println!("{}", serde_json::to_string_pretty(&explanation)?);
    println!("\n[{}] {}", severity, explanation.into_message());

    Ok(())
}
