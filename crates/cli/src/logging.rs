//! Logging setup for the casebook CLI

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "casebook=info";

/// Initialize tracing
///
/// # Environment Variables
///
/// - `RUST_LOG`: filter directives (default: `casebook=info`)
/// - `CASEBOOK_LOG_FORMAT`: `json` for structured output, anything else for pretty
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init_logging() -> Result<()> {
    let log_format = std::env::var("CASEBOOK_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
