use std::io;

use anyhow::anyhow;
use tracing_subscriber::{fmt, EnvFilter};

pub const ENV_LOCAL: &str = "local";
pub const ENV_DEV: &str = "dev";
pub const ENV_PROD: &str = "prod";

/// Initialize tracing subscriber with human readable compact output.
/// - Respects `RUST_LOG` if set
/// - Falls back to `default_filter`
/// - Writes to stdout to improve visibility in environments that hide stderr
pub fn init_logging_default(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
/// - Respects `RUST_LOG` if set, defaults to `default_filter`
/// - Writes to stdout for consistent container logging behavior
pub fn init_logging_json(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}

/// Pick the subscriber for a deployment environment.
///
/// `local` logs compact text at debug, `dev` logs JSON at debug and `prod`
/// logs JSON at info. Any other value is rejected.
pub fn init_logging_for_env(env: &str) -> anyhow::Result<()> {
    match env {
        ENV_LOCAL => init_logging_default("debug,tower_http=debug,sqlx=warn"),
        ENV_DEV => init_logging_json("debug,sqlx=warn"),
        ENV_PROD => init_logging_json("info,sqlx=warn"),
        other => return Err(anyhow!("undefined env: {other}")),
    }
    Ok(())
}
