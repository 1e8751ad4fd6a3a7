//! Structured logging initialization.
//!
//! Uses the tracing crate; the `RUST_LOG` environment variable takes
//! precedence over the configured level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
pub fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("leafmint={}", level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
