//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout logs
//!     → Prometheus scrape of the metrics endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
