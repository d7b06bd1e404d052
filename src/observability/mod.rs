//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and middleware produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (request counters and latency histograms)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log span
//! - Metric calls are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
