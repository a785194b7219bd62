//! Logging and metrics.
//!
//! Filter decoding, route resolution and the controllers emit `tracing`
//! events; `logging.rs` renders them as text or JSON lines. `metrics.rs`
//! keeps request and rejection counters plus gauges describing the last
//! resolved route table, scraped through the Prometheus exporter.

pub mod logging;
pub mod metrics;
