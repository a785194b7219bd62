//! Process lifecycle.
//!
//! SIGINT or SIGTERM (`signals.rs`) triggers the [`Shutdown`] broadcast
//! (`shutdown.rs`). The HTTP server stops accepting connections, finishes
//! in-flight requests and the reload task exits with it.

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
