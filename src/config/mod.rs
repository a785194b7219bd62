//! Service configuration.
//!
//! ```text
//! commerce-ws.toml
//!     -> loader.rs      parse into ServiceConfig
//!     -> validation.rs  addresses, timeouts, api version, log level
//!
//! with --watch:
//!     watcher.rs -> loader.rs -> HttpServer::apply
//! ```
//!
//! Every section has defaults, so an empty file is a valid configuration.
//! `[properties]` and `[availability]` are re-read on every reload;
//! `[listener]`, `[timeouts]` and `[mapping]` are fixed at startup and a
//! change to them is logged as a warning.

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{AvailabilityConfig, ListenerConfig, MappingConfig, ObservabilityConfig, Properties, ServiceConfig};
pub use watcher::ConfigWatcher;
