//! Commerce web-services library.
//!
//! Two independent components and the HTTP surface that consumes them:
//! - `codec`: compact search-query and availability filter strings
//! - `mapping`: priority-based resolution of conflicting route registrations

pub mod availability;
pub mod codec;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod mapping;
pub mod observability;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
