//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, dispatch to current router)
//!     → request.rs (request ID, request span)
//!     → controllers.rs (decode filters, call facade, build DTO)
//!     → error.rs (codec/facade errors → error list response)
//!     → Send to client
//! ```

pub mod controllers;
pub mod error;
pub mod request;
pub mod server;

pub use error::{ApiError, ErrorDto, ErrorListDto};
pub use request::X_REQUEST_ID;
pub use server::{HttpServer, ServerError};
