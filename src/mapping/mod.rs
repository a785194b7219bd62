//! Request-mapping override resolution.
//!
//! # Data Flow
//! ```text
//! HandlerContext (static list of HandlerCandidate)
//!     → handler.rs   keep candidates of this API version
//!     → priority.rs  priority per override-capable candidate
//!     → table.rs     RouteKey → max priority (building → frozen)
//!     → handler.rs   register routes, drop overridden ones
//!     → RouteTable   published via atomic swap
//! ```
//!
//! # Design Decisions
//! - Candidates are plain data; nothing is discovered at runtime
//! - Ties keep the first priority and suppress no one
//! - Handlers without an override marker are always registered

pub mod candidate;
pub mod handler;
pub mod priority;
pub mod table;

pub use candidate::{HandlerCandidate, MappingOverride, RouteKey};
pub use handler::{ActiveRoute, HandlerContext, HandlerMapping, MappingError, RouteTable};
pub use priority::{PriorityLookup, PrioritySettings};
pub use table::{OverrideTable, OverrideTableBuilder};
