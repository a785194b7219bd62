//! Product availability subsystem.
//!
//! # Data Flow
//! ```text
//! AvailabilityQueryContext (decoded filters)
//!     → facade.rs  AvailabilityFacade (external data source)
//!     → AvailabilityData
//!     → mapper.rs  stock status → IN_STOCK / LOW_STOCK / OUT_OF_STOCK
//!     → AvailabilityDto (response body)
//! ```

pub mod facade;
pub mod mapper;
pub mod types;

pub use facade::{AvailabilityFacade, ConfiguredAvailability, FacadeError};
pub use types::{AvailabilityData, AvailabilityDto, StockLevelStatus, UnitAvailability};
