//! Compact filter-string codecs.
//!
//! # Data Flow
//! ```text
//! query parameter (already URL-decoded)
//!     → search_query.rs   freeText:sort:key:value  ⇄ SearchQuery
//!     → availability.rs   product:unit,unit;...    → AvailabilityQueryContext
//!     → error.rs          FilterError (rejected request, never retried)
//! ```
//!
//! # Design Decisions
//! - Pure functions over strings: no shared state, safe from any thread
//! - Each call builds its own result; results are never mutated afterwards
//! - No HTTP types here; the server maps `FilterError` to a 400 response

pub mod availability;
pub mod error;
pub mod search_query;

pub use availability::{
    AvailabilityFilterDecoder, AvailabilityQueryContext, ProductAvailabilityQuery, MAX_SUPPORTED_PRODUCTS,
};
pub use error::{FilterError, FilterResult};
pub use search_query::{DefaultSearchQueryCodec, SearchQuery, SearchQueryCodec, SearchQueryTerm};
