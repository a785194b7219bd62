//! Filter decoding errors.
//!
//! All variants are user-input errors: the request is rejected, never retried.
//! Messages are returned to API clients verbatim, so their wording is stable.

use thiserror::Error;

/// Request parameter carrying availability filters.
pub const FILTERS_FIELD: &str = "filters";

/// Request parameter carrying a search query.
pub const QUERY_FIELD: &str = "query";

/// Errors raised while decoding a compact filter string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Mandatory filter parameter was absent or blank.
    #[error("The request isn’t allowed. The 'filters' field can’t be empty. Please provide a valid value.")]
    Missing,

    /// An availability segment did not match `product:unit[,unit]*`.
    #[error(
        "The request isn’t allowed because the provided value '{segment}' doesn't adhere to the required format. \
         Please provide product codes and their respective units in the 'filter' field using this format - \
         productCodeA:unitCodeA,unitCodeB;productCodeB:unitCodeA,unitCodeB. For example: 3318057_A:EA,PC;4112097_B:EA."
    )]
    Malformed { segment: String },

    /// More distinct products than the decoder accepts.
    #[error("The request isn’t allowed. The maximum number of product types to be retrieved is {max}.")]
    TooManyProducts { max: usize },

    /// A search query ended with a term key that has no value.
    #[error("The search query '{query}' is malformed: term key '{key}' has no value.")]
    MalformedQuery { query: String, key: String },
}

impl FilterError {
    /// Name of the request parameter the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            FilterError::MalformedQuery { .. } => QUERY_FIELD,
            _ => FILTERS_FIELD,
        }
    }

    /// Machine-readable rejection reason.
    pub fn reason(&self) -> &'static str {
        match self {
            FilterError::Missing => "missing",
            _ => "invalid",
        }
    }
}

/// Result type for codec operations.
pub type FilterResult<T> = Result<T, FilterError>;
