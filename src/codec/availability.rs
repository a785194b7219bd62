//! Product/unit availability filter decoding.
//!
//! Grammar: `product:unit[,unit]*[;product:unit[,unit]*]*`.
//!
//! # Design Decisions
//! - Empty tokens produced by repeated delimiters are skipped, so `a;;b:PC`
//!   has two segments and `PC,,EA` two units
//! - A whitespace-only unit rejects the whole segment
//! - Repeated products merge into the first occurrence, keeping its position
//! - The product cap is checked once the whole string has been parsed

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::codec::error::{FilterError, FilterResult};

const PRODUCT_SEPARATOR: char = ';';
const CODE_SEPARATOR: char = ':';
const UNIT_SEPARATOR: char = ',';

/// Default cap on distinct product codes per request.
pub const MAX_SUPPORTED_PRODUCTS: usize = 50;

/// Units requested for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAvailabilityQuery {
    pub product_code: String,
    pub units: Vec<String>,
}

/// Decoded availability filter, products in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityQueryContext {
    pub products: Vec<ProductAvailabilityQuery>,
}

impl AvailabilityQueryContext {
    /// Re-serialize into the canonical filter string.
    pub fn to_filter_string(&self) -> String {
        self.products
            .iter()
            .map(|p| format!("{}{}{}", p.product_code, CODE_SEPARATOR, p.units.join(",")))
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Decoder for availability filter strings.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityFilterDecoder {
    max_products: usize,
}

impl Default for AvailabilityFilterDecoder {
    fn default() -> Self {
        Self::new(MAX_SUPPORTED_PRODUCTS)
    }
}

impl AvailabilityFilterDecoder {
    pub fn new(max_products: usize) -> Self {
        Self { max_products }
    }

    pub fn max_products(&self) -> usize {
        self.max_products
    }

    /// Decode and validate a filter string.
    pub fn decode(&self, filters: Option<&str>) -> FilterResult<AvailabilityQueryContext> {
        let filters = match filters {
            Some(f) if !f.trim().is_empty() => f,
            _ => return Err(FilterError::Missing),
        };

        let mut products: IndexMap<String, Vec<String>> = IndexMap::new();
        for segment in non_empty(filters, PRODUCT_SEPARATOR) {
            decode_segment(segment, &mut products)?;
        }

        if products.len() > self.max_products {
            tracing::debug!(
                products = products.len(),
                max = self.max_products,
                "Availability filter exceeds product cap"
            );
            return Err(FilterError::TooManyProducts {
                max: self.max_products,
            });
        }

        Ok(AvailabilityQueryContext {
            products: products
                .into_iter()
                .map(|(product_code, units)| ProductAvailabilityQuery { product_code, units })
                .collect(),
        })
    }
}

fn decode_segment(segment: &str, products: &mut IndexMap<String, Vec<String>>) -> FilterResult<()> {
    let malformed = || FilterError::Malformed {
        segment: segment.to_string(),
    };

    let parts: Vec<&str> = non_empty(segment, CODE_SEPARATOR).collect();
    let [code, units] = parts.as_slice() else {
        return Err(malformed());
    };

    let code = code.trim();
    let units = units.trim();
    if code.is_empty() || units.is_empty() {
        return Err(malformed());
    }

    let units: Vec<&str> = non_empty(units, UNIT_SEPARATOR).map(str::trim).collect();
    if units.is_empty() || units.iter().any(|u| u.is_empty()) {
        return Err(malformed());
    }

    let entry = products.entry(code.to_string()).or_default();
    for unit in units {
        if !entry.iter().any(|u| u == unit) {
            entry.push(unit.to_string());
        }
    }
    Ok(())
}

/// Split on `sep`, skipping empty tokens.
fn non_empty(s: &str, sep: char) -> impl Iterator<Item = &str> {
    s.split(sep).filter(|t| !t.is_empty())
}
