//! Availability facade boundary.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::availability::types::{AvailabilityData, ProductAvailability, UnitAvailability};
use crate::codec::AvailabilityQueryContext;
use crate::config::schema::{AvailabilityConfig, StockEntry};

/// Errors raised by an availability backend.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FacadeError {
    #[error("System error: {0}")]
    System(String),
}

/// Source of availability data for decoded queries.
pub trait AvailabilityFacade: Send + Sync {
    fn availability_for(&self, query: &AvailabilityQueryContext) -> Result<AvailabilityData, FacadeError>;
}

/// Availability read from the `[availability.stock]` config table.
///
/// Products or units missing from the table are left out of the answer.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredAvailability {
    stock: BTreeMap<String, BTreeMap<String, StockEntry>>,
}

impl ConfiguredAvailability {
    pub fn new(stock: BTreeMap<String, BTreeMap<String, StockEntry>>) -> Self {
        Self { stock }
    }

    pub fn from_config(config: &AvailabilityConfig) -> Self {
        Self::new(config.stock.clone())
    }
}

impl AvailabilityFacade for ConfiguredAvailability {
    fn availability_for(&self, query: &AvailabilityQueryContext) -> Result<AvailabilityData, FacadeError> {
        let products = query
            .products
            .iter()
            .filter_map(|q| {
                let units = self.stock.get(&q.product_code)?;
                Some(ProductAvailability {
                    product_code: q.product_code.clone(),
                    units: q
                        .units
                        .iter()
                        .filter_map(|u| {
                            units.get(u).map(|entry| UnitAvailability {
                                unit: u.clone(),
                                quantity: entry.quantity,
                                status: entry.status,
                            })
                        })
                        .collect(),
                })
            })
            .collect();

        Ok(AvailabilityData { products })
    }
}
