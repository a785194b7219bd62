//! Availability data returned by the facade and the DTOs sent to clients.

use serde::{Deserialize, Serialize};

/// Stock level reported for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StockLevelStatus {
    InStock,
    LowStock,
    OutOfStock,
    NotSpecified,
}

/// Availability of a product in one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitAvailability {
    pub unit: String,
    pub quantity: Option<i64>,
    pub status: Option<StockLevelStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAvailability {
    pub product_code: String,
    pub units: Vec<UnitAvailability>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityData {
    pub products: Vec<ProductAvailability>,
}

/// Client-facing unit availability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitAvailabilityDto {
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAvailabilityDto {
    pub product_code: String,
    pub units: Vec<UnitAvailabilityDto>,
}

/// Response body of the availability endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityDto {
    pub availability_items: Vec<ProductAvailabilityDto>,
}
