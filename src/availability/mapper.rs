//! Availability data → DTO mapping.

use crate::availability::types::{
    AvailabilityData, AvailabilityDto, ProductAvailability, ProductAvailabilityDto, StockLevelStatus, UnitAvailability,
    UnitAvailabilityDto,
};

pub const IN_STOCK: &str = "IN_STOCK";
pub const LOW_STOCK: &str = "LOW_STOCK";
pub const OUT_OF_STOCK: &str = "OUT_OF_STOCK";

/// Wire name of a stock status. Unspecified statuses are not sent.
pub fn status_code(status: Option<StockLevelStatus>) -> Option<&'static str> {
    match status? {
        StockLevelStatus::InStock => Some(IN_STOCK),
        StockLevelStatus::LowStock => Some(LOW_STOCK),
        StockLevelStatus::OutOfStock => Some(OUT_OF_STOCK),
        StockLevelStatus::NotSpecified => None,
    }
}

impl From<&UnitAvailability> for UnitAvailabilityDto {
    fn from(a: &UnitAvailability) -> Self {
        Self {
            unit: a.unit.clone(),
            quantity: a.quantity,
            status: status_code(a.status).map(String::from),
        }
    }
}

impl From<&ProductAvailability> for ProductAvailabilityDto {
    fn from(p: &ProductAvailability) -> Self {
        Self {
            product_code: p.product_code.clone(),
            units: p.units.iter().map(UnitAvailabilityDto::from).collect(),
        }
    }
}

impl From<&AvailabilityData> for AvailabilityDto {
    fn from(data: &AvailabilityData) -> Self {
        Self {
            availability_items: data.products.iter().map(ProductAvailabilityDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(status: Option<StockLevelStatus>, quantity: i64) -> UnitAvailability {
        UnitAvailability {
            unit: "PC".into(),
            quantity: Some(quantity),
            status,
        }
    }

    #[test]
    fn test_in_stock() {
        let dto = UnitAvailabilityDto::from(&unit(Some(StockLevelStatus::InStock), 10));
        assert_eq!(dto.status.as_deref(), Some("IN_STOCK"));
        assert_eq!(dto.unit, "PC");
        assert_eq!(dto.quantity, Some(10));
    }

    #[test]
    fn test_low_stock() {
        let dto = UnitAvailabilityDto::from(&unit(Some(StockLevelStatus::LowStock), 1));
        assert_eq!(dto.status.as_deref(), Some("LOW_STOCK"));
        assert_eq!(dto.quantity, Some(1));
    }

    #[test]
    fn test_out_of_stock() {
        let dto = UnitAvailabilityDto::from(&unit(Some(StockLevelStatus::OutOfStock), 0));
        assert_eq!(dto.status.as_deref(), Some("OUT_OF_STOCK"));
        assert_eq!(dto.quantity, Some(0));
    }

    #[test]
    fn test_unspecified_status_omitted() {
        let dto = UnitAvailabilityDto::from(&unit(Some(StockLevelStatus::NotSpecified), 4));
        assert_eq!(dto.status, None);
        let dto = UnitAvailabilityDto::from(&unit(None, 4));
        assert_eq!(dto.status, None);

        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_nested_mapping() {
        let data = AvailabilityData {
            products: vec![ProductAvailability {
                product_code: "3318057_A".into(),
                units: vec![unit(Some(StockLevelStatus::InStock), 3)],
            }],
        };
        let dto = AvailabilityDto::from(&data);
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["availabilityItems"][0]["productCode"], "3318057_A");
        assert_eq!(json["availabilityItems"][0]["units"][0]["status"], "IN_STOCK");
    }
}
