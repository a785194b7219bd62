//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::availability::StockLevelStatus;
use crate::codec::MAX_SUPPORTED_PRODUCTS;
use crate::mapping::{PriorityLookup, PrioritySettings};

/// Root configuration for the web services.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Handler mapping and override resolution.
    pub mapping: MappingConfig,

    /// Flat property table; override priorities are read from here.
    pub properties: Properties,

    /// Availability filter limits and stock lookup table.
    pub availability: AvailabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:9001").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9001".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Handler mapping configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MappingConfig {
    /// API version served by this instance.
    pub api_version: String,

    /// Priority of an override whose property is not configured.
    pub default_override_priority: i32,

    /// Prepended to derived `<owner>.<method>.priority` property names.
    pub priority_property_prefix: String,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            api_version: "v2".to_string(),
            default_override_priority: 0,
            priority_property_prefix: String::new(),
        }
    }
}

impl MappingConfig {
    pub fn priority_settings(&self) -> PrioritySettings {
        PrioritySettings {
            default_priority: self.default_override_priority,
            property_prefix: self.priority_property_prefix.clone(),
        }
    }
}

/// Availability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AvailabilityConfig {
    /// Maximum distinct products per availability request.
    pub max_products: usize,

    /// product code → unit → stock entry.
    pub stock: BTreeMap<String, BTreeMap<String, StockEntry>>,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            max_products: MAX_SUPPORTED_PRODUCTS,
            stock: BTreeMap::new(),
        }
    }
}

/// Stock reported for one product unit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StockEntry {
    pub quantity: Option<i64>,
    pub status: Option<StockLevelStatus>,
}

/// Free-form properties.
///
/// Names may be written quoted (`"a.b.priority" = 5`) or as plain dotted
/// keys, which TOML turns into nested tables; both resolve the same way.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Properties(pub BTreeMap<String, toml::Value>);

impl Properties {
    pub fn get(&self, name: &str) -> Option<&toml::Value> {
        if let Some(v) = self.0.get(name) {
            return Some(v);
        }
        let mut segments = name.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_table()?.get(segment)?;
        }
        Some(current)
    }
}

impl PriorityLookup for Properties {
    fn get_int(&self, name: &str, default: i32) -> i32 {
        let parsed = match self.get(name) {
            Some(toml::Value::Integer(i)) => i32::try_from(*i).ok(),
            Some(toml::Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        if parsed.is_none() && self.get(name).is_some() {
            tracing::debug!(property = %name, default, "Unparseable priority, using default");
        }
        parsed.unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.mapping.api_version, "v2");
        assert_eq!(config.mapping.default_override_priority, 0);
        assert_eq!(config.availability.max_products, 50);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_minimal_toml() {
        let config: ServiceConfig = toml::from_str("[listener]\nbind_address = \"127.0.0.1:1\"\n").unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:1");
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn test_property_lookup() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [properties]
            "com.shop.CustomProductsController.searchProducts.priority" = 5
            search.base.priority = "3"
            broken = "high"
            huge = 9999999999
            "#,
        )
        .unwrap();
        let props = &config.properties;

        assert_eq!(props.get_int("com.shop.CustomProductsController.searchProducts.priority", 0), 5);
        assert_eq!(props.get_int("search.base.priority", 0), 3);
        assert_eq!(props.get_int("broken", -1), -1);
        assert_eq!(props.get_int("huge", -1), -1);
        assert_eq!(props.get_int("absent", 2), 2);
        assert_eq!(props.get_int("search.base", 4), 4);
    }

    #[test]
    fn test_stock_table() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [availability.stock."3318057_A"]
            PC = { quantity = 10, status = "inStock" }
            EA = { status = "outOfStock" }
            "#,
        )
        .unwrap();
        let units = &config.availability.stock["3318057_A"];
        assert_eq!(units["PC"].quantity, Some(10));
        assert_eq!(units["EA"].status, Some(StockLevelStatus::OutOfStock));
    }
}
