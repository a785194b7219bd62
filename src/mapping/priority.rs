//! Override priority lookup.
//!
//! # Design Decisions
//! - Priorities come from a flat name → value property source
//! - A missing or unparseable value silently becomes the default priority
//! - Handlers without an override marker have no priority at all

use std::collections::HashMap;

use crate::mapping::candidate::HandlerCandidate;

/// Suffix of derived priority property names.
const PRIORITY_SUFFIX: &str = "priority";

/// Synchronous configuration lookup for integer properties.
pub trait PriorityLookup: Send + Sync {
    /// Value of `name`, or `default` when absent or not an integer.
    fn get_int(&self, name: &str, default: i32) -> i32;
}

impl PriorityLookup for HashMap<String, i32> {
    fn get_int(&self, name: &str, default: i32) -> i32 {
        self.get(name).copied().unwrap_or(default)
    }
}

impl PriorityLookup for HashMap<String, String> {
    fn get_int(&self, name: &str, default: i32) -> i32 {
        self.get(name)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}

/// Settings shared by every priority computation of one handler mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrioritySettings {
    /// Priority used when no property value is configured.
    pub default_priority: i32,
    /// Prepended to derived property names.
    pub property_prefix: String,
}

impl PrioritySettings {
    /// Property name a candidate reads its priority from.
    ///
    /// `None` when the candidate is not override-capable.
    pub fn property_name(&self, candidate: &HandlerCandidate) -> Option<String> {
        let marker = candidate.override_marker.as_ref()?;
        match marker.priority_property.as_deref() {
            Some(name) if !name.is_empty() => Some(name.to_string()),
            _ => Some(format!(
                "{}{}.{}.{}",
                self.property_prefix, candidate.owner_type, candidate.method_name, PRIORITY_SUFFIX
            )),
        }
    }

    /// Priority of an override-capable candidate.
    pub fn priority_of(&self, candidate: &HandlerCandidate, lookup: &dyn PriorityLookup) -> Option<i32> {
        let name = self.property_name(candidate)?;
        Some(lookup.get_int(&name, self.default_priority))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::candidate::MappingOverride;

    fn marked(property: Option<&str>) -> HandlerCandidate {
        HandlerCandidate::new("com.shop.ProductsController", "search").overriding(MappingOverride {
            priority_property: property.map(String::from),
        })
    }

    #[test]
    fn test_derived_property_name() {
        let settings = PrioritySettings::default();
        assert_eq!(
            settings.property_name(&marked(None)).as_deref(),
            Some("com.shop.ProductsController.search.priority")
        );
        assert_eq!(
            settings.property_name(&marked(Some(""))).as_deref(),
            Some("com.shop.ProductsController.search.priority")
        );
    }

    #[test]
    fn test_derived_property_name_with_prefix() {
        let settings = PrioritySettings {
            default_priority: 0,
            property_prefix: "requestMappingOverride.".into(),
        };
        assert_eq!(
            settings.property_name(&marked(None)).as_deref(),
            Some("requestMappingOverride.com.shop.ProductsController.search.priority")
        );
    }

    #[test]
    fn test_explicit_property_name() {
        let settings = PrioritySettings::default();
        assert_eq!(
            settings.property_name(&marked(Some("search.priority"))).as_deref(),
            Some("search.priority")
        );
    }

    #[test]
    fn test_unmarked_has_no_priority() {
        let lookup: HashMap<String, i32> = HashMap::new();
        let c = HandlerCandidate::new("com.shop.ProductsController", "search");
        assert_eq!(PrioritySettings::default().priority_of(&c, &lookup), None);
    }

    #[test]
    fn test_missing_and_unparseable_fall_back_to_default() {
        let settings = PrioritySettings {
            default_priority: 7,
            property_prefix: String::new(),
        };
        let empty: HashMap<String, String> = HashMap::new();
        assert_eq!(settings.priority_of(&marked(Some("p")), &empty), Some(7));

        let bad: HashMap<String, String> = [("p".to_string(), "high".to_string())].into();
        assert_eq!(settings.priority_of(&marked(Some("p")), &bad), Some(7));

        let good: HashMap<String, String> = [("p".to_string(), " 12 ".to_string())].into();
        assert_eq!(settings.priority_of(&marked(Some("p")), &good), Some(12));
    }
}
