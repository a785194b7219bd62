//! Handler mapping with priority-based override resolution.
//!
//! # Responsibilities
//! - Filter candidates to those belonging to this API version
//! - Build the override table from override-capable candidates
//! - Register every remaining route unless the table suppresses it
//! - Publish the resulting route table with an atomic swap
//!
//! # Design Decisions
//! - The scan completes before any registration decision is made
//! - Rebuilds construct a new table; the published one is never mutated
//! - A missing handler context aborts initialization

use std::sync::Arc;

use arc_swap::ArcSwap;
use thiserror::Error;

use crate::mapping::candidate::{HandlerCandidate, RouteKey};
use crate::mapping::priority::{PriorityLookup, PrioritySettings};
use crate::mapping::table::{OverrideTable, OverrideTableBuilder};
use crate::observability::metrics;

/// Errors raised while initializing handler methods.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    /// No handler context was supplied before the scan.
    #[error("Handler context cannot be missing when initializing handler methods")]
    MissingContext,
}

/// Every candidate the mapping may scan.
#[derive(Debug, Clone, Default)]
pub struct HandlerContext {
    candidates: Vec<HandlerCandidate>,
}

impl HandlerContext {
    pub fn new(candidates: Vec<HandlerCandidate>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[HandlerCandidate] {
        &self.candidates
    }
}

/// A route that was registered for a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRoute {
    /// Position of the candidate in the handler context.
    pub index: usize,
    pub candidate: HandlerCandidate,
    pub route: RouteKey,
    pub priority: Option<i32>,
}

/// Result of one complete scan and registration pass.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    overrides: OverrideTable,
    active: Vec<ActiveRoute>,
    suppressed: Vec<ActiveRoute>,
}

impl RouteTable {
    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    /// Registered routes, in handler context order.
    pub fn active(&self) -> &[ActiveRoute] {
        &self.active
    }

    /// Routes dropped in favour of a higher-priority candidate.
    pub fn suppressed(&self) -> &[ActiveRoute] {
        &self.suppressed
    }

    pub fn is_active(&self, qualified_name: &str) -> bool {
        self.active
            .iter()
            .any(|r| r.candidate.qualified_name() == qualified_name)
    }
}

/// Resolves which candidates register their routes.
pub struct HandlerMapping {
    api_version: String,
    settings: PrioritySettings,
    context: Option<Arc<HandlerContext>>,
    table: ArcSwap<RouteTable>,
}

impl HandlerMapping {
    /// Create a mapping for the given API version, e.g. `v2`.
    pub fn new(api_version: impl Into<String>, settings: PrioritySettings) -> Self {
        Self {
            api_version: api_version.into(),
            settings,
            context: None,
            table: ArcSwap::from_pointee(RouteTable::default()),
        }
    }

    pub fn with_context(mut self, context: Arc<HandlerContext>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn settings(&self) -> &PrioritySettings {
        &self.settings
    }

    /// Whether the candidate's controller is served by this mapping.
    ///
    /// Controllers without a version tag are served by every mapping.
    pub fn is_handler(&self, candidate: &HandlerCandidate) -> bool {
        candidate
            .api_version
            .as_deref()
            .map_or(true, |v| v == self.api_version)
    }

    /// Scan the context, register routes and publish the new route table.
    ///
    /// Calling this again rebuilds from scratch. Readers holding the previous
    /// table keep a consistent snapshot.
    pub fn init_handler_methods(&self, lookup: &dyn PriorityLookup) -> Result<Arc<RouteTable>, MappingError> {
        let table = Arc::new(self.build_route_table(lookup)?);
        self.table.store(Arc::clone(&table));

        metrics::record_route_table(table.overrides().len(), table.active().len(), table.suppressed().len());
        tracing::info!(
            api_version = %self.api_version,
            active = table.active().len(),
            suppressed = table.suppressed().len(),
            overrides = table.overrides().len(),
            "Handler methods initialized"
        );
        Ok(table)
    }

    /// Currently published route table.
    pub fn routes(&self) -> Arc<RouteTable> {
        self.table.load_full()
    }

    /// Whether the published table suppressed this candidate's route.
    ///
    /// Answered from the snapshot, with the priorities it was built from.
    pub fn is_suppressed(&self, candidate: &HandlerCandidate) -> bool {
        self.table.load().suppressed.iter().any(|r| r.candidate == *candidate)
    }

    /// Route registered for `candidate` in the published table, or `None`
    /// when it has no route, is not a handler of this mapping, or was
    /// suppressed by an override.
    pub fn mapping_for(&self, candidate: &HandlerCandidate) -> Option<RouteKey> {
        self.table
            .load()
            .active
            .iter()
            .find(|r| r.candidate == *candidate)
            .map(|r| r.route.clone())
    }

    /// Build a route table without publishing it.
    pub fn build_route_table(&self, lookup: &dyn PriorityLookup) -> Result<RouteTable, MappingError> {
        let overrides = self.init_overridden_mappings(lookup)?;
        let context = self.context()?;

        let mut active = Vec::new();
        let mut suppressed = Vec::new();
        for (index, candidate) in context.candidates().iter().enumerate() {
            if !self.is_handler(candidate) {
                continue;
            }
            let Some(route) = candidate.route.clone() else {
                continue;
            };
            let priority = self.settings.priority_of(candidate, lookup);
            let entry = ActiveRoute {
                index,
                candidate: candidate.clone(),
                route,
                priority,
            };

            if overrides.is_overridden(&entry.route, priority) {
                tracing::debug!(
                    handler = %candidate.qualified_name(),
                    mapping = %entry.route,
                    priority = ?priority,
                    "Mapping suppressed by higher-priority override"
                );
                suppressed.push(entry);
            } else {
                active.push(entry);
            }
        }

        Ok(RouteTable {
            overrides,
            active,
            suppressed,
        })
    }

    fn context(&self) -> Result<&HandlerContext, MappingError> {
        self.context.as_deref().ok_or(MappingError::MissingContext)
    }

    /// First phase: collect the highest priority per overridden route.
    fn init_overridden_mappings(&self, lookup: &dyn PriorityLookup) -> Result<OverrideTable, MappingError> {
        let context = self.context()?;
        tracing::debug!(
            api_version = %self.api_version,
            candidates = context.candidates().len(),
            "Looking for overridden request mappings"
        );

        let mut builder = OverrideTableBuilder::new();
        let marked = context
            .candidates()
            .iter()
            .filter(|c| self.is_handler(c) && c.is_override_capable());

        for candidate in marked {
            let (Some(route), Some(priority)) = (candidate.route.as_ref(), self.settings.priority_of(candidate, lookup))
            else {
                continue;
            };
            builder.register(route, priority);
            tracing::info!(
                handler = %candidate.qualified_name(),
                mapping = %route,
                priority,
                "Mapping overridden"
            );
        }

        Ok(builder.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::candidate::MappingOverride;
    use std::collections::HashMap;

    const SEARCH: &str = "/{baseSiteId}/products/search";

    fn search(owner: &str, property: &str) -> HandlerCandidate {
        HandlerCandidate::new(owner, "searchProducts")
            .route(RouteKey::get(SEARCH))
            .overriding(MappingOverride::with_property(property))
    }

    fn mapping(candidates: Vec<HandlerCandidate>) -> HandlerMapping {
        HandlerMapping::new("v2", PrioritySettings::default())
            .with_context(Arc::new(HandlerContext::new(candidates)))
    }

    fn priorities(pairs: &[(&str, i32)]) -> HashMap<String, i32> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_missing_context_is_fatal() {
        let mapping = HandlerMapping::new("v2", PrioritySettings::default());
        let err = mapping.init_handler_methods(&HashMap::<String, i32>::new()).unwrap_err();
        assert_eq!(err, MappingError::MissingContext);
        assert!(mapping.routes().active().is_empty());
    }

    #[test]
    fn test_higher_priority_handler_registered() {
        let mapping = mapping(vec![search("Base", "base.priority"), search("Custom", "custom.priority")]);
        let lookup = priorities(&[("base.priority", 3), ("custom.priority", 5)]);
        let table = mapping.init_handler_methods(&lookup).unwrap();

        assert!(table.is_active("Custom.searchProducts"));
        assert!(!table.is_active("Base.searchProducts"));
        assert_eq!(table.suppressed().len(), 1);
        assert_eq!(table.overrides().max_priority(&RouteKey::get(SEARCH)), Some(5));
    }

    #[test]
    fn test_scan_order_does_not_matter() {
        let mapping = mapping(vec![search("Custom", "custom.priority"), search("Base", "base.priority")]);
        let lookup = priorities(&[("base.priority", 3), ("custom.priority", 5)]);
        let table = mapping.init_handler_methods(&lookup).unwrap();
        assert!(table.is_active("Custom.searchProducts"));
        assert!(!table.is_active("Base.searchProducts"));
    }

    #[test]
    fn test_equal_priorities_both_registered() {
        let mapping = mapping(vec![search("Base", "base.priority"), search("Custom", "custom.priority")]);
        let lookup = priorities(&[("base.priority", 5), ("custom.priority", 5)]);
        let table = mapping.init_handler_methods(&lookup).unwrap();

        assert_eq!(table.overrides().max_priority(&RouteKey::get(SEARCH)), Some(5));
        assert!(table.is_active("Base.searchProducts"));
        assert!(table.is_active("Custom.searchProducts"));
        assert!(table.suppressed().is_empty());
    }

    #[test]
    fn test_default_priority_when_unconfigured() {
        let mapping = mapping(vec![search("Base", "base.priority"), search("Custom", "custom.priority")]);
        let lookup = priorities(&[("custom.priority", 1)]);
        let table = mapping.init_handler_methods(&lookup).unwrap();
        assert!(table.is_active("Custom.searchProducts"));
        assert!(!table.is_active("Base.searchProducts"));
    }

    #[test]
    fn test_unmarked_handler_never_suppressed() {
        let plain = HandlerCandidate::new("Plain", "searchProducts").route(RouteKey::get(SEARCH));
        let mapping = mapping(vec![plain.clone(), search("Custom", "custom.priority")]);
        let lookup = priorities(&[("custom.priority", 9)]);
        let table = mapping.init_handler_methods(&lookup).unwrap();

        assert!(table.is_active("Plain.searchProducts"));
        assert!(table.is_active("Custom.searchProducts"));
        assert!(!mapping.is_suppressed(&plain));
    }

    #[test]
    fn test_single_override_registered() {
        let mapping = mapping(vec![search("Custom", "custom.priority")]);
        let table = mapping.init_handler_methods(&priorities(&[])).unwrap();
        assert!(table.is_active("Custom.searchProducts"));
    }

    #[test]
    fn test_other_api_version_ignored() {
        let v1 = search("LegacyController", "legacy.priority").api_version("v1");
        let mapping = mapping(vec![v1.clone(), search("Custom", "custom.priority")]);
        let lookup = priorities(&[("legacy.priority", 100), ("custom.priority", 1)]);
        let table = mapping.init_handler_methods(&lookup).unwrap();

        assert!(!mapping.is_handler(&v1));
        assert!(table.is_active("Custom.searchProducts"));
        assert!(!table.is_active("LegacyController.searchProducts"));
        assert!(table.suppressed().is_empty());
    }

    #[test]
    fn test_candidate_without_route_skipped() {
        let unmapped = HandlerCandidate::new("Helper", "format").overriding(MappingOverride::default());
        let mapping = mapping(vec![unmapped]);
        let table = mapping.init_handler_methods(&priorities(&[])).unwrap();
        assert!(table.active().is_empty());
        assert!(table.overrides().is_empty());
    }

    #[test]
    fn test_rebuild_swaps_table() {
        let base = search("Base", "base.priority");
        let custom = search("Custom", "custom.priority");
        let mapping = mapping(vec![base.clone(), custom.clone()]);

        let before = mapping
            .init_handler_methods(&priorities(&[("base.priority", 3), ("custom.priority", 5)]))
            .unwrap();
        assert!(mapping.is_suppressed(&base));
        assert!(!mapping.is_suppressed(&custom));

        mapping
            .init_handler_methods(&priorities(&[("base.priority", 8), ("custom.priority", 5)]))
            .unwrap();
        let after = mapping.routes();

        assert!(before.is_active("Custom.searchProducts"));
        assert!(after.is_active("Base.searchProducts"));
        assert!(!after.is_active("Custom.searchProducts"));
        assert!(mapping.is_suppressed(&custom));
        assert!(!mapping.is_suppressed(&base));
    }

    #[test]
    fn test_mapping_for_suppressed_candidate_is_none() {
        let base = search("Base", "base.priority");
        let custom = search("Custom", "custom.priority");
        let legacy = search("Legacy", "legacy.priority").api_version("v1");
        let mapping = mapping(vec![base.clone(), custom.clone(), legacy.clone()]);
        mapping
            .init_handler_methods(&priorities(&[("base.priority", 3), ("custom.priority", 5)]))
            .unwrap();

        assert_eq!(mapping.mapping_for(&base), None);
        assert_eq!(mapping.mapping_for(&custom), Some(RouteKey::get(SEARCH)));
        assert_eq!(mapping.mapping_for(&legacy), None);
    }

    #[test]
    fn test_snapshot_keeps_exactly_one_active_handler() {
        let base = search("Base", "base.priority");
        let custom = search("Custom", "custom.priority");
        let mapping = mapping(vec![base.clone(), custom.clone()]);
        mapping
            .init_handler_methods(&priorities(&[("base.priority", 3), ("custom.priority", 5)]))
            .unwrap();

        let routed: Vec<_> = [&base, &custom]
            .into_iter()
            .filter_map(|c| mapping.mapping_for(c))
            .collect();
        assert_eq!(routed, vec![RouteKey::get(SEARCH)]);
        assert_eq!(
            [&base, &custom].into_iter().filter(|c| mapping.is_suppressed(c)).count(),
            1
        );
    }

    #[test]
    fn test_different_media_types_are_different_keys() {
        let json = HandlerCandidate::new("A", "get")
            .route(RouteKey::get("/x").produces(["application/json"]))
            .overriding(MappingOverride::with_property("a"));
        let xml = HandlerCandidate::new("B", "get")
            .route(RouteKey::get("/x").produces(["application/xml"]))
            .overriding(MappingOverride::with_property("b"));
        let mapping = mapping(vec![json, xml]);
        let table = mapping.init_handler_methods(&priorities(&[("a", 1), ("b", 2)])).unwrap();
        assert_eq!(table.active().len(), 2);
        assert_eq!(table.overrides().len(), 2);
    }
}
