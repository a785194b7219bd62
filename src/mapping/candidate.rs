//! Route keys and handler candidate descriptors.

use std::fmt;

use serde::Serialize;

/// Identity of a route registration: method, path pattern and media types.
///
/// Media types are kept sorted and de-duplicated so that two declarations
/// listing the same types in a different order compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RouteKey {
    pub method: String,
    pub path: String,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
}

impl RouteKey {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into().to_uppercase(),
            path: path.into(),
            consumes: Vec::new(),
            produces: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new("POST", path)
    }

    pub fn consumes<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consumes = normalize(types);
        self
    }

    pub fn produces<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.produces = normalize(types);
        self
    }
}

fn normalize<I, S>(types: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = types.into_iter().map(|t| t.into().to_lowercase()).collect();
    out.sort();
    out.dedup();
    out
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} {}", self.method, self.path)?;
        if !self.consumes.is_empty() {
            write!(f, ", consumes [{}]", self.consumes.join(", "))?;
        }
        if !self.produces.is_empty() {
            write!(f, ", produces [{}]", self.produces.join(", "))?;
        }
        write!(f, "}}")
    }
}

/// Marks a handler as taking part in priority-based override resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MappingOverride {
    /// Property holding the priority. Derived from the handler name when unset or empty.
    pub priority_property: Option<String>,
}

impl MappingOverride {
    pub fn with_property(name: impl Into<String>) -> Self {
        Self {
            priority_property: Some(name.into()),
        }
    }
}

/// A handler method that may register a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerCandidate {
    /// Fully qualified name of the owning controller.
    pub owner_type: String,
    pub method_name: String,
    /// `None` when the method carries no request mapping at all.
    pub route: Option<RouteKey>,
    pub override_marker: Option<MappingOverride>,
    /// API version the owning controller is restricted to.
    pub api_version: Option<String>,
}

impl HandlerCandidate {
    pub fn new(owner_type: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            owner_type: owner_type.into(),
            method_name: method_name.into(),
            route: None,
            override_marker: None,
            api_version: None,
        }
    }

    pub fn route(mut self, route: RouteKey) -> Self {
        self.route = Some(route);
        self
    }

    pub fn overriding(mut self, marker: MappingOverride) -> Self {
        self.override_marker = Some(marker);
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    pub fn is_override_capable(&self) -> bool {
        self.override_marker.is_some()
    }

    /// `owner_type.method_name`, used in logs and responses.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.owner_type, self.method_name)
    }
}
