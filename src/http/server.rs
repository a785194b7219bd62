//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Resolve active routes through the handler mapping
//! - Compile active routes into an Axum Router
//! - Wire up middleware (tracing, timeout, request ID)
//! - Swap in a rebuilt router when configuration changes
//! - Serve until shutdown

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, on, MethodFilter, MethodRouter},
    Router,
};
use indexmap::IndexMap;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceExt;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::availability::{AvailabilityFacade, ConfiguredAvailability};
use crate::codec::{AvailabilityFilterDecoder, DefaultSearchQueryCodec};
use crate::config::ServiceConfig;
use crate::http::controllers::{self, AppState, Controller, Endpoint};
use crate::http::error::ApiError;
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::mapping::{HandlerMapping, MappingError, RouteTable};

/// Errors raised while building or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Handler mapping failed: {0}")]
    Mapping(#[from] MappingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for the web services.
pub struct HttpServer {
    config: ServiceConfig,
    controllers: Arc<Vec<Controller>>,
    mapping: Arc<HandlerMapping>,
    availability: Option<Arc<dyn AvailabilityFacade>>,
    current: Arc<ArcSwap<Router>>,
    // Held across a rebuild so the route table and router are published together.
    apply_lock: Mutex<()>,
}

impl HttpServer {
    /// Create a server whose availability data comes from the config.
    pub fn new(config: ServiceConfig) -> Result<Self, ServerError> {
        Self::build(config, None)
    }

    /// Create a server backed by the given availability facade.
    pub fn with_availability(
        config: ServiceConfig,
        availability: Arc<dyn AvailabilityFacade>,
    ) -> Result<Self, ServerError> {
        Self::build(config, Some(availability))
    }

    fn build(config: ServiceConfig, availability: Option<Arc<dyn AvailabilityFacade>>) -> Result<Self, ServerError> {
        let controllers = Arc::new(controllers::catalogue());
        let mapping = Arc::new(
            HandlerMapping::new(config.mapping.api_version.clone(), config.mapping.priority_settings())
                .with_context(Arc::new(controllers::context(&controllers))),
        );

        let server = Self {
            config: config.clone(),
            controllers,
            mapping,
            availability,
            current: Arc::new(ArcSwap::from_pointee(Router::new())),
            apply_lock: Mutex::new(()),
        };
        server.apply(&config)?;
        Ok(server)
    }

    /// Rebuild the route table from `config` and swap in the new router.
    ///
    /// The `[listener]`, `[timeouts]` and `[mapping]` sections are read once
    /// at startup; changes to them are logged and ignored.
    pub fn apply(&self, config: &ServiceConfig) -> Result<Arc<RouteTable>, ServerError> {
        let _guard = self.apply_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let ignored = self.startup_only_changes(config);
        if !ignored.is_empty() {
            tracing::warn!(sections = ?ignored, "Startup-only settings changed; restart to apply them");
        }

        let table = self.mapping.init_handler_methods(&config.properties)?;

        let availability = match &self.availability {
            Some(facade) => Arc::clone(facade),
            None => Arc::new(ConfiguredAvailability::from_config(&config.availability)) as Arc<dyn AvailabilityFacade>,
        };
        let state = AppState {
            api_version: self.mapping.api_version().to_string(),
            codec: DefaultSearchQueryCodec,
            decoder: AvailabilityFilterDecoder::new(config.availability.max_products),
            availability,
        };

        let router = compile_routes(&table, &self.controllers, state);
        self.current.store(Arc::new(router));
        Ok(table)
    }

    /// Sections of `config` that differ from the startup configuration but
    /// cannot change while running.
    pub fn startup_only_changes(&self, config: &ServiceConfig) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if config.listener.bind_address != self.config.listener.bind_address {
            changed.push("listener");
        }
        if config.timeouts.request_secs != self.config.timeouts.request_secs {
            changed.push("timeouts");
        }
        if config.mapping.api_version != self.mapping.api_version()
            || config.mapping.priority_settings() != *self.mapping.settings()
        {
            changed.push("mapping");
        }
        changed
    }

    /// Route table currently being served.
    pub fn routes(&self) -> Arc<RouteTable> {
        self.mapping.routes()
    }

    /// Outer router: middleware plus a dispatcher to the current route set.
    #[allow(deprecated)]
    pub fn router(&self) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(Arc::clone(&self.current))
            .layer(TimeoutLayer::new(Duration::from_secs(self.config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// Run the server until `shutdown` fires, applying config updates as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ServiceConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router();
        let server = Arc::new(self);

        let reloader = Arc::clone(&server);
        let reload_task = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match reloader.apply(&config) {
                    Ok(table) => tracing::info!(active = table.active().len(), "Route table reloaded"),
                    Err(e) => tracing::error!(error = %e, "Reload failed. Keeping current routes."),
                }
            }
        });

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reload_task.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Forward a request to the router currently published.
async fn dispatch(State(current): State<Arc<ArcSwap<Router>>>, request: Request<Body>) -> Response {
    let router = Router::clone(&current.load_full());
    match router.oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    }
}

/// Build an Axum router for the active routes of `table`.
///
/// Two active routes on the same method and path cannot both be served; the
/// first one in catalogue order is kept.
fn compile_routes(table: &RouteTable, controllers: &[Controller], state: AppState) -> Router {
    let mut seen = HashSet::new();
    let mut paths: IndexMap<String, MethodRouter<AppState>> = IndexMap::new();

    for active in table.active() {
        let Some(controller) = controllers.get(active.index) else {
            continue;
        };
        let Some(filter) = method_filter(&active.route.method) else {
            tracing::warn!(mapping = %active.route, "Unsupported HTTP method, route skipped");
            continue;
        };
        if !seen.insert((active.route.method.clone(), active.route.path.clone())) {
            tracing::warn!(
                handler = %active.candidate.qualified_name(),
                mapping = %active.route,
                "Route already served by another handler, skipped"
            );
            continue;
        }

        let handler = method_router(controller.endpoint, filter);
        let path = active.route.path.clone();
        let merged = match paths.shift_remove(&path) {
            Some(existing) => existing.merge(handler),
            None => handler,
        };
        paths.insert(path, merged);
    }

    paths
        .into_iter()
        .fold(Router::new(), |router, (path, handler)| router.route(&path, handler))
        .route("/health", get(health))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .with_state(state)
}

fn method_router(endpoint: Endpoint, filter: MethodFilter) -> MethodRouter<AppState> {
    match endpoint {
        Endpoint::ProductAvailability => on(filter, controllers::get_product_availability),
        Endpoint::ProductSearch => on(filter, controllers::search_products),
        Endpoint::CustomProductSearch => on(filter, controllers::custom_search_products),
        Endpoint::ApiVersion => on(filter, controllers::get_api_version),
    }
}

fn method_filter(method: &str) -> Option<MethodFilter> {
    match method {
        "GET" => Some(MethodFilter::GET),
        "POST" => Some(MethodFilter::POST),
        "PUT" => Some(MethodFilter::PUT),
        "PATCH" => Some(MethodFilter::PATCH),
        "DELETE" => Some(MethodFilter::DELETE),
        "HEAD" => Some(MethodFilter::HEAD),
        "OPTIONS" => Some(MethodFilter::OPTIONS),
        _ => None,
    }
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn method_not_allowed(request: Request<Body>) -> Response {
    ApiError::MethodNotAllowed {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
    }
    .into_response()
}

async fn not_found(request: Request<Body>) -> Response {
    ApiError::UnknownResource(request.uri().path().to_string()).into_response()
}
