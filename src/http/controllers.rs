//! Controllers and their route declarations.
//!
//! Each controller method is declared once in [`catalogue`] as a
//! [`HandlerCandidate`] paired with the endpoint that serves it. The handler
//! mapping decides which declarations become live routes.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::availability::{AvailabilityDto, AvailabilityFacade};
use crate::codec::{AvailabilityFilterDecoder, DefaultSearchQueryCodec, SearchQuery, SearchQueryCodec, SearchQueryTerm};
use crate::http::error::ApiError;
use crate::mapping::{HandlerCandidate, HandlerContext, MappingOverride, RouteKey};
use crate::observability::metrics;

pub const PRODUCT_AVAILABILITY_CONTROLLER: &str = "commercews.v2.controller.ProductAvailabilityController";
pub const PRODUCTS_CONTROLLER: &str = "commercews.v2.controller.ProductsController";
pub const CUSTOM_PRODUCTS_CONTROLLER: &str = "commercews.v2.controller.CustomProductsController";
pub const MISCS_CONTROLLER: &str = "commercews.v2.controller.MiscsController";

const JSON: &str = "application/json";

/// Sort applied by the custom search when the query names none.
pub const DEFAULT_SORT: &str = "relevance";

/// Handler bodies a candidate can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ProductAvailability,
    ProductSearch,
    CustomProductSearch,
    ApiVersion,
}

/// A declared controller method.
#[derive(Debug, Clone)]
pub struct Controller {
    pub candidate: HandlerCandidate,
    pub endpoint: Endpoint,
}

/// Every controller method known to the service, in registration order.
pub fn catalogue() -> Vec<Controller> {
    vec![
        Controller {
            candidate: HandlerCandidate::new(PRODUCT_AVAILABILITY_CONTROLLER, "getProductAvailability")
                .route(RouteKey::get("/{baseSiteId}/productAvailabilities").produces([JSON])),
            endpoint: Endpoint::ProductAvailability,
        },
        Controller {
            candidate: HandlerCandidate::new(PRODUCTS_CONTROLLER, "searchProducts")
                .route(RouteKey::get("/{baseSiteId}/products/search").produces([JSON]))
                .overriding(MappingOverride::default()),
            endpoint: Endpoint::ProductSearch,
        },
        Controller {
            candidate: HandlerCandidate::new(CUSTOM_PRODUCTS_CONTROLLER, "searchProducts")
                .route(RouteKey::get("/{baseSiteId}/products/search").produces([JSON]))
                .overriding(MappingOverride::default()),
            endpoint: Endpoint::CustomProductSearch,
        },
        Controller {
            candidate: HandlerCandidate::new(MISCS_CONTROLLER, "getApiVersion")
                .route(RouteKey::get("/{baseSiteId}/version").produces([JSON]))
                .api_version("v2"),
            endpoint: Endpoint::ApiVersion,
        },
    ]
}

/// Handler context built from the catalogue.
pub fn context(controllers: &[Controller]) -> HandlerContext {
    HandlerContext::new(controllers.iter().map(|c| c.candidate.clone()).collect())
}

/// Shared state of the controllers.
#[derive(Clone)]
pub struct AppState {
    pub api_version: String,
    pub codec: DefaultSearchQueryCodec,
    pub decoder: AvailabilityFilterDecoder,
    pub availability: Arc<dyn AvailabilityFacade>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    pub filters: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

/// Search response: the decoded query and its canonical form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultDto {
    pub handler: String,
    pub base_site: String,
    pub current_query: String,
    pub free_text_search: Option<String>,
    pub sort: Option<String>,
    pub filter_terms: Vec<SearchQueryTerm>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiVersionDto {
    pub api_version: String,
}

fn finish<T: Serialize>(handler: &str, result: Result<T, ApiError>) -> Response {
    let response = match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => e.into_response(),
    };
    metrics::record_request(handler, response.status().as_u16());
    response
}

/// Query string parameters of a handler, rejections turned into an error list.
fn params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))
}

pub async fn get_product_availability(
    State(state): State<AppState>,
    Path(base_site_id): Path<String>,
    query: Result<Query<AvailabilityParams>, QueryRejection>,
) -> Response {
    let result = params(query).and_then(|params| availability(&state, &base_site_id, params.filters.as_deref()));
    finish("ProductAvailabilityController.getProductAvailability", result)
}

fn availability(state: &AppState, base_site_id: &str, filters: Option<&str>) -> Result<AvailabilityDto, ApiError> {
    let query = state.decoder.decode(filters)?;
    tracing::debug!(
        base_site = %base_site_id,
        products = query.products.len(),
        "Availability requested"
    );
    let data = state.availability.availability_for(&query)?;
    Ok(AvailabilityDto::from(&data))
}

pub async fn search_products(
    State(state): State<AppState>,
    Path(base_site_id): Path<String>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Response {
    let result = params(query).and_then(|params| {
        let query = state.codec.decode_query(params.query.as_deref())?;
        Ok(search_result(&state.codec, "ProductsController.searchProducts", base_site_id, query))
    });
    finish("ProductsController.searchProducts", result)
}

/// Search variant that applies [`DEFAULT_SORT`] when none is given.
pub async fn custom_search_products(
    State(state): State<AppState>,
    Path(base_site_id): Path<String>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Response {
    let result = params(query).and_then(|params| {
        let mut query = state.codec.decode_query(params.query.as_deref())?;
        if query.sort.as_deref().map_or(true, str::is_empty) {
            query.sort = Some(DEFAULT_SORT.to_string());
        }
        Ok(search_result(&state.codec, "CustomProductsController.searchProducts", base_site_id, query))
    });
    finish("CustomProductsController.searchProducts", result)
}

fn search_result(
    codec: &DefaultSearchQueryCodec,
    handler: &str,
    base_site: String,
    query: SearchQuery,
) -> SearchResultDto {
    SearchResultDto {
        handler: handler.to_string(),
        base_site,
        current_query: codec.encode_query(Some(&query)).unwrap_or_default(),
        free_text_search: query.free_text,
        sort: query.sort,
        filter_terms: query.terms,
    }
}

pub async fn get_api_version(State(state): State<AppState>, Path(_base_site_id): Path<String>) -> Response {
    finish(
        "MiscsController.getApiVersion",
        Ok::<_, ApiError>(ApiVersionDto {
            api_version: state.api_version.clone(),
        }),
    )
}
