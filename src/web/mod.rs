//! Web API module for TrackFinder.
//!
//! This module serves the catalog operations as a JSON REST API for the
//! storefront and admin frontends.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/track-sizes` - All track sizes
//! - `GET /api/track-sizes/groups?unit=` - Sizes grouped by width bucket
//! - `GET /api/track-sizes/{size}?unit=` - One size, converted to a unit
//! - `GET /api/track-sizes/{size}/machines` - Machines a size fits
//! - `GET /api/compatibility?search=` - Fuzzy machine search (absent = all)
//! - `GET /api/products` - Filtered, sorted, paginated product listing
//! - `GET /api/brands` - Canonical brands, catalog brands and categories
//! - `GET /api/brands/normalize?q=` - Brand alias lookup
//! - `GET /api/redirects/resolve?path=` - Redirect lookup
//! - `POST /api/admin/login` / `POST /api/admin/logout` - Admin session
//! - `GET /api/admin/integrity` - Catalog integrity report
//! - `GET /api/admin/compatibility?search=` - Admin machine filter
//! - `POST /api/admin/reload` - Reload the catalog from disk

pub mod session;

pub use session::{password_digest, AdminSession, SessionStore};

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::brands::BrandAliases;
use crate::catalog::{Catalog, IntegrityReport, LoadReport};
use crate::config::Config;
use crate::models::{CompatibilityRecord, Product, TrackSize};
use crate::products::{paginate, ProductFilterSort, ProductFilters, SortOrder};
use crate::search::{filter_admin, MachineSearch};
use crate::track_sizes::{convert, BucketRule, DisplaySize, TrackSizeIndex, Unit, WidthGroups};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the web API.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    config: Arc<Config>,
    /// Brand alias table (immutable after load)
    aliases: Arc<BrandAliases>,
    /// Loaded catalog, replaced wholesale on reload
    catalog: Arc<RwLock<Catalog>>,
    /// Directory the catalog is loaded from
    data_dir: PathBuf,
    /// Admin sessions
    sessions: Arc<SessionStore>,
}

impl AppState {
    /// Creates a state around an already-loaded catalog.
    pub fn new(config: Config, catalog: Catalog, data_dir: PathBuf) -> anyhow::Result<Self> {
        let aliases = BrandAliases::load()?;
        let sessions = SessionStore::new(
            config.admin.password_sha256.clone(),
            config.admin.session_ttl_minutes,
        );

        Ok(Self {
            config: Arc::new(config),
            aliases: Arc::new(aliases),
            catalog: Arc::new(RwLock::new(catalog)),
            data_dir,
            sessions: Arc::new(sessions),
        })
    }

    /// Creates a state, loading the catalog from `data_dir`.
    pub async fn load(config: Config, data_dir: PathBuf) -> anyhow::Result<Self> {
        let catalog = Catalog::load_dir_async(&data_dir).await;
        Self::new(config, catalog, data_dir)
    }

    /// Returns the catalog data directory.
    #[must_use]
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    fn bucket_rule(&self) -> BucketRule {
        self.config.catalog.bucket_rule
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current health status (e.g., "healthy").
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Query parameters carrying a display unit.
#[derive(Debug, Deserialize)]
pub struct UnitQuery {
    /// "mm" (default) or "inches".
    pub unit: Option<String>,
}

/// Track size list response.
#[derive(Debug, Serialize)]
pub struct TrackSizeListResponse {
    /// All active track sizes in catalog order.
    pub track_sizes: Vec<TrackSize>,
    /// Number of track sizes.
    pub total: usize,
}

/// One width bucket of the compatibility chart.
#[derive(Debug, Serialize)]
pub struct WidthGroupResponse {
    /// Bucket label in the requested unit.
    pub bucket: i64,
    /// Sizes in the bucket, converted to the requested unit.
    pub sizes: Vec<DisplaySize>,
}

/// Grouped track sizes response.
#[derive(Debug, Serialize)]
pub struct WidthGroupsResponse {
    /// Unit the buckets and sizes are expressed in.
    pub unit: Unit,
    /// Bucket rule in effect.
    pub bucket_rule: BucketRule,
    /// Bucket shown first (smallest).
    pub default_bucket: Option<i64>,
    /// Buckets in ascending order.
    pub groups: Vec<WidthGroupResponse>,
    /// Sizes left out because their width is unknown.
    pub skipped: usize,
}

/// Single track size response.
#[derive(Debug, Serialize)]
pub struct TrackSizeResponse {
    /// The stored record.
    pub track_size: TrackSize,
    /// The record in the requested unit, if all dimensions are known.
    pub display: Option<DisplaySize>,
}

/// A machine in API responses.
#[derive(Debug, Serialize)]
pub struct MachineInfo {
    /// Machine make.
    pub make: String,
    /// Machine model.
    pub model: String,
    /// Display name ("Bobcat T190").
    pub machine: String,
    /// Compatible size codes in display order.
    pub track_sizes: Vec<String>,
    /// Size codes with no matching track size.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unlisted_sizes: Vec<String>,
    /// Name of the search strategy that matched, for searches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_by: Option<&'static str>,
}

impl MachineInfo {
    fn new(record: &CompatibilityRecord, index: &TrackSizeIndex<'_>) -> Self {
        Self {
            make: record.make.clone(),
            model: record.model.clone(),
            machine: record.machine_name(),
            track_sizes: record.track_sizes.clone(),
            unlisted_sizes: record
                .track_sizes
                .iter()
                .filter(|code| index.lookup(code).is_none())
                .cloned()
                .collect(),
            matched_by: None,
        }
    }
}

/// Machine list response.
#[derive(Debug, Serialize)]
pub struct MachineListResponse {
    /// Matching machines in catalog order.
    pub machines: Vec<MachineInfo>,
    /// Number of machines.
    pub total: usize,
}

impl MachineListResponse {
    fn from_machines(machines: Vec<MachineInfo>) -> Self {
        let total = machines.len();
        Self { machines, total }
    }
}

/// Query parameters for machine search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search term. Absent means "no filter".
    pub search: Option<String>,
}

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    /// Free-text search.
    pub search: Option<String>,
    /// Exact brand, or "all".
    pub brand: Option<String>,
    /// Exact category, or "all".
    pub category: Option<String>,
    /// Sort order (featured, price-low, price-high, name).
    pub sort: Option<String>,
    /// Number of products to skip.
    pub skip: Option<usize>,
    /// Page size, capped at 100.
    pub limit: Option<usize>,
}

/// Product listing response.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    /// Products on this page.
    pub products: Vec<Product>,
    /// Number of products matching the filters.
    pub total: usize,
    /// Products skipped.
    pub skip: usize,
    /// Effective page size.
    pub limit: usize,
}

/// Brand list response.
#[derive(Debug, Serialize)]
pub struct BrandListResponse {
    /// Canonical brand names known to the alias table.
    pub canonical: Vec<String>,
    /// Brands that appear on products.
    pub catalog: Vec<String>,
    /// Product categories.
    pub categories: Vec<String>,
}

/// Query parameters for brand normalization.
#[derive(Debug, Deserialize)]
pub struct NormalizeQuery {
    /// Token to normalize.
    pub q: Option<String>,
}

/// Brand normalization response.
#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    /// Input as given.
    pub input: String,
    /// Canonical name, or the input when unknown.
    pub normalized: String,
    /// Whether the alias table knows the token.
    pub known: bool,
}

/// Query parameters for redirect resolution.
#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    /// Request path.
    pub path: Option<String>,
}

/// Redirect resolution response.
#[derive(Debug, Serialize)]
pub struct RedirectResponse {
    /// Source path as registered.
    pub from: String,
    /// Final target after following the chain.
    pub to: String,
    /// HTTP status to redirect with.
    pub status: u16,
}

/// Admin login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Admin password.
    pub password: String,
}

/// Admin integrity response.
#[derive(Debug, Serialize)]
pub struct IntegrityResponse {
    /// Cross-reference findings.
    pub report: IntegrityReport,
    /// Per-collection load statistics.
    pub load: LoadReport,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

fn bad_request(error: impl Into<String>, details: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError::with_details(error, details)),
    )
}

fn unauthorized(error: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (StatusCode::UNAUTHORIZED, Json(ApiError::new(error)))
}

// ============================================================================
// Request Helpers
// ============================================================================

/// Parses an optional unit parameter, defaulting to millimeters.
fn parse_unit(unit: Option<&str>) -> ApiResult<Unit> {
    match unit {
        None => Ok(Unit::default()),
        Some(value) => value
            .parse()
            .map_err(|e: anyhow::Error| bad_request("Invalid unit", e.to_string())),
    }
}

/// Extracts the bearer token from an Authorization header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Checks the request carries a live admin token and returns it.
fn require_admin(state: &AppState, headers: &HeaderMap) -> ApiResult<String> {
    let token = bearer_token(headers).ok_or_else(|| unauthorized("Missing bearer token"))?;
    if !state.sessions.validate(token) {
        return Err(unauthorized("Invalid or expired session"));
    }
    Ok(token.to_string())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /health - Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/track-sizes - List all track sizes.
async fn list_track_sizes(State(state): State<AppState>) -> Json<TrackSizeListResponse> {
    let catalog = state.catalog.read().await;
    let track_sizes = catalog.track_sizes.clone();
    let total = track_sizes.len();
    Json(TrackSizeListResponse { track_sizes, total })
}

/// GET /api/track-sizes/groups - Track sizes grouped by width bucket.
async fn track_size_groups(
    State(state): State<AppState>,
    Query(query): Query<UnitQuery>,
) -> ApiResult<Json<WidthGroupsResponse>> {
    let unit = parse_unit(query.unit.as_deref())?;
    let bucket_rule = state.bucket_rule();
    let catalog = state.catalog.read().await;
    let groups = WidthGroups::build(&catalog.track_sizes, bucket_rule);

    let buckets = groups
        .buckets(unit)
        .into_iter()
        .map(|bucket| WidthGroupResponse {
            bucket,
            sizes: groups
                .sizes_in(unit, bucket)
                .iter()
                .filter_map(|size| convert(size, unit))
                .collect(),
        })
        .collect();

    Ok(Json(WidthGroupsResponse {
        unit,
        bucket_rule,
        default_bucket: groups.first_bucket(unit),
        groups: buckets,
        skipped: groups.skipped(),
    }))
}

/// GET /api/track-sizes/{size} - One track size in a display unit.
async fn get_track_size(
    State(state): State<AppState>,
    Path(size): Path<String>,
    Query(query): Query<UnitQuery>,
) -> ApiResult<Json<TrackSizeResponse>> {
    let unit = parse_unit(query.unit.as_deref())?;
    let catalog = state.catalog.read().await;
    let track_size = catalog.track_size(&size).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ApiError::new(format!("Track size not found: {size}"))),
        )
    })?;

    Ok(Json(TrackSizeResponse {
        display: convert(track_size, unit),
        track_size: track_size.clone(),
    }))
}

/// GET /api/track-sizes/{size}/machines - Machines a size fits.
async fn track_size_machines(
    State(state): State<AppState>,
    Path(size): Path<String>,
) -> Json<MachineListResponse> {
    let catalog = state.catalog.read().await;
    let index = catalog.track_size_index();
    let machines = catalog
        .compatible_machines(&size)
        .into_iter()
        .map(|record| MachineInfo::new(record, &index))
        .collect();
    Json(MachineListResponse::from_machines(machines))
}

/// GET /api/compatibility - Fuzzy machine search.
///
/// Without `search` every machine is listed; an empty `search` lists none.
async fn search_compatibility(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<MachineListResponse> {
    let catalog = state.catalog.read().await;
    let index = catalog.track_size_index();
    let search = MachineSearch::new(&state.aliases);

    let machines = match query.search.as_deref() {
        None => catalog
            .compatibility
            .iter()
            .map(|record| MachineInfo::new(record, &index))
            .collect(),
        Some(term) => search
            .search_explained(term, &catalog.compatibility)
            .into_iter()
            .map(|found| MachineInfo {
                matched_by: Some(found.strategy.name()),
                ..MachineInfo::new(found.record, &index)
            })
            .collect(),
    };

    Json(MachineListResponse::from_machines(machines))
}

/// GET /api/products - Filtered, sorted, paginated product listing.
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Json<ProductListResponse>> {
    let sort: SortOrder = query
        .sort
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|e: anyhow::Error| bad_request("Invalid sort order", e.to_string()))?;

    let filters = ProductFilters {
        search: query.search.unwrap_or_default(),
        brand: query.brand.unwrap_or_default(),
        category: query.category.unwrap_or_default(),
    };

    let skip = query.skip.unwrap_or(0);
    let limit = query
        .limit
        .unwrap_or(crate::constants::MAX_PAGE_LIMIT)
        .min(crate::constants::MAX_PAGE_LIMIT);

    let catalog = state.catalog.read().await;
    let listed = ProductFilterSort::new(&state.aliases).apply(&catalog.products, &filters, sort);
    let products = paginate(&listed, skip, limit)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ProductListResponse {
        products,
        total: listed.len(),
        skip,
        limit,
    }))
}

/// GET /api/brands - Brand and category lists.
async fn list_brands(State(state): State<AppState>) -> Json<BrandListResponse> {
    let catalog = state.catalog.read().await;
    Json(BrandListResponse {
        canonical: state
            .aliases
            .canonical_brands()
            .into_iter()
            .map(str::to_string)
            .collect(),
        catalog: catalog.brands().into_iter().map(str::to_string).collect(),
        categories: catalog.categories().into_iter().map(str::to_string).collect(),
    })
}

/// GET /api/brands/normalize - Brand alias lookup.
async fn normalize_brand(
    State(state): State<AppState>,
    Query(query): Query<NormalizeQuery>,
) -> ApiResult<Json<NormalizeResponse>> {
    let input = query
        .q
        .ok_or_else(|| bad_request("Missing query parameter", "q is required"))?;

    Ok(Json(NormalizeResponse {
        normalized: state.aliases.normalize(&input),
        known: state.aliases.canonical(&input).is_some(),
        input,
    }))
}

/// GET /api/redirects/resolve - Redirect lookup.
async fn resolve_redirect(
    State(state): State<AppState>,
    Query(query): Query<RedirectQuery>,
) -> ApiResult<Json<RedirectResponse>> {
    let path = query
        .path
        .ok_or_else(|| bad_request("Missing query parameter", "path is required"))?;

    let catalog = state.catalog.read().await;
    let first = catalog.redirects.resolve(&path);
    let last = catalog.redirects.resolve_chain(&path);

    match (first, last) {
        (Some(first), Some(last)) => Ok(Json(RedirectResponse {
            from: first.from_url.clone(),
            to: last.to_url.clone(),
            status: first.kind().status_code(),
        })),
        (Some(_), None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError::with_details(
                format!("No redirect for {path}"),
                "redirect chain loops back on itself",
            )),
        )),
        _ => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError::new(format!("No redirect for {path}"))),
        )),
    }
}

/// POST /api/admin/login - Start an admin session.
async fn admin_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<AdminSession>> {
    if !state.sessions.enabled() {
        return Err(unauthorized("Admin login is not configured"));
    }

    state
        .sessions
        .login(&request.password)
        .map(Json)
        .ok_or_else(|| unauthorized("Invalid password"))
}

/// POST /api/admin/logout - End the admin session.
async fn admin_logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    let token = require_admin(&state, &headers)?;
    state.sessions.logout(&token);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/integrity - Catalog integrity report.
async fn admin_integrity(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<IntegrityResponse>> {
    require_admin(&state, &headers)?;
    let catalog = state.catalog.read().await;
    Ok(Json(IntegrityResponse {
        report: catalog.integrity_report(),
        load: catalog.report,
    }))
}

/// GET /api/admin/compatibility - Admin machine filter.
async fn admin_compatibility(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<MachineListResponse>> {
    require_admin(&state, &headers)?;
    let catalog = state.catalog.read().await;
    let index = catalog.track_size_index();
    let machines = filter_admin(query.search.as_deref().unwrap_or(""), &catalog.compatibility)
        .into_iter()
        .map(|record| MachineInfo::new(record, &index))
        .collect();
    Ok(Json(MachineListResponse::from_machines(machines)))
}

/// POST /api/admin/reload - Reload the catalog from the data directory.
async fn admin_reload(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<LoadReport>> {
    require_admin(&state, &headers)?;
    let catalog = Catalog::load_dir_async(&state.data_dir).await;
    let report = catalog.report;
    *state.catalog.write().await = catalog;
    info!("Catalog reloaded from {}", state.data_dir.display());
    Ok(Json(report))
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    // The storefront frontend is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Track size endpoints
        .route("/api/track-sizes", get(list_track_sizes))
        .route("/api/track-sizes/groups", get(track_size_groups))
        .route("/api/track-sizes/{size}", get(get_track_size))
        .route("/api/track-sizes/{size}/machines", get(track_size_machines))
        // Compatibility search
        .route("/api/compatibility", get(search_compatibility))
        // Product listing
        .route("/api/products", get(list_products))
        // Brand endpoints
        .route("/api/brands", get(list_brands))
        .route("/api/brands/normalize", get(normalize_brand))
        // Redirects
        .route("/api/redirects/resolve", get(resolve_redirect))
        // Admin endpoints
        .route("/api/admin/login", post(admin_login))
        .route("/api/admin/logout", post(admin_logout))
        .route("/api/admin/integrity", get(admin_integrity))
        .route("/api/admin/compatibility", get(admin_compatibility))
        .route("/api/admin/reload", post(admin_reload))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the web server.
///
/// # Arguments
///
/// * `config` - Application configuration
/// * `data_dir` - Directory containing the catalog JSON files
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: Config, data_dir: PathBuf, addr: SocketAddr) -> anyhow::Result<()> {
    if !config.admin_enabled() {
        tracing::warn!("admin.password_sha256 is not set, admin endpoints are disabled");
    }

    let state = AppState::load(config, data_dir).await?;
    let app = create_router(state);

    info!("Starting TrackFinder web server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
