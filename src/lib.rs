use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod qr;
pub mod repository;
pub mod storage;

// Module for routing segregation (Public, Authenticated, Admin).
pub mod routes;
use auth::AuthUser;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use repository::{PostgresRepository, RepositoryState};
pub use storage::{LocalDiskStorage, MockStorageService, StorageState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the application,
/// aggregating every path and schema decorated with the `#[utoipa::path]` and
/// `#[derive(utoipa::ToSchema)]` macros. Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register, handlers::login, handlers::get_me,
        handlers::list_memorials, handlers::get_memorial_details,
        handlers::create_memorial, handlers::update_memorial, handlers::delete_memorial,
        handlers::add_photo, handlers::set_main_photo, handlers::delete_photo,
        handlers::add_video, handlers::add_memory,
        handlers::toggle_visibility, handlers::list_user_memorials,
        handlers::admin_list_users, handlers::admin_create_user, handlers::admin_delete_user,
        handlers::admin_list_memorials, handlers::admin_create_memorial,
        handlers::admin_update_memorial, handlers::admin_delete_memorial,
        handlers::approve_memorial
    ),
    components(
        schemas(
            models::User, models::Memorial, models::Photo, models::Video, models::Memory,
            models::RegisterRequest, models::LoginRequest, models::AuthResponse,
            models::CreateMemorialRequest, models::UpdateMemorialRequest,
            models::CreateMemoryRequest, models::AdminCreateUserRequest,
            models::AdminCreateMemorialRequest,
        )
    ),
    tags(
        (name = "memorial-api", description = "Memorial Sharing API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe, immutable container holding all essential
/// application services and configuration, shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: abstracts document-store access.
    pub repo: RepositoryState,
    /// Storage Layer: abstracts the uploaded-media blob store.
    pub storage: StorageState,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These implementations allow extractors and handlers to selectively pull
// components from the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Enforces authentication for the authenticated route set by attempting the
/// `AuthUser` extraction up front. A missing or invalid token rejects with 401
/// before any handler runs; a valid one lets the request proceed, and the
/// handler re-extracts the identity for its policy checks.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global and
/// scoped middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    let upload_dir = state.config.upload_dir.clone();

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public routes: no middleware applied.
        .merge(public::public_routes())
        // Authenticated routes: protected by the auth middleware.
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        // Admin routes: nested under '/api/admin'. The admin check itself is
        // performed by the policy layer inside the handlers, against the
        // signed token claims.
        .nest(
            "/api/admin",
            admin::admin_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        // Uploaded media served back as static content.
        .nest_service("/uploads", ServeDir::new(upload_dir))
        // Multipart bodies must fit the 5MB file cap plus envelope overhead.
        .layer(DefaultBodyLimit::max(8 * 1024 * 1024))
        // Apply the unified state to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (applied outermost)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID generation: a unique UUID per incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request tracing: wraps the request/response lifecycle in a span
                // that carries the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS layer (applied last).
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes span creation for `TraceLayer`: extracts the `x-request-id`
/// header (if present) and includes it alongside the HTTP method and URI so
/// every log line for a single request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
