use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are unauthenticated and accessible to any client,
/// anonymous or logged-in.
///
/// Visibility mandate: the listing endpoint must enforce
/// `is_approved = true AND is_hidden = false` at the Repository level. The
/// single-memorial detail view is the one documented exception: it resolves
/// regardless of moderation state so printed QR codes keep working.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated endpoint for monitoring and load balancer checks.
        .route("/health", get(|| async { "ok" }))
        // POST /api/auth/register
        // Creates an account (never an admin) and returns a signed token.
        .route("/api/auth/register", post(handlers::register))
        // POST /api/auth/login
        // Verifies credentials; unknown email and bad password are indistinguishable.
        .route("/api/auth/login", post(handlers::login))
        // GET /api/memorials
        // The filtered public listing, newest first.
        .route("/api/memorials", get(handlers::list_memorials))
        // GET /api/memorials/{id}
        // Detail view, unfiltered by approval/hidden state (QR deep links).
        .route("/api/memorials/{id}", get(handlers::get_memorial_details))
        // POST /api/memorials/{id}/memories
        // Visitor memory submission; no credential required, author taken on trust.
        .route(
            "/api/memorials/{id}/memories",
            post(handlers::add_memory),
        )
}
