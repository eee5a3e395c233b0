use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, put},
};

/// Admin Router Module
///
/// Moderation and account-management endpoints, nested under `/api/admin`.
/// The surrounding authentication layer guarantees a validated identity;
/// every handler then re-verifies the admin flag from the signed token via
/// the policy layer before touching the repository. Non-admin callers with a
/// valid token answer 403.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET/POST /api/admin/users
        // Account listing and creation (the only path that can mint admins).
        .route(
            "/users",
            get(handlers::admin_list_users).post(handlers::admin_create_user),
        )
        // DELETE /api/admin/users/{id}
        // Irreversible; the user's memorials are left in place.
        .route(
            "/users/{id}",
            axum::routing::delete(handlers::admin_delete_user),
        )
        // GET/POST /api/admin/memorials
        // Full moderation queue and on-behalf-of creation (pre-approved).
        .route(
            "/memorials",
            get(handlers::admin_list_memorials).post(handlers::admin_create_memorial),
        )
        // PUT/DELETE /api/admin/memorials/{id}
        .route(
            "/memorials/{id}",
            put(handlers::admin_update_memorial).delete(handlers::admin_delete_memorial),
        )
        // PUT /api/admin/memorials/{id}/approve
        // One-way, idempotent approval into the public listing.
        .route("/memorials/{id}/approve", put(handlers::approve_memorial))
}
