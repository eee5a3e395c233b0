use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Authenticated Router Module
///
/// Routes for any caller who passed the authentication layer. Every handler
/// here relies on the `AuthUser` extractor middleware mounted on the layer
/// above this module, so each receives a validated identity and feeds it into
/// the policy check (ownership for mutations, admin for the visibility toggle).
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /api/users/me
        // The authenticated caller's own profile.
        .route("/api/users/me", get(handlers::get_me))
        // POST /api/memorials
        // Creates a memorial owned by the caller; admins create pre-approved.
        .route("/api/memorials", post(handlers::create_memorial))
        // PUT/DELETE /api/memorials/{id}
        // Field updates and record deletion. Owner or admin; deletion also
        // removes each photo's backing file (best-effort).
        .route(
            "/api/memorials/{id}",
            put(handlers::update_memorial).delete(handlers::delete_memorial),
        )
        // --- Photo sub-resource (owner or admin) ---
        // POST /api/memorials/{id}/photos, multipart field `photo`.
        .route("/api/memorials/{id}/photos", post(handlers::add_photo))
        // PUT /api/memorials/{id}/photos/{photo_id}/main, one-main invariant.
        .route(
            "/api/memorials/{id}/photos/{photo_id}/main",
            put(handlers::set_main_photo),
        )
        // DELETE /api/memorials/{id}/photos/{photo_id}
        .route(
            "/api/memorials/{id}/photos/{photo_id}",
            delete(handlers::delete_photo),
        )
        // POST /api/memorials/{id}/videos, multipart field `video`.
        // Creator only; this is the one mutation without an admin override.
        .route("/api/memorials/{id}/videos", post(handlers::add_video))
        // PUT /api/memorials/{id}/toggle-visibility
        // Admin-only hide/unhide; the role check happens in the handler.
        .route(
            "/api/memorials/{id}/toggle-visibility",
            put(handlers::toggle_visibility),
        )
        // GET /api/memorials/user/{user_id}
        // Owner listing, visibility-unfiltered, open to any authenticated caller.
        .route(
            "/api/memorials/user/{user_id}",
            get(handlers::list_user_memorials),
        )
}
