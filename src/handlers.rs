use crate::{
    AppState,
    auth::{self, AuthUser},
    error::ApiError,
    models::{
        AdminCreateMemorialRequest, AdminCreateUserRequest, AuthResponse, CreateMemorialRequest,
        CreateMemoryRequest, LoginRequest, Memorial, RegisterRequest, UpdateMemorialRequest, User,
    },
    policy::{self, Action},
    qr,
};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use uuid::Uuid;

// --- Upload Constraints ---

/// Per-file upload cap. Matches the documented 5MB client contract.
const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];
const VIDEO_TYPES: &[&str] = &["video/mp4", "video/webm", "video/quicktime", "video/ogg"];

// --- Shared Helpers ---

/// Memorial ids arrive as opaque path strings. A malformed id is
/// indistinguishable from an unknown one to the caller: both answer 404.
fn parse_memorial_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Memorial not found"))
}

/// Loads a memorial or fails with the canonical 404.
async fn load_memorial(state: &AppState, id: Uuid) -> Result<Memorial, ApiError> {
    state
        .repo
        .get_memorial(id)
        .await?
        .ok_or(ApiError::NotFound("Memorial not found"))
}

/// Second phase of memorial creation: generate the deep-link QR payload (which
/// needs the assigned id) and persist it. Both steps are best-effort: a
/// memorial without a QR code is a valid, if incomplete, state that a later
/// pass or recreation can repair, so failures are logged and the memorial is
/// returned as-is rather than failing the creation.
async fn attach_qr_code(state: &AppState, memorial: Memorial) -> Memorial {
    let data_uri = match qr::memorial_qr_data_uri(&state.config.client_url, memorial.id) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::warn!("QR generation failed for memorial {}: {:?}", memorial.id, e);
            return memorial;
        }
    };

    match state.repo.set_qr_code(memorial.id, &data_uri).await {
        Ok(Some(updated)) => updated,
        Ok(None) => memorial,
        Err(e) => {
            tracing::warn!("failed to persist QR code for {}: {:?}", memorial.id, e);
            memorial
        }
    }
}

/// A single uploaded file pulled out of a multipart body, plus any `caption`
/// text field travelling alongside it.
struct UploadedFile {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
    caption: Option<String>,
}

/// Drains a multipart body looking for the named file field. Enforces the
/// size cap; MIME validation is left to the caller since photos and videos
/// carry different allowlists.
async fn read_upload(
    mut multipart: Multipart,
    field_name: &str,
    missing_msg: &'static str,
) -> Result<UploadedFile, ApiError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut caption: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("Invalid multipart payload".to_string()))?
    {
        match field.name() {
            Some(name) if name == field_name => {
                let filename = field.file_name().unwrap_or("file").to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::Validation("Invalid multipart payload".to_string()))?;
                file = Some((filename, content_type, bytes.to_vec()));
            }
            Some("caption") => {
                caption = field.text().await.ok().filter(|c| !c.is_empty());
            }
            _ => {}
        }
    }

    let (filename, content_type, bytes) =
        file.ok_or(ApiError::Validation(missing_msg.to_string()))?;

    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::Validation(
            "File exceeds the 5MB upload limit".to_string(),
        ));
    }

    Ok(UploadedFile {
        filename,
        content_type,
        bytes,
        caption,
    })
}

// --- Identity & Credential Handlers ---

/// register
///
/// [Public Route] Creates a user account and signs them in immediately.
/// Self-registration can never mint an admin: the flag is hardwired false on
/// this path. Duplicate emails answer Conflict.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered", body = AuthResponse),
        (status = 400, description = "Duplicate email or missing fields")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(ApiError::Validation(
            "Name, email and password are required".to_string(),
        ));
    }

    if state.repo.get_user_by_email(&payload.email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists"));
    }

    let hash = auth::hash_password(&payload.password)?;
    let user = state
        .repo
        .create_user(&payload.name, &payload.email, &hash, false)
        .await?;

    let token = auth::issue_token(&user, &state.config.jwt_secret).map_err(|e| {
        tracing::error!("token signing failed: {:?}", e);
        ApiError::Internal
    })?;

    Ok(Json(AuthResponse { token, user }))
}

/// login
///
/// [Public Route] Verifies a credential pair and returns a fresh token.
/// Unknown email and wrong password produce the identical response, so the
/// endpoint cannot be used to enumerate registered addresses.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = state
        .repo
        .get_user_by_email(&payload.email)
        .await?
        .filter(|u| auth::verify_password(&payload.password, &u.password_hash))
        .ok_or(ApiError::Unauthenticated("Invalid credentials"))?;

    let token = auth::issue_token(&user, &state.config.jwt_secret).map_err(|e| {
        tracing::error!("token signing failed: {:?}", e);
        ApiError::Internal
    })?;

    Ok(Json(AuthResponse { token, user }))
}

/// get_me
///
/// [Authenticated Route] The current user's profile, resolved from the store
/// so a deleted account stops resolving even while its token is still live.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses((status = 200, description = "Profile", body = User))
)]
pub async fn get_me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .repo
        .get_user(auth_user.id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(user))
}

// --- Memorial Handlers ---

/// list_memorials
///
/// [Public Route] The anonymous listing. The repository query enforces
/// `is_approved AND NOT is_hidden` unconditionally, newest first.
#[utoipa::path(
    get,
    path = "/api/memorials",
    responses((status = 200, description = "Public memorials", body = [Memorial]))
)]
pub async fn list_memorials(
    State(state): State<AppState>,
) -> Result<Json<Vec<Memorial>>, ApiError> {
    Ok(Json(state.repo.list_public_memorials().await?))
}

/// get_memorial_details
///
/// [Public Route] Single memorial by id. Deliberately no approval/hidden
/// filter here: direct links, including ones printed as QR codes before
/// moderation finished, must keep resolving.
#[utoipa::path(
    get,
    path = "/api/memorials/{id}",
    params(("id" = String, Path, description = "Memorial ID")),
    responses(
        (status = 200, description = "Found", body = Memorial),
        (status = 404, description = "Unknown or malformed id")
    )
)]
pub async fn get_memorial_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Memorial>, ApiError> {
    let id = parse_memorial_id(&id)?;
    let memorial = load_memorial(&state, id).await?;
    Ok(Json(memorial))
}

/// create_memorial
///
/// [Authenticated Route] Creates a memorial owned by the caller. Admin
/// creators skip the moderation queue (`is_approved = true` immediately);
/// everyone else starts unapproved. Creation is a two-step sequence: the row
/// is inserted first, then the QR payload (which needs the assigned id) is
/// attached in a follow-up write.
#[utoipa::path(
    post,
    path = "/api/memorials",
    request_body = CreateMemorialRequest,
    responses((status = 200, description = "Created", body = Memorial))
)]
pub async fn create_memorial(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateMemorialRequest>,
) -> Result<Json<Memorial>, ApiError> {
    policy::authorize(&auth_user.actor(), Action::CreateMemorial, None)?;

    if payload.name.trim().is_empty() || payload.biography.trim().is_empty() {
        return Err(ApiError::Validation(
            "Name and biography are required".to_string(),
        ));
    }

    let memorial = state
        .repo
        .create_memorial(&payload, auth_user.id, auth_user.is_admin)
        .await?;

    Ok(Json(attach_qr_code(&state, memorial).await))
}

/// update_memorial
///
/// [Authenticated Route] Partial update of the biographical fields. Owner or
/// admin only; a valid non-owner credential answers 403.
#[utoipa::path(
    put,
    path = "/api/memorials/{id}",
    request_body = UpdateMemorialRequest,
    responses(
        (status = 200, description = "Updated", body = Memorial),
        (status = 403, description = "Not owner or admin"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_memorial(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateMemorialRequest>,
) -> Result<Json<Memorial>, ApiError> {
    let id = parse_memorial_id(&id)?;
    let memorial = load_memorial(&state, id).await?;
    policy::authorize(
        &auth_user.actor(),
        Action::EditMemorial,
        Some(memorial.created_by),
    )?;

    state
        .repo
        .update_memorial(id, &payload)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Memorial not found"))
}

/// delete_memorial
///
/// [Authenticated Route] Removes a memorial and, first, every photo's backing
/// file. File cleanup is best-effort: a missing or stubborn file is logged
/// and the record deletion proceeds regardless.
#[utoipa::path(
    delete,
    path = "/api/memorials/{id}",
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not owner or admin"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_memorial(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_memorial_id(&id)?;
    let memorial = load_memorial(&state, id).await?;
    policy::authorize(
        &auth_user.actor(),
        Action::EditMemorial,
        Some(memorial.created_by),
    )?;

    for photo in &memorial.photos {
        if let Err(e) = state.storage.remove(&photo.url).await {
            tracing::warn!("failed to remove photo file {}: {}", photo.url, e);
        }
    }

    if state.repo.delete_memorial(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Memorial not found"))
    }
}

// --- Photo Handlers ---

/// add_photo
///
/// [Authenticated Route] Multipart upload, field `photo`. JPEG/PNG/GIF only,
/// capped at 5MB. The first photo of a memorial becomes the main photo
/// automatically; the updated collection lands as one atomic row write.
#[utoipa::path(
    post,
    path = "/api/memorials/{id}/photos",
    responses(
        (status = 200, description = "Photo added", body = Memorial),
        (status = 415, description = "Disallowed image type")
    )
)]
pub async fn add_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Memorial>, ApiError> {
    let id = parse_memorial_id(&id)?;
    let mut memorial = load_memorial(&state, id).await?;
    policy::authorize(
        &auth_user.actor(),
        Action::EditMemorial,
        Some(memorial.created_by),
    )?;

    let upload = read_upload(multipart, "photo", "No photo uploaded").await?;
    if !IMAGE_TYPES.contains(&upload.content_type.as_str()) {
        return Err(ApiError::UnsupportedMedia(
            "Invalid file type. Only JPEG, PNG and GIF are allowed.",
        ));
    }

    let url = state
        .storage
        .store("memorials", &upload.filename, &upload.bytes)
        .await
        .map_err(|e| {
            tracing::error!("photo storage failed: {}", e);
            ApiError::Internal
        })?;

    memorial.add_photo(url);

    state
        .repo
        .replace_photos(id, &memorial.photos)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Memorial not found"))
}

/// set_main_photo
///
/// [Authenticated Route] Designates one photo as main, unsetting every other
/// flag within the same row write so no interleaving can observe zero or two
/// main photos.
#[utoipa::path(
    put,
    path = "/api/memorials/{id}/photos/{photo_id}/main",
    responses(
        (status = 200, description = "Main photo set", body = Memorial),
        (status = 404, description = "Memorial or photo not found")
    )
)]
pub async fn set_main_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((id, photo_id)): Path<(String, String)>,
) -> Result<Json<Memorial>, ApiError> {
    let id = parse_memorial_id(&id)?;
    let photo_id = Uuid::parse_str(&photo_id).map_err(|_| ApiError::NotFound("Photo not found"))?;

    let mut memorial = load_memorial(&state, id).await?;
    policy::authorize(
        &auth_user.actor(),
        Action::EditMemorial,
        Some(memorial.created_by),
    )?;

    if !memorial.set_main_photo(photo_id) {
        return Err(ApiError::NotFound("Photo not found"));
    }

    state
        .repo
        .replace_photos(id, &memorial.photos)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Memorial not found"))
}

/// delete_photo
///
/// [Authenticated Route] Removes a photo and its backing file (best-effort).
/// If the removed photo was main and others remain, the first remaining photo
/// is promoted so the one-main invariant holds.
#[utoipa::path(
    delete,
    path = "/api/memorials/{id}/photos/{photo_id}",
    responses(
        (status = 200, description = "Photo deleted", body = Memorial),
        (status = 404, description = "Memorial or photo not found")
    )
)]
pub async fn delete_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((id, photo_id)): Path<(String, String)>,
) -> Result<Json<Memorial>, ApiError> {
    let id = parse_memorial_id(&id)?;
    let photo_id = Uuid::parse_str(&photo_id).map_err(|_| ApiError::NotFound("Photo not found"))?;

    let mut memorial = load_memorial(&state, id).await?;
    policy::authorize(
        &auth_user.actor(),
        Action::EditMemorial,
        Some(memorial.created_by),
    )?;

    let removed = memorial
        .remove_photo(photo_id)
        .ok_or(ApiError::NotFound("Photo not found"))?;

    if let Err(e) = state.storage.remove(&removed.url).await {
        tracing::warn!("failed to remove photo file {}: {}", removed.url, e);
    }

    state
        .repo
        .replace_photos(id, &memorial.photos)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Memorial not found"))
}

// --- Video & Memory Handlers ---

/// add_video
///
/// [Authenticated Route] Multipart upload, field `video`, optional `caption`
/// text field. This is the one mutation with no admin override: only the
/// memorial's creator may attach videos. Newest first.
#[utoipa::path(
    post,
    path = "/api/memorials/{id}/videos",
    responses(
        (status = 200, description = "Video added", body = Memorial),
        (status = 403, description = "Caller is not the creator"),
        (status = 415, description = "Disallowed video type")
    )
)]
pub async fn add_video(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Memorial>, ApiError> {
    let id = parse_memorial_id(&id)?;
    let mut memorial = load_memorial(&state, id).await?;
    policy::authorize(
        &auth_user.actor(),
        Action::AddVideo,
        Some(memorial.created_by),
    )?;

    let upload = read_upload(multipart, "video", "No video uploaded").await?;
    if !VIDEO_TYPES.contains(&upload.content_type.as_str()) {
        return Err(ApiError::UnsupportedMedia(
            "Invalid file type. Only MP4, WebM, QuickTime and Ogg are allowed.",
        ));
    }

    let url = state
        .storage
        .store("memorials", &upload.filename, &upload.bytes)
        .await
        .map_err(|e| {
            tracing::error!("video storage failed: {}", e);
            ApiError::Internal
        })?;

    memorial.add_video(url, upload.caption);

    state
        .repo
        .replace_videos(id, &memorial.videos)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Memorial not found"))
}

/// add_memory
///
/// [Public Route] Any visitor, anonymous included, may leave a memory. The
/// author field is a display string taken on trust; no account is involved.
/// Newest first.
#[utoipa::path(
    post,
    path = "/api/memorials/{id}/memories",
    request_body = CreateMemoryRequest,
    responses(
        (status = 200, description = "Memory added", body = Memorial),
        (status = 404, description = "Memorial not found")
    )
)]
pub async fn add_memory(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CreateMemoryRequest>,
) -> Result<Json<Memorial>, ApiError> {
    let id = parse_memorial_id(&id)?;

    if payload.content.trim().is_empty() {
        return Err(ApiError::Validation("Memory content is required".to_string()));
    }

    let mut memorial = load_memorial(&state, id).await?;
    memorial.add_memory(payload.content, payload.author);

    state
        .repo
        .replace_memories(id, &memorial.memories)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Memorial not found"))
}

// --- Visibility & Owner Listing Handlers ---

/// toggle_visibility
///
/// [Admin Route] Flips the hidden flag atomically. Calling twice restores the
/// original state. The toggle is the contract, not a one-way transition.
#[utoipa::path(
    put,
    path = "/api/memorials/{id}/toggle-visibility",
    responses(
        (status = 200, description = "Toggled", body = Memorial),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn toggle_visibility(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Memorial>, ApiError> {
    policy::authorize(&auth_user.actor(), Action::Moderate, None)?;
    let id = parse_memorial_id(&id)?;

    state
        .repo
        .toggle_hidden(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Memorial not found"))
}

/// list_user_memorials
///
/// [Authenticated Route] All memorials created by the given user, unfiltered
/// by visibility state. Any authenticated caller may query any owner id;
/// preserved behavior, noted as an open question in DESIGN.md.
#[utoipa::path(
    get,
    path = "/api/memorials/user/{user_id}",
    params(("user_id" = Uuid, Path, description = "Owner's user ID")),
    responses((status = 200, description = "Owner's memorials", body = [Memorial]))
)]
pub async fn list_user_memorials(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Memorial>>, ApiError> {
    policy::authorize(&auth_user.actor(), Action::ListOwned, None)?;
    Ok(Json(state.repo.list_memorials_by_owner(user_id).await?))
}

// --- Admin: User Management ---

/// admin_list_users
///
/// [Admin Route] Every registered account. Password hashes are skipped during
/// serialization, so the payload only ever carries public profile data.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses((status = 200, description = "All users", body = [User]))
)]
pub async fn admin_list_users(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, ApiError> {
    policy::authorize(&auth_user.actor(), Action::ManageUsers, None)?;
    Ok(Json(state.repo.list_users().await?))
}

/// admin_create_user
///
/// [Admin Route] Account creation with an optional admin flag, the only path
/// that can mint admins.
#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = AdminCreateUserRequest,
    responses(
        (status = 200, description = "Created", body = User),
        (status = 400, description = "Duplicate email")
    )
)]
pub async fn admin_create_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<AdminCreateUserRequest>,
) -> Result<Json<User>, ApiError> {
    policy::authorize(&auth_user.actor(), Action::ManageUsers, None)?;

    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(ApiError::Validation(
            "Name, email and password are required".to_string(),
        ));
    }

    if state.repo.get_user_by_email(&payload.email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists"));
    }

    let hash = auth::hash_password(&payload.password)?;
    let user = state
        .repo
        .create_user(&payload.name, &payload.email, &hash, payload.is_admin)
        .await?;

    Ok(Json(user))
}

/// admin_delete_user
///
/// [Admin Route] Irreversible account removal. Memorials the user created are
/// intentionally left in place with their (now dangling) owner reference.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn admin_delete_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    policy::authorize(&auth_user.actor(), Action::ManageUsers, None)?;

    if state.repo.delete_user(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("User not found"))
    }
}

// --- Admin: Memorial Moderation ---

/// admin_list_memorials
///
/// [Admin Route] Every memorial regardless of approval/hidden state, for the
/// moderation queue.
#[utoipa::path(
    get,
    path = "/api/admin/memorials",
    responses((status = 200, description = "All memorials", body = [Memorial]))
)]
pub async fn admin_list_memorials(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Memorial>>, ApiError> {
    policy::authorize(&auth_user.actor(), Action::Moderate, None)?;
    Ok(Json(state.repo.list_all_memorials().await?))
}

/// admin_create_memorial
///
/// [Admin Route] Creates a memorial on behalf of an explicit owner,
/// pre-approved and therefore publicly listed immediately. Runs the same
/// two-step create-then-QR sequence as the user path.
#[utoipa::path(
    post,
    path = "/api/admin/memorials",
    request_body = AdminCreateMemorialRequest,
    responses((status = 200, description = "Created", body = Memorial))
)]
pub async fn admin_create_memorial(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<AdminCreateMemorialRequest>,
) -> Result<Json<Memorial>, ApiError> {
    policy::authorize(&auth_user.actor(), Action::Moderate, None)?;

    if payload.name.trim().is_empty() || payload.biography.trim().is_empty() {
        return Err(ApiError::Validation(
            "Name and biography are required".to_string(),
        ));
    }

    let req = CreateMemorialRequest {
        name: payload.name,
        biography: payload.biography,
        birth_date: payload.birth_date,
        death_date: payload.death_date,
    };

    let memorial = state
        .repo
        .create_memorial(&req, payload.created_by, true)
        .await?;

    Ok(Json(attach_qr_code(&state, memorial).await))
}

/// admin_update_memorial
///
/// [Admin Route] Same restricted field set as the owner update path; the
/// moderation flags have their own dedicated endpoints.
#[utoipa::path(
    put,
    path = "/api/admin/memorials/{id}",
    request_body = UpdateMemorialRequest,
    responses((status = 200, description = "Updated", body = Memorial))
)]
pub async fn admin_update_memorial(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateMemorialRequest>,
) -> Result<Json<Memorial>, ApiError> {
    policy::authorize(&auth_user.actor(), Action::Moderate, None)?;
    let id = parse_memorial_id(&id)?;

    state
        .repo
        .update_memorial(id, &payload)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Memorial not found"))
}

/// admin_delete_memorial
///
/// [Admin Route] Force delete, with the same best-effort photo file cleanup
/// as the owner path.
#[utoipa::path(
    delete,
    path = "/api/admin/memorials/{id}",
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn admin_delete_memorial(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    policy::authorize(&auth_user.actor(), Action::Moderate, None)?;
    let id = parse_memorial_id(&id)?;
    let memorial = load_memorial(&state, id).await?;

    for photo in &memorial.photos {
        if let Err(e) = state.storage.remove(&photo.url).await {
            tracing::warn!("failed to remove photo file {}: {}", photo.url, e);
        }
    }

    if state.repo.delete_memorial(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Memorial not found"))
    }
}

/// approve_memorial
///
/// [Admin Route] One-way, idempotent approval. There is no unapprove: hiding
/// an already-approved memorial is what the toggle endpoint is for.
#[utoipa::path(
    put,
    path = "/api/admin/memorials/{id}/approve",
    responses(
        (status = 200, description = "Approved", body = Memorial),
        (status = 404, description = "Not Found")
    )
)]
pub async fn approve_memorial(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Memorial>, ApiError> {
    policy::authorize(&auth_user.actor(), Action::Moderate, None)?;
    let id = parse_memorial_id(&id)?;

    state
        .repo
        .approve_memorial(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Memorial not found"))
}
