use crate::models::{CreateMemorialRequest, Memorial, Memory, Photo, UpdateMemorialRequest, User, Video};
use async_trait::async_trait;
use sqlx::{PgPool, types::Json};
use std::sync::Arc;
use uuid::Uuid;

/// Shared column list so every memorial query decodes into the same shape.
const MEMORIAL_COLUMNS: &str = "id, name, biography, birth_date, death_date, created_by, \
     photos, videos, memories, is_public, is_approved, is_hidden, qr_code, \
     created_at, updated_at";

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations, allowing the
/// handlers to interact with the data layer without knowing the specific
/// implementation (Postgres in production, an in-memory double in tests).
///
/// The embedded photo/video/memory collections are replaced wholesale by the
/// `replace_*` methods: the handler loads the document, applies the mutation
/// in Rust (where the main-photo invariant lives), and writes the collection
/// back as one atomic row update. Concurrent writers to the *same* memorial
/// can therefore lose updates to each other, but no interleaving can produce
/// a torn collection, since each write is a single row write.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<User, sqlx::Error>;
    async fn list_users(&self) -> Result<Vec<User>, sqlx::Error>;
    // Irreversible; memorials created by the user are left in place.
    async fn delete_user(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    // --- Memorial retrieval ---
    // Public listing: approved and not hidden, newest first.
    async fn list_public_memorials(&self) -> Result<Vec<Memorial>, sqlx::Error>;
    // Admin access: every memorial regardless of moderation state.
    async fn list_all_memorials(&self) -> Result<Vec<Memorial>, sqlx::Error>;
    // Owner listing: visibility-unfiltered.
    async fn list_memorials_by_owner(&self, user_id: Uuid) -> Result<Vec<Memorial>, sqlx::Error>;
    // Single record, no visibility filter (the detail view is deliberately unfiltered).
    async fn get_memorial(&self, id: Uuid) -> Result<Option<Memorial>, sqlx::Error>;

    // --- Memorial lifecycle ---
    async fn create_memorial(
        &self,
        req: &CreateMemorialRequest,
        created_by: Uuid,
        is_approved: bool,
    ) -> Result<Memorial, sqlx::Error>;
    // Second phase of creation: attaches the QR payload once the id is known.
    async fn set_qr_code(&self, id: Uuid, qr_code: &str) -> Result<Option<Memorial>, sqlx::Error>;
    // Partial update of the biographical fields only; bumps updated_at.
    async fn update_memorial(
        &self,
        id: Uuid,
        req: &UpdateMemorialRequest,
    ) -> Result<Option<Memorial>, sqlx::Error>;
    async fn delete_memorial(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    // --- Embedded collections (single atomic row writes) ---
    async fn replace_photos(
        &self,
        id: Uuid,
        photos: &[Photo],
    ) -> Result<Option<Memorial>, sqlx::Error>;
    async fn replace_videos(
        &self,
        id: Uuid,
        videos: &[Video],
    ) -> Result<Option<Memorial>, sqlx::Error>;
    async fn replace_memories(
        &self,
        id: Uuid,
        memories: &[Memory],
    ) -> Result<Option<Memorial>, sqlx::Error>;

    // --- Moderation ---
    // Idempotent: approving an approved memorial is a no-op.
    async fn approve_memorial(&self, id: Uuid) -> Result<Option<Memorial>, sqlx::Error>;
    // Atomic flip; calling twice restores the original state by design.
    async fn toggle_hidden(&self, id: Uuid) -> Result<Option<Memorial>, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
/// Memorials are stored one-row-per-document with the embedded collections in
/// JSONB columns, preserving single-document write atomicity.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, is_admin, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, is_admin, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash, is_admin, created_at) \
             VALUES ($1, $2, $3, $4, $5, NOW()) \
             RETURNING id, name, email, password_hash, is_admin, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(is_admin)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_users(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, is_admin, created_at FROM users \
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Strictly enforces the listing invariant in the base query: only
    /// approved, unhidden memorials ever leave this method.
    async fn list_public_memorials(&self) -> Result<Vec<Memorial>, sqlx::Error> {
        sqlx::query_as::<_, Memorial>(&format!(
            "SELECT {MEMORIAL_COLUMNS} FROM memorials \
             WHERE is_approved = true AND is_hidden = false \
             ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn list_all_memorials(&self) -> Result<Vec<Memorial>, sqlx::Error> {
        sqlx::query_as::<_, Memorial>(&format!(
            "SELECT {MEMORIAL_COLUMNS} FROM memorials ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn list_memorials_by_owner(&self, user_id: Uuid) -> Result<Vec<Memorial>, sqlx::Error> {
        sqlx::query_as::<_, Memorial>(&format!(
            "SELECT {MEMORIAL_COLUMNS} FROM memorials WHERE created_by = $1 \
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_memorial(&self, id: Uuid) -> Result<Option<Memorial>, sqlx::Error> {
        sqlx::query_as::<_, Memorial>(&format!(
            "SELECT {MEMORIAL_COLUMNS} FROM memorials WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_memorial(
        &self,
        req: &CreateMemorialRequest,
        created_by: Uuid,
        is_approved: bool,
    ) -> Result<Memorial, sqlx::Error> {
        sqlx::query_as::<_, Memorial>(&format!(
            "INSERT INTO memorials \
             (id, name, biography, birth_date, death_date, created_by, \
              photos, videos, memories, is_public, is_approved, is_hidden, \
              created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, '[]'::jsonb, '[]'::jsonb, '[]'::jsonb, \
                     true, $7, false, NOW(), NOW()) \
             RETURNING {MEMORIAL_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&req.name)
        .bind(&req.biography)
        .bind(req.birth_date)
        .bind(req.death_date)
        .bind(created_by)
        .bind(is_approved)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_qr_code(&self, id: Uuid, qr_code: &str) -> Result<Option<Memorial>, sqlx::Error> {
        sqlx::query_as::<_, Memorial>(&format!(
            "UPDATE memorials SET qr_code = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {MEMORIAL_COLUMNS}"
        ))
        .bind(id)
        .bind(qr_code)
        .fetch_optional(&self.pool)
        .await
    }

    /// Uses COALESCE so only the fields present in the request change.
    async fn update_memorial(
        &self,
        id: Uuid,
        req: &UpdateMemorialRequest,
    ) -> Result<Option<Memorial>, sqlx::Error> {
        sqlx::query_as::<_, Memorial>(&format!(
            "UPDATE memorials SET \
                name = COALESCE($2, name), \
                biography = COALESCE($3, biography), \
                birth_date = COALESCE($4, birth_date), \
                death_date = COALESCE($5, death_date), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {MEMORIAL_COLUMNS}"
        ))
        .bind(id)
        .bind(&req.name)
        .bind(&req.biography)
        .bind(req.birth_date)
        .bind(req.death_date)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_memorial(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM memorials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn replace_photos(
        &self,
        id: Uuid,
        photos: &[Photo],
    ) -> Result<Option<Memorial>, sqlx::Error> {
        sqlx::query_as::<_, Memorial>(&format!(
            "UPDATE memorials SET photos = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {MEMORIAL_COLUMNS}"
        ))
        .bind(id)
        .bind(Json(photos))
        .fetch_optional(&self.pool)
        .await
    }

    async fn replace_videos(
        &self,
        id: Uuid,
        videos: &[Video],
    ) -> Result<Option<Memorial>, sqlx::Error> {
        sqlx::query_as::<_, Memorial>(&format!(
            "UPDATE memorials SET videos = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {MEMORIAL_COLUMNS}"
        ))
        .bind(id)
        .bind(Json(videos))
        .fetch_optional(&self.pool)
        .await
    }

    async fn replace_memories(
        &self,
        id: Uuid,
        memories: &[Memory],
    ) -> Result<Option<Memorial>, sqlx::Error> {
        sqlx::query_as::<_, Memorial>(&format!(
            "UPDATE memorials SET memories = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {MEMORIAL_COLUMNS}"
        ))
        .bind(id)
        .bind(Json(memories))
        .fetch_optional(&self.pool)
        .await
    }

    async fn approve_memorial(&self, id: Uuid) -> Result<Option<Memorial>, sqlx::Error> {
        sqlx::query_as::<_, Memorial>(&format!(
            "UPDATE memorials SET is_approved = true, updated_at = NOW() WHERE id = $1 \
             RETURNING {MEMORIAL_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// The flip happens inside the single UPDATE, so two concurrent toggles
    /// serialize at the row level instead of racing a read-modify-write.
    async fn toggle_hidden(&self, id: Uuid) -> Result<Option<Memorial>, sqlx::Error> {
        sqlx::query_as::<_, Memorial>(&format!(
            "UPDATE memorials SET is_hidden = NOT is_hidden, updated_at = NOW() WHERE id = $1 \
             RETURNING {MEMORIAL_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}
