use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// The canonical identity record stored in the `users` table. The bcrypt hash
/// never leaves the server: it is skipped during serialization and therefore
/// also absent from the generated API schema.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    // The RBAC flag. False for every self-registered account.
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Photo
///
/// Embedded sub-document of a memorial, persisted inside the `photos` JSONB
/// column. `url` is the public static path under `/uploads`. At most one photo
/// per memorial carries `is_main = true`; the mutation methods on [`Memorial`]
/// are the only writers of that flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: Uuid,
    pub url: String,
    pub is_main: bool,
    pub uploaded_at: DateTime<Utc>,
}

/// Video
///
/// Embedded sub-document, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: Uuid,
    pub url: String,
    pub caption: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// Memory
///
/// A visitor-submitted remembrance. `author` is a free display string captured
/// at submission time, not a reference to a user account; anonymous visitors
/// may sign memories however they wish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: Uuid,
    pub content: String,
    pub author: String,
    pub date: DateTime<Utc>,
}

/// Memorial
///
/// The central entity. Photos, videos and memories are embedded JSONB
/// collections on the row itself, so every sub-resource mutation lands as one
/// atomic row write, the store-level guarantee the main-photo invariant
/// relies on.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
pub struct Memorial {
    pub id: Uuid,
    pub name: String,
    pub biography: String,
    pub birth_date: DateTime<Utc>,
    pub death_date: DateTime<Utc>,
    // Owner reference. Immutable after creation; intentionally not a foreign
    // key, so deleting the owning account leaves the memorial in place.
    pub created_by: Uuid,
    #[sqlx(json)]
    pub photos: Vec<Photo>,
    #[sqlx(json)]
    pub videos: Vec<Video>,
    #[sqlx(json)]
    pub memories: Vec<Memory>,
    pub is_public: bool,
    // Moderation flags. A memorial appears in the public listing iff
    // `is_approved && !is_hidden`.
    pub is_approved: bool,
    pub is_hidden: bool,
    // Data URI of the deep-link QR code, attached in a follow-up write after
    // creation. `None` is the valid "pending QR" state.
    pub qr_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Memorial {
    /// Whether this memorial is eligible for the anonymous public listing.
    pub fn is_publicly_listed(&self) -> bool {
        self.is_approved && !self.is_hidden
    }

    /// Appends a photo. The first photo of a memorial is automatically the
    /// main one; later photos come in unmarked.
    pub fn add_photo(&mut self, url: String) -> &Photo {
        let photo = Photo {
            id: Uuid::new_v4(),
            url,
            is_main: self.photos.is_empty(),
            uploaded_at: Utc::now(),
        };
        self.photos.push(photo);
        self.photos.last().expect("photo was just pushed")
    }

    /// Marks exactly one photo as main, unsetting every other. Returns false
    /// when the id does not belong to this memorial, leaving the collection
    /// untouched.
    pub fn set_main_photo(&mut self, photo_id: Uuid) -> bool {
        if !self.photos.iter().any(|p| p.id == photo_id) {
            return false;
        }
        for photo in &mut self.photos {
            photo.is_main = photo.id == photo_id;
        }
        true
    }

    /// Removes a photo by id and returns it so the caller can clean up the
    /// backing file. If the removed photo was main and photos remain, the
    /// first remaining photo (in current embedded order) is promoted.
    pub fn remove_photo(&mut self, photo_id: Uuid) -> Option<Photo> {
        let idx = self.photos.iter().position(|p| p.id == photo_id)?;
        let removed = self.photos.remove(idx);
        if removed.is_main {
            if let Some(first) = self.photos.first_mut() {
                first.is_main = true;
            }
        }
        Some(removed)
    }

    /// Prepends a video (newest first).
    pub fn add_video(&mut self, url: String, caption: Option<String>) -> &Video {
        let video = Video {
            id: Uuid::new_v4(),
            url,
            caption,
            uploaded_at: Utc::now(),
        };
        self.videos.insert(0, video);
        self.videos.first().expect("video was just inserted")
    }

    /// Prepends a visitor memory (newest first). The author string is stored
    /// as given: trust-on-write.
    pub fn add_memory(&mut self, content: String, author: String) -> &Memory {
        let memory = Memory {
            id: Uuid::new_v4(),
            content,
            author,
            date: Utc::now(),
        };
        self.memories.insert(0, memory);
        self.memories.first().expect("memory was just inserted")
    }
}

// --- Request Payloads (Input Schemas) ---

/// RegisterRequest
///
/// Input payload for POST /api/auth/register. The raw password is hashed with
/// bcrypt before it reaches the repository and is never logged.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// LoginRequest
///
/// Input payload for POST /api/auth/login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// AuthResponse
///
/// Output of both register and login: the signed token plus the public view
/// of the user record.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// CreateMemorialRequest
///
/// Input payload for submitting a new memorial (POST /api/memorials).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemorialRequest {
    pub name: String,
    pub biography: String,
    pub birth_date: DateTime<Utc>,
    pub death_date: DateTime<Utc>,
}

/// UpdateMemorialRequest
///
/// Partial update payload (PUT /api/memorials/{id}). Only the biographical
/// fields are mutable through this path; visibility flags, ownership and
/// embedded collections have their own dedicated operations.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemorialRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub death_date: Option<DateTime<Utc>>,
}

/// CreateMemoryRequest
///
/// Input payload for the public memory submission endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemoryRequest {
    pub content: String,
    pub author: String,
}

/// AdminCreateUserRequest
///
/// Input payload for POST /api/admin/users. Only admins reach this path, so
/// the `is_admin` flag may be set here (self-registration never can).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminCreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// AdminCreateMemorialRequest
///
/// Input payload for POST /api/admin/memorials. Admin-created memorials carry
/// an explicit owner reference and come out pre-approved.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct AdminCreateMemorialRequest {
    pub name: String,
    pub biography: String,
    pub birth_date: DateTime<Utc>,
    pub death_date: DateTime<Utc>,
    pub created_by: Uuid,
}
