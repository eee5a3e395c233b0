#![allow(dead_code)]

//! Shared test harness: an in-memory repository double, a mock blob store and
//! helpers for driving the assembled router without a live database.

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use chrono::Utc;
use memorial_api::{
    AppState,
    auth::{self, AUTH_HEADER},
    config::AppConfig,
    create_router,
    models::{
        CreateMemorialRequest, Memorial, Memory, Photo, UpdateMemorialRequest, User, Video,
    },
    repository::Repository,
    storage::MockStorageService,
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// InMemoryRepository
///
/// Implements the full persistence contract over two mutex-guarded vectors.
/// Every mutation clones in and out, mirroring the by-value rows the real
/// store returns.
#[derive(Default)]
pub struct InMemoryRepository {
    pub users: Mutex<Vec<User>>,
    pub memorials: Mutex<Vec<Memorial>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn update_where<F>(&self, id: Uuid, mutate: F) -> Option<Memorial>
    where
        F: FnOnce(&mut Memorial),
    {
        let mut memorials = self.memorials.lock().unwrap();
        let memorial = memorials.iter_mut().find(|m| m.id == id)?;
        mutate(memorial);
        memorial.updated_at = Utc::now();
        Some(memorial.clone())
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<User, sqlx::Error> {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            is_admin,
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, sqlx::Error> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }

    async fn list_public_memorials(&self) -> Result<Vec<Memorial>, sqlx::Error> {
        let mut listed: Vec<Memorial> = self
            .memorials
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.is_publicly_listed())
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    async fn list_all_memorials(&self) -> Result<Vec<Memorial>, sqlx::Error> {
        let mut all = self.memorials.lock().unwrap().clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn list_memorials_by_owner(&self, user_id: Uuid) -> Result<Vec<Memorial>, sqlx::Error> {
        Ok(self
            .memorials
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.created_by == user_id)
            .cloned()
            .collect())
    }

    async fn get_memorial(&self, id: Uuid) -> Result<Option<Memorial>, sqlx::Error> {
        Ok(self
            .memorials
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn create_memorial(
        &self,
        req: &CreateMemorialRequest,
        created_by: Uuid,
        is_approved: bool,
    ) -> Result<Memorial, sqlx::Error> {
        let now = Utc::now();
        let memorial = Memorial {
            id: Uuid::new_v4(),
            name: req.name.clone(),
            biography: req.biography.clone(),
            birth_date: req.birth_date,
            death_date: req.death_date,
            created_by,
            is_public: true,
            is_approved,
            created_at: now,
            updated_at: now,
            ..Default::default()
        };
        self.memorials.lock().unwrap().push(memorial.clone());
        Ok(memorial)
    }

    async fn set_qr_code(&self, id: Uuid, qr_code: &str) -> Result<Option<Memorial>, sqlx::Error> {
        Ok(self.update_where(id, |m| m.qr_code = Some(qr_code.to_string())))
    }

    async fn update_memorial(
        &self,
        id: Uuid,
        req: &UpdateMemorialRequest,
    ) -> Result<Option<Memorial>, sqlx::Error> {
        Ok(self.update_where(id, |m| {
            if let Some(name) = &req.name {
                m.name = name.clone();
            }
            if let Some(biography) = &req.biography {
                m.biography = biography.clone();
            }
            if let Some(birth_date) = req.birth_date {
                m.birth_date = birth_date;
            }
            if let Some(death_date) = req.death_date {
                m.death_date = death_date;
            }
        }))
    }

    async fn delete_memorial(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut memorials = self.memorials.lock().unwrap();
        let before = memorials.len();
        memorials.retain(|m| m.id != id);
        Ok(memorials.len() < before)
    }

    async fn replace_photos(
        &self,
        id: Uuid,
        photos: &[Photo],
    ) -> Result<Option<Memorial>, sqlx::Error> {
        Ok(self.update_where(id, |m| m.photos = photos.to_vec()))
    }

    async fn replace_videos(
        &self,
        id: Uuid,
        videos: &[Video],
    ) -> Result<Option<Memorial>, sqlx::Error> {
        Ok(self.update_where(id, |m| m.videos = videos.to_vec()))
    }

    async fn replace_memories(
        &self,
        id: Uuid,
        memories: &[Memory],
    ) -> Result<Option<Memorial>, sqlx::Error> {
        Ok(self.update_where(id, |m| m.memories = memories.to_vec()))
    }

    async fn approve_memorial(&self, id: Uuid) -> Result<Option<Memorial>, sqlx::Error> {
        Ok(self.update_where(id, |m| m.is_approved = true))
    }

    async fn toggle_hidden(&self, id: Uuid) -> Result<Option<Memorial>, sqlx::Error> {
        Ok(self.update_where(id, |m| m.is_hidden = !m.is_hidden))
    }
}

// --- Harness assembly ---

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<InMemoryRepository>,
    pub storage: Arc<MockStorageService>,
    pub config: AppConfig,
}

pub fn spawn_test_app() -> TestApp {
    let repo = Arc::new(InMemoryRepository::new());
    let storage = Arc::new(MockStorageService::new());
    let config = AppConfig::default();

    let state = AppState {
        repo: repo.clone(),
        storage: storage.clone(),
        config: config.clone(),
    };

    TestApp {
        router: create_router(state),
        repo,
        storage,
        config,
    }
}

impl TestApp {
    /// Seeds a user directly into the repository and returns it together with
    /// a freshly signed token.
    pub async fn seed_user(&self, email: &str, password: &str, is_admin: bool) -> (User, String) {
        let hash = auth::hash_password(password).unwrap();
        let user = self
            .repo
            .create_user("Test User", email, &hash, is_admin)
            .await
            .unwrap();
        let token = auth::issue_token(&user, &self.config.jwt_secret).unwrap();
        (user, token)
    }

    /// Seeds a memorial owned by `created_by` in the given moderation state.
    pub async fn seed_memorial(
        &self,
        created_by: Uuid,
        is_approved: bool,
        is_hidden: bool,
    ) -> Memorial {
        let req = CreateMemorialRequest {
            name: "In Memoriam".to_string(),
            biography: "A life well lived".to_string(),
            birth_date: Utc::now(),
            death_date: Utc::now(),
        };
        let memorial = self
            .repo
            .create_memorial(&req, created_by, is_approved)
            .await
            .unwrap();
        if is_hidden {
            self.repo.toggle_hidden(memorial.id).await.unwrap().unwrap()
        } else {
            memorial
        }
    }
}

// --- Request builders ---

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn get_authed(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(AUTH_HEADER, token)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn json_request_authed(
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(AUTH_HEADER, token)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTH_HEADER, token)
        .body(Body::empty())
        .unwrap()
}

/// Builds a multipart/form-data body containing one file part and, optionally,
/// a `caption` text part.
pub fn multipart_upload(
    uri: &str,
    token: &str,
    field: &str,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
    caption: Option<&str>,
) -> Request<Body> {
    const BOUNDARY: &str = "----test-boundary-7MA4YWxkTrZu0gW";

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");

    if let Some(caption) = caption {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"caption\"\r\n\r\n");
        body.extend_from_slice(caption.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(AUTH_HEADER, token)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Reads the full response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
