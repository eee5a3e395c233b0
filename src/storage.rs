use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Public URL prefix under which stored files are served back as static content.
pub const PUBLIC_PREFIX: &str = "/uploads";

// 1. StorageService Contract
/// StorageService
///
/// Defines the abstract contract for the uploaded-media blob store. The
/// concrete implementation is a plain directory on local disk
/// (LocalDiskStorage) served statically; tests swap in the in-memory Mock
/// (MockStorageService) without affecting the calling handlers.
///
/// Files are addressed by their public path (e.g.
/// `/uploads/memorials/1712000000000-portrait.jpg`), which is also what gets
/// persisted on the memorial record.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Ensures the upload directory exists. Called once at startup; safe to
    /// call repeatedly.
    async fn ensure_upload_dir(&self);

    /// Persists the bytes under `subdir` with a unique, timestamp-prefixed
    /// filename derived from the sanitized original name. Returns the public
    /// path the file is reachable at.
    async fn store(&self, subdir: &str, original_name: &str, bytes: &[u8])
    -> Result<String, String>;

    /// Removes the file behind a public path. A file that is already gone is
    /// not an error: deletion is best-effort cleanup, and the record mutation
    /// it accompanies proceeds regardless.
    async fn remove(&self, public_path: &str) -> Result<(), String>;
}

/// StorageState
///
/// The concrete type used to share the storage service across the application state.
pub type StorageState = Arc<dyn StorageService>;

/// sanitize_filename
///
/// Reduces a client-supplied filename to a single safe path component:
/// directory separators and traversal sequences are stripped, anything
/// outside a conservative character set becomes '_'. An empty result falls
/// back to "file" so the timestamp prefix always has something to attach to.
pub fn sanitize_filename(name: &str) -> String {
    let last_segment = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim_matches('.');

    let cleaned: String = last_segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

// 2. The Real Implementation (Local Disk)
/// LocalDiskStorage
///
/// Stores uploads under a root directory on the server's filesystem. The same
/// directory is mounted read-only on the router as the `/uploads` static
/// route, so the public path returned by `store` resolves immediately.
pub struct LocalDiskStorage {
    root: PathBuf,
}

impl LocalDiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves a public path back to its on-disk location, re-sanitizing
    /// every segment so a crafted path can never escape the upload root.
    fn disk_path(&self, public_path: &str) -> PathBuf {
        let relative = public_path
            .strip_prefix(PUBLIC_PREFIX)
            .unwrap_or(public_path);

        let mut path = self.root.clone();
        for segment in relative.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                continue;
            }
            path.push(sanitize_filename(segment));
        }
        path
    }
}

#[async_trait]
impl StorageService for LocalDiskStorage {
    async fn ensure_upload_dir(&self) {
        if let Err(e) = tokio::fs::create_dir_all(&self.root).await {
            tracing::error!("failed to create upload directory {:?}: {}", self.root, e);
        }
    }

    async fn store(
        &self,
        subdir: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, String> {
        let filename = format!(
            "{}-{}",
            chrono::Utc::now().timestamp_millis(),
            sanitize_filename(original_name)
        );
        let subdir = sanitize_filename(subdir);

        let dir = self.root.join(&subdir);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| e.to_string())?;

        tokio::fs::write(dir.join(&filename), bytes)
            .await
            .map_err(|e| e.to_string())?;

        Ok(format!("{}/{}/{}", PUBLIC_PREFIX, subdir, filename))
    }

    async fn remove(&self, public_path: &str) -> Result<(), String> {
        let path = self.disk_path(public_path);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Already gone: treated as success per the best-effort contract.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.to_string()),
        }
    }
}

// 3. The Mock Implementation (For Unit Tests)
/// MockStorageService
///
/// An in-memory implementation used exclusively by tests. It fabricates
/// deterministic-looking public paths without touching the filesystem and
/// records every removal so tests can assert on cascade cleanup.
#[derive(Default)]
pub struct MockStorageService {
    /// When true, all operations return a simulated failure.
    pub should_fail: bool,
    /// Public paths passed to `remove`, in call order.
    pub removed: Mutex<Vec<String>>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            removed: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_upload_dir(&self) {
        // No-op in mock environment.
    }

    async fn store(
        &self,
        subdir: &str,
        original_name: &str,
        _bytes: &[u8],
    ) -> Result<String, String> {
        if self.should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }
        Ok(format!(
            "{}/{}/{}-{}",
            PUBLIC_PREFIX,
            sanitize_filename(subdir),
            chrono::Utc::now().timestamp_millis(),
            sanitize_filename(original_name)
        ))
    }

    async fn remove(&self, public_path: &str) -> Result<(), String> {
        if self.should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }
        self.removed
            .lock()
            .expect("mock removal log poisoned")
            .push(public_path.to_string());
        Ok(())
    }
}
