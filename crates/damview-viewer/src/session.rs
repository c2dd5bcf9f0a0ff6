//! Token persistence
//!
//! The token payload is persisted under an application-scoped key (the app id)
//! and read once at startup to seed the auth state.

use async_trait::async_trait;
use damview_core::models::TokenData;
use damview_core::{AppError, AppResult};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persisted payload, if any.
    async fn load(&self) -> AppResult<Option<TokenData>>;

    async fn save(&self, token: &TokenData) -> AppResult<()>;

    /// Remove the persisted payload. Clearing an empty store is not an error.
    async fn clear(&self) -> AppResult<()>;
}

/// JSON file `<dir>/<app_id>.json`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl AsRef<Path>, app_id: &str) -> AppResult<Self> {
        let key: String = app_id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if key.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "Invalid app id for token storage: {:?}",
                app_id
            )));
        }
        Ok(Self {
            path: dir.as_ref().join(format!("{}.json", key)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> AppResult<Option<TokenData>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, token: &TokenData) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_vec_pretty(token)?;
        tokio::fs::write(&self.path, body).await?;
        tracing::debug!(path = %self.path.display(), "Token persisted");
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, for tests and for sessions that should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<TokenData>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: TokenData) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }

    pub fn current(&self) -> Option<TokenData> {
        self.token.lock().map(|t| t.clone()).unwrap_or(None)
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> AppResult<Option<TokenData>> {
        Ok(self.current())
    }

    async fn save(&self, token: &TokenData) -> AppResult<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| AppError::Internal("Token store lock poisoned".to_string()))?;
        *guard = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| AppError::Internal("Token store lock poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}
