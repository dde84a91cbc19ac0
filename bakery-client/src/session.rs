//! Admin session token
//!
//! 令牌只保存为纯字符串; 任何 401/403 响应都会清除它 (见 [`crate::HttpClient`])。

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::ClientResult;

/// Token file name, shared with the dashboard's local storage key
pub const TOKEN_STORAGE_KEY: &str = "adminToken";

/// Persistence port for the session token
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> ClientResult<()>;
    fn clear(&self) -> ClientResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    fn save(&self, token: &str) -> ClientResult<()> {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.to_string());
        }
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
        Ok(())
    }
}

/// Plain-text token file `{dir}/adminToken`
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(TOKEN_STORAGE_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let token = fs::read_to_string(&self.path).ok()?;
        let token = token.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    fn save(&self, token: &str) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Session container: cached token backed by a [`TokenStore`]
#[derive(Debug)]
pub struct Session<S: TokenStore> {
    store: S,
    token: RwLock<Option<String>>,
}

impl<S: TokenStore> Session<S> {
    /// Restore a previously saved token, if any
    pub fn restore(store: S) -> Self {
        let token = store.load();
        Self {
            store,
            token: RwLock::new(token),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn sign_in(&self, token: &str) -> ClientResult<()> {
        self.store.save(token)?;
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.to_string());
        }
        Ok(())
    }

    /// Drop the token locally and in the store
    pub fn sign_out(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to remove stored session token");
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_and_out() {
        let session = Session::restore(MemoryTokenStore::default());
        assert!(!session.is_authenticated());

        session.sign_in("abc").unwrap();
        assert_eq!(session.token().as_deref(), Some("abc"));
        assert_eq!(session.store().load().as_deref(), Some("abc"));

        session.sign_out();
        assert!(!session.is_authenticated());
        assert!(session.store().load().is_none());
    }

    #[test]
    fn test_restore_reads_store() {
        let store = MemoryTokenStore::default();
        store.save("saved").unwrap();
        let session = Session::restore(store);
        assert_eq!(session.token().as_deref(), Some("saved"));
    }
}
