//! Cart persistence port

use std::fs;
use std::path::{Path, PathBuf};

use super::CartItem;
use crate::error::ClientResult;

/// Snapshot name, shared with the storefront's local storage key
pub const CART_STORAGE_KEY: &str = "valentine_cart";

/// Where the cart snapshot lives
///
/// `load` returns `Ok(None)` when nothing was saved and `Err` when a snapshot
/// exists but cannot be decoded.
pub trait CartStore {
    fn load(&mut self) -> ClientResult<Option<Vec<CartItem>>>;
    fn save(&mut self, items: &[CartItem]) -> ClientResult<()>;
    fn clear(&mut self) -> ClientResult<()>;
}

/// In-memory store holding the raw JSON snapshot
#[derive(Debug, Default, Clone)]
pub struct MemoryCartStore {
    snapshot: Option<String>,
}

impl MemoryCartStore {
    /// Start from an arbitrary raw snapshot
    pub fn with_snapshot(raw: impl Into<String>) -> Self {
        Self {
            snapshot: Some(raw.into()),
        }
    }

    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }
}

impl CartStore for MemoryCartStore {
    fn load(&mut self) -> ClientResult<Option<Vec<CartItem>>> {
        match &self.snapshot {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, items: &[CartItem]) -> ClientResult<()> {
        self.snapshot = Some(serde_json::to_string(items)?);
        Ok(())
    }

    fn clear(&mut self) -> ClientResult<()> {
        self.snapshot = None;
        Ok(())
    }
}

/// JSON snapshot file `{dir}/valentine_cart.json`
#[derive(Debug, Clone)]
pub struct FileCartStore {
    path: PathBuf,
}

impl FileCartStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(format!("{CART_STORAGE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl CartStore for FileCartStore {
    fn load(&mut self) -> ClientResult<Option<Vec<CartItem>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn save(&mut self, items: &[CartItem]) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(items)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn clear(&mut self) -> ClientResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
