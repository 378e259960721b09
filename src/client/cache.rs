//! # Session Cache
//!
//! On-device record of the last committed identity, consulted once at startup
//! to resolve the session without a network round trip.
//!
//! The store treats every cache failure as "nothing cached": a corrupt or
//! unreadable file yields an anonymous session, never an error.
//!
//! ## File format
//!
//! ```json
//! { "identity": { "id": "...", "name": "...", "email": "...", "role": "teacher", "avatar": null },
//!   "saved_at": "2026-10-19T08:30:00Z" }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::Identity;

/// Cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("session cache I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session cache is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// What the cache remembers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedSession {
    pub identity: Identity,
    pub saved_at: DateTime<Utc>,
}

impl CachedSession {
    pub fn new(identity: Identity) -> Self {
        Self { identity, saved_at: Utc::now() }
    }

    /// Whether the entry may still be trusted at `now`
    pub fn is_fresh(&self, max_age: Option<Duration>, now: DateTime<Utc>) -> bool {
        match max_age {
            Some(max_age) => now.signed_duration_since(self.saved_at) <= max_age,
            None => true,
        }
    }
}

/// Persistent home of the committed identity
pub trait SessionCache: Send + Sync {
    fn load(&self) -> Result<Option<CachedSession>, CacheError>;

    fn save(&self, identity: &Identity) -> Result<(), CacheError>;

    fn clear(&self) -> Result<(), CacheError>;
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct FileSessionCache {
    path: PathBuf,
}

impl FileSessionCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionCache for FileSessionCache {
    fn load(&self) -> Result<Option<CachedSession>, CacheError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, identity: &Identity) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&CachedSession::new(identity.clone()))?;
        // Write-then-rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Cache that lives as long as the process
#[derive(Debug, Default)]
pub struct MemorySessionCache {
    entry: Mutex<Option<CachedSession>>,
}

impl MemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated cache, e.g. to simulate a previous run
    pub fn with_entry(entry: CachedSession) -> Self {
        Self { entry: Mutex::new(Some(entry)) }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<CachedSession>> {
        self.entry.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SessionCache for MemorySessionCache {
    fn load(&self) -> Result<Option<CachedSession>, CacheError> {
        Ok(self.lock().clone())
    }

    fn save(&self, identity: &Identity) -> Result<(), CacheError> {
        *self.lock() = Some(CachedSession::new(identity.clone()));
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        *self.lock() = None;
        Ok(())
    }
}

/// Remembers nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSessionCache;

impl SessionCache for NoSessionCache {
    fn load(&self) -> Result<Option<CachedSession>, CacheError> {
        Ok(None)
    }

    fn save(&self, _identity: &Identity) -> Result<(), CacheError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
