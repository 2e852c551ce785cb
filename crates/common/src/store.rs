use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::models::CredentialPair;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("token storage io: {0}")]
    Io(#[from] io::Error),
    #[error("token storage format: {0}")]
    Format(#[from] serde_json::Error),
}

/// Durable credential storage. Presence/absence of the pair is the only
/// state that survives a restart; both the session store and the gateway's
/// 401 interceptor wipe it.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<CredentialPair>, StoreError>;
    fn save(&self, creds: &CredentialPair) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

// On-disk layout is fixed: exactly two string values keyed `token` and
// `refresh`.
#[derive(Serialize, Deserialize)]
struct StoredTokens {
    token: String,
    refresh: String,
}

pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<CredentialPair>, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let stored: StoredTokens = serde_json::from_slice(&raw)?;
        Ok(Some(CredentialPair {
            access: stored.token,
            refresh: stored.refresh,
        }))
    }

    fn save(&self, creds: &CredentialPair) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let stored = StoredTokens {
            token: creds.access.clone(),
            refresh: creds.refresh.clone(),
        };
        // Write-then-rename so a crash never leaves half a token file.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&stored)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Default)]
pub struct MemoryTokenStore {
    creds: Mutex<Option<CredentialPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<CredentialPair>, StoreError> {
        Ok(self.creds.lock().unwrap().clone())
    }

    fn save(&self, creds: &CredentialPair) -> Result<(), StoreError> {
        *self.creds.lock().unwrap() = Some(creds.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.creds.lock().unwrap() = None;
        Ok(())
    }
}
