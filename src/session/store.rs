//! Persistent storage for the session token.
//!
//! Exactly one key holds the token. Only [`super::SessionManager`] writes or
//! clears it.

use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::config::ConsoleConfig;

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("token storage unavailable: {0}")]
    Unavailable(String),
}

pub type TokenStoreResult<T> = Result<T, TokenStoreError>;

pub trait TokenStore: Send + Sync {
    fn load(&self) -> TokenStoreResult<Option<String>>;
    fn save(&self, token: &str) -> TokenStoreResult<()>;
    fn clear(&self) -> TokenStoreResult<()>;
}

/// Process-local storage; survives nothing. Used by tests and as the
/// fallback when no platform storage exists.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> TokenStoreResult<std::sync::MutexGuard<'_, Option<String>>> {
        self.token
            .lock()
            .map_err(|_| TokenStoreError::Unavailable("token lock poisoned".to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> TokenStoreResult<Option<String>> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, token: &str) -> TokenStoreResult<()> {
        *self.slot()? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> TokenStoreResult<()> {
        *self.slot()? = None;
        Ok(())
    }
}

#[cfg(feature = "server")]
pub use file::FileTokenStore;

#[cfg(feature = "server")]
mod file {
    use super::{TokenStore, TokenStoreResult};
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    /// One small file holding the token (native builds).
    #[derive(Debug, Clone)]
    pub struct FileTokenStore {
        path: PathBuf,
    }

    impl FileTokenStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// `<config dir>/<key>.token`
        pub fn in_config_dir(key: &str) -> Self {
            Self::new(crate::config::get_config_dir().join(format!("{}.token", key)))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl TokenStore for FileTokenStore {
        fn load(&self) -> TokenStoreResult<Option<String>> {
            match std::fs::read_to_string(&self.path) {
                Ok(contents) => {
                    let token = contents.trim();
                    Ok((!token.is_empty()).then(|| token.to_string()))
                }
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn save(&self, token: &str) -> TokenStoreResult<()> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&self.path, token)?;
            Ok(())
        }

        fn clear(&self) -> TokenStoreResult<()> {
            match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::LocalStorageTokenStore;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{TokenStore, TokenStoreError, TokenStoreResult};

    /// `window.localStorage` under a single key.
    #[derive(Debug, Clone)]
    pub struct LocalStorageTokenStore {
        key: String,
    }

    impl LocalStorageTokenStore {
        pub fn new(key: impl Into<String>) -> Self {
            Self { key: key.into() }
        }

        fn storage(&self) -> TokenStoreResult<web_sys::Storage> {
            web_sys::window()
                .and_then(|window| window.local_storage().ok().flatten())
                .ok_or_else(|| TokenStoreError::Unavailable("localStorage".to_string()))
        }
    }

    impl TokenStore for LocalStorageTokenStore {
        fn load(&self) -> TokenStoreResult<Option<String>> {
            self.storage()?
                .get_item(&self.key)
                .map(|token| token.filter(|t| !t.is_empty()))
                .map_err(|_| TokenStoreError::Unavailable("localStorage read".to_string()))
        }

        fn save(&self, token: &str) -> TokenStoreResult<()> {
            self.storage()?
                .set_item(&self.key, token)
                .map_err(|_| TokenStoreError::Unavailable("localStorage write".to_string()))
        }

        fn clear(&self) -> TokenStoreResult<()> {
            self.storage()?
                .remove_item(&self.key)
                .map_err(|_| TokenStoreError::Unavailable("localStorage remove".to_string()))
        }
    }
}

/// Platform storage: localStorage in the browser, a file in the config dir
/// on native builds, memory otherwise.
pub fn default_token_store(config: &ConsoleConfig) -> Arc<dyn TokenStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Arc::new(LocalStorageTokenStore::new(config.token_key.clone()))
    }

    #[cfg(all(not(target_arch = "wasm32"), feature = "server"))]
    {
        Arc::new(FileTokenStore::in_config_dir(&config.token_key))
    }

    #[cfg(all(not(target_arch = "wasm32"), not(feature = "server")))]
    {
        let _ = config;
        Arc::new(MemoryTokenStore::new())
    }
}
