//! Application context owning the API client and every store

use std::sync::{Arc, Mutex};

use common::models::ThemeSettings;
use thiserror::Error;
use tracing::info;

use crate::api::{ApiClient, ApiError};
use crate::config::AppConfig;
use crate::storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
use crate::stores::{
    GuestStore, MediaStore, SessionStore, UiStore, WeddingStore, WishStore, lock,
};
use crate::theme::{ResolvedTheme, ThemeProvider};

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Failed to open session storage: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to build API client: {0}")]
    Api(#[from] ApiError),
}

/// State shared by the whole client, constructed once at startup
pub struct AppContext {
    pub config: AppConfig,
    pub api: Arc<ApiClient>,
    pub storage: Arc<dyn SessionStorage>,
    pub session: SessionStore,
    pub weddings: WeddingStore,
    pub guests: GuestStore,
    pub wishes: WishStore,
    pub media: MediaStore,
    pub ui: UiStore,
    theme: Mutex<ThemeProvider>,
}

impl AppContext {
    /// Build the context, opening file storage when `storage_path` is set
    pub fn new(config: AppConfig) -> Result<Self, ContextError> {
        let storage: Arc<dyn SessionStorage> = match &config.storage_path {
            Some(path) => Arc::new(FileStorage::open(path)?),
            None => {
                info!("No storage path configured, session will not survive restarts");
                Arc::new(MemoryStorage::new())
            }
        };
        Self::with_storage(config, storage)
    }

    pub fn with_storage(
        config: AppConfig,
        storage: Arc<dyn SessionStorage>,
    ) -> Result<Self, ContextError> {
        let api = Arc::new(ApiClient::new(&config, Arc::clone(&storage))?);
        let session = SessionStore::new(Arc::clone(&api), Arc::clone(&storage));

        Ok(Self {
            weddings: WeddingStore::new(Arc::clone(&api)),
            guests: GuestStore::new(Arc::clone(&api)),
            wishes: WishStore::new(Arc::clone(&api)),
            media: MediaStore::new(Arc::clone(&api)),
            ui: UiStore::new(),
            theme: Mutex::new(ThemeProvider::default()),
            session,
            config,
            api,
            storage,
        })
    }

    /// Resolve the theme for `descriptor`, reusing the last result when unchanged
    pub fn resolve_theme(&self, descriptor: Option<&ThemeSettings>) -> ResolvedTheme {
        lock(&self.theme).resolve(descriptor).clone()
    }

    /// Number of distinct theme resolutions computed so far
    pub fn theme_generation(&self) -> u64 {
        lock(&self.theme).generation()
    }

    /// Return every in-memory store to its initial state
    ///
    /// Durable storage is left alone.
    pub fn reset(&self) {
        self.session.reset();
        self.weddings.reset();
        self.guests.reset();
        self.wishes.reset();
        self.media.reset();
        self.ui.reset();
        lock(&self.theme).reset();
    }
}
