//! Session store: login, session restore and logout
//!
//! The store owns the authenticated user and is the only writer of the
//! session keys in [`SessionStorage`]. At construction it registers a
//! handler on the API client so that any 401 on an authenticated request
//! clears the session without the client knowing the store's shape.

use std::sync::{Arc, Mutex};

use common::models::{AuthTokens, LoginCredentials, LoginResponse, RefreshRequest, User};
use thiserror::Error;
use tracing::{error, info, warn};

use super::{SettleOnDrop, lock};
use crate::api::{ApiClient, ApiError};
use crate::storage::{
    ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SessionStorage, StorageError, USER_KEY,
};

/// Session store error
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to persist session: {0}")]
    Storage(#[from] StorageError),

    #[error("No active session")]
    NoSession,
}

/// Type alias for Result with SessionError
pub type SessionResult<T> = Result<T, SessionError>;

/// Read state of the session store
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    /// False until the first `check_auth` (or login/logout) settles
    pub is_initialized: bool,
    pub error: Option<String>,
}

impl AuthState {
    /// Auth status is still being determined
    pub fn is_resolving(&self) -> bool {
        !self.is_initialized
    }

    pub fn is_admin(&self) -> bool {
        self.is_authenticated && self.user.as_ref().is_some_and(User::is_admin)
    }

    fn signed_out() -> Self {
        Self {
            is_initialized: true,
            ..Self::default()
        }
    }
}

/// Session manager backed by durable storage
pub struct SessionStore {
    api: Arc<ApiClient>,
    storage: Arc<dyn SessionStorage>,
    state: Arc<Mutex<AuthState>>,
}

impl SessionStore {
    /// Create the store, restoring any persisted session
    ///
    /// A stored token and user seed an authenticated state that stays
    /// unresolved until [`SessionStore::check_auth`] confirms it.
    pub fn new(api: Arc<ApiClient>, storage: Arc<dyn SessionStorage>) -> Self {
        let state = Arc::new(Mutex::new(restore(storage.as_ref())));

        let handler_state = Arc::downgrade(&state);
        let handler_storage = Arc::clone(&storage);
        api.set_unauthorized_handler(Arc::new(move || {
            warn!("Session rejected by the server, signing out");
            clear_persisted(handler_storage.as_ref());
            if let Some(state) = handler_state.upgrade() {
                *lock(&state) = AuthState::signed_out();
            }
        }));

        Self {
            api,
            storage,
            state,
        }
    }

    pub fn state(&self) -> AuthState {
        lock(&self.state).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        lock(&self.state).is_authenticated
    }

    pub fn user(&self) -> Option<User> {
        lock(&self.state).user.clone()
    }

    /// Authenticate with the API and persist the session
    ///
    /// On failure only `is_loading` and `error` change.
    pub async fn login(&self, credentials: &LoginCredentials) -> SessionResult<User> {
        info!("Login attempt for user: {}", credentials.email);
        let guard = self.begin_loading();

        let result = self
            .api
            .post_anonymous::<_, LoginResponse>("/auth/login", credentials)
            .await;
        guard.disarm();

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!("Login failed for {}: {}", credentials.email, e);
                self.fail(e.user_message("Invalid email or password"));
                return Err(e.into());
            }
        };

        let previous = snapshot(self.storage.as_ref());
        if let Err(e) = persist(self.storage.as_ref(), &response) {
            error!("Failed to persist session: {}", e);
            restore_persisted(self.storage.as_ref(), previous);
            self.fail("Could not save your session".to_string());
            return Err(e.into());
        }

        info!("User {} signed in", response.user.id);
        *lock(&self.state) = AuthState {
            user: Some(response.user.clone()),
            is_authenticated: true,
            is_loading: false,
            is_initialized: true,
            error: None,
        };

        Ok(response.user)
    }

    /// Confirm the stored session with the server
    ///
    /// Without a stored token this resolves immediately without touching the
    /// network. Any failure clears the session. Never returns an error.
    pub async fn check_auth(&self) -> bool {
        if self.storage.get(ACCESS_TOKEN_KEY).is_none() {
            clear_persisted(self.storage.as_ref());
            *lock(&self.state) = AuthState::signed_out();
            return false;
        }

        let guard = self.begin_loading();
        let result = self.api.get::<User>("/auth/me").await;
        guard.disarm();

        match result {
            Ok(user) => {
                match serde_json::to_string(&user) {
                    Ok(json) => {
                        if let Err(e) = self.storage.set(USER_KEY, &json) {
                            warn!("Failed to refresh stored user: {}", e);
                        }
                    }
                    Err(e) => warn!("Failed to serialize user: {}", e),
                }

                *lock(&self.state) = AuthState {
                    user: Some(user),
                    is_authenticated: true,
                    is_loading: false,
                    is_initialized: true,
                    error: None,
                };
                true
            }
            Err(e) => {
                info!("Stored session is no longer valid: {}", e);
                clear_persisted(self.storage.as_ref());
                *lock(&self.state) = AuthState::signed_out();
                false
            }
        }
    }

    /// Sign out; server-side invalidation is best effort
    pub async fn logout(&self) {
        info!("Logout request");
        let guard = self.begin_loading();

        if let Some(refresh_token) = self.storage.get(REFRESH_TOKEN_KEY) {
            let request = RefreshRequest { refresh_token };
            if let Err(e) = self
                .api
                .post::<_, serde_json::Value>("/auth/logout", &request)
                .await
            {
                warn!("Server-side logout failed: {}", e);
            }
        }
        guard.disarm();

        clear_persisted(self.storage.as_ref());
        *lock(&self.state) = AuthState::signed_out();
    }

    /// Exchange the stored refresh token for a new token pair
    ///
    /// A rejected refresh is treated as an invalid session.
    pub async fn refresh_session(&self) -> SessionResult<()> {
        let Some(refresh_token) = self.storage.get(REFRESH_TOKEN_KEY) else {
            return Err(SessionError::NoSession);
        };

        let request = RefreshRequest { refresh_token };
        match self
            .api
            .post_anonymous::<_, AuthTokens>("/auth/refresh", &request)
            .await
        {
            Ok(tokens) => {
                self.storage.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
                self.storage.set(REFRESH_TOKEN_KEY, &tokens.refresh_token)?;
                info!("Session tokens refreshed");
                Ok(())
            }
            Err(e) => {
                warn!("Token refresh failed: {}", e);
                clear_persisted(self.storage.as_ref());
                *lock(&self.state) = AuthState::signed_out();
                Err(e.into())
            }
        }
    }

    /// Return to the state of a fresh, signed-out store without touching storage
    pub fn reset(&self) {
        *lock(&self.state) = AuthState::default();
    }

    fn begin_loading(&self) -> SettleOnDrop<impl FnOnce() + '_> {
        {
            let mut state = lock(&self.state);
            state.is_loading = true;
            state.error = None;
        }
        SettleOnDrop::new(|| lock(&self.state).is_loading = false)
    }

    fn fail(&self, message: String) {
        let mut state = lock(&self.state);
        state.is_loading = false;
        state.error = Some(message);
    }
}

fn restore(storage: &dyn SessionStorage) -> AuthState {
    let token = storage.get(ACCESS_TOKEN_KEY);
    let user = storage
        .get(USER_KEY)
        .and_then(|json| match serde_json::from_str::<User>(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Discarding unreadable stored user: {}", e);
                None
            }
        });

    match (token, user) {
        (Some(_), Some(user)) => AuthState {
            user: Some(user),
            is_authenticated: true,
            ..AuthState::default()
        },
        _ => AuthState::default(),
    }
}

fn persist(storage: &dyn SessionStorage, response: &LoginResponse) -> Result<(), StorageError> {
    let user = serde_json::to_string(&response.user)?;
    storage.set(ACCESS_TOKEN_KEY, &response.access_token)?;
    storage.set(REFRESH_TOKEN_KEY, &response.refresh_token)?;
    storage.set(USER_KEY, &user)?;
    Ok(())
}

const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY];

fn snapshot(storage: &dyn SessionStorage) -> [Option<String>; 3] {
    SESSION_KEYS.map(|key| storage.get(key))
}

/// Put back the keys captured by [`snapshot`]; best effort
fn restore_persisted(storage: &dyn SessionStorage, previous: [Option<String>; 3]) {
    for (key, value) in SESSION_KEYS.into_iter().zip(previous) {
        let result = match value {
            Some(value) => storage.set(key, &value),
            None => storage.remove(key),
        };
        if let Err(e) = result {
            error!("Failed to restore {} in storage: {}", key, e);
        }
    }
}

fn clear_persisted(storage: &dyn SessionStorage) {
    for key in SESSION_KEYS {
        if let Err(e) = storage.remove(key) {
            error!("Failed to clear {} from storage: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::storage::MemoryStorage;
    use chrono::Utc;
    use common::models::UserRole;
    use uuid::Uuid;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: "user@wedding.com".to_string(),
            display_name: "User".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    fn store_with(storage: Arc<MemoryStorage>) -> SessionStore {
        let config = AppConfig {
            // Nothing listens here; these tests must never reach the network
            api_base_url: "http://127.0.0.1:9".to_string(),
            ..AppConfig::default()
        };
        let api = Arc::new(ApiClient::new(&config, storage.clone()).expect("client"));
        SessionStore::new(api, storage)
    }

    #[test]
    fn test_restore_requires_token_and_user() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(ACCESS_TOKEN_KEY, "token").unwrap();
        let state = store_with(storage.clone()).state();
        assert!(!state.is_authenticated);

        let json = serde_json::to_string(&user(UserRole::Admin)).unwrap();
        storage.set(USER_KEY, &json).unwrap();
        let state = store_with(storage).state();
        assert!(state.is_authenticated);
        assert!(state.is_resolving());
        assert!(state.is_admin());
    }

    #[tokio::test]
    async fn test_check_auth_without_token_skips_network() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(REFRESH_TOKEN_KEY, "stale").unwrap();
        let store = store_with(storage.clone());

        assert!(!store.check_auth().await);

        let state = store.state();
        assert!(!state.is_authenticated);
        assert!(!state.is_loading);
        assert!(state.is_initialized);
        assert!(state.error.is_none());
        assert_eq!(storage.get(REFRESH_TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn test_refresh_without_session() {
        let store = store_with(Arc::new(MemoryStorage::new()));
        assert!(matches!(
            store.refresh_session().await,
            Err(SessionError::NoSession)
        ));
    }
}
