//! Shared harness: a seeded development API on an ephemeral port
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use common::models::LoginCredentials;
use invitation::AppContext;
use invitation::config::AppConfig;
use invitation::storage::{MemoryStorage, SessionStorage};
use mock_api::state::{ADMIN_EMAIL, ADMIN_PASSWORD, USER_EMAIL, USER_PASSWORD};
use mock_api::{MockState, create_router};
use tokio::net::TcpListener;

pub struct Harness {
    pub server: MockState,
    pub addr: SocketAddr,
}

impl Harness {
    pub async fn start() -> Self {
        Self::with_state(MockState::seeded()).await
    }

    pub async fn with_state(server: MockState) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let app = create_router(server.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock api");
        });
        Self { server, addr }
    }

    pub fn config(&self) -> AppConfig {
        AppConfig {
            api_base_url: format!("http://{}", self.addr),
            request_timeout_secs: 5,
            ..AppConfig::default()
        }
    }

    pub fn context(&self) -> AppContext {
        self.context_with(Arc::new(MemoryStorage::new()))
    }

    pub fn context_with(&self, storage: Arc<dyn SessionStorage>) -> AppContext {
        AppContext::with_storage(self.config(), storage).expect("context")
    }

    /// Context already signed in as the seeded standard user
    pub async fn signed_in(&self) -> AppContext {
        let ctx = self.context();
        ctx.session
            .login(&user_credentials())
            .await
            .expect("login");
        ctx
    }

    pub async fn signed_in_admin(&self) -> AppContext {
        let ctx = self.context();
        ctx.session
            .login(&LoginCredentials {
                email: ADMIN_EMAIL.to_string(),
                password: ADMIN_PASSWORD.to_string(),
            })
            .await
            .expect("admin login");
        ctx
    }
}

pub fn user_credentials() -> LoginCredentials {
    LoginCredentials {
        email: USER_EMAIL.to_string(),
        password: USER_PASSWORD.to_string(),
    }
}
