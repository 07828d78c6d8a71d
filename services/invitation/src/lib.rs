//! Client-side state layer for digital wedding invitations
//!
//! This crate provides the session and entity stores that mirror the remote
//! invitation API, the template resolver behind themed public pages, route
//! guards, and form validation.

pub mod api;
pub mod config;
pub mod context;
pub mod forms;
pub mod guards;
pub mod storage;
pub mod stores;
pub mod theme;

pub use api::{ApiClient, ApiError, ApiResult};
pub use config::AppConfig;
pub use context::{AppContext, ContextError};

/// Example usage of the context
///
/// ```rust,no_run
/// use invitation::{AppConfig, AppContext};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let ctx = AppContext::new(AppConfig::from_env()?)?;
///     if ctx.session.check_auth().await {
///         let weddings = ctx.weddings.fetch_all().await?;
///         println!("{} weddings", weddings.len());
///     }
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
