use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::models::LoginCredentials;
use invitation::{AppConfig, AppContext, guards};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting invitation client against {}", config.api_base_url);

    let ctx = AppContext::new(config)?;

    if !ctx.session.check_auth().await {
        // Optional non-interactive sign-in
        match (
            std::env::var("INVITATION_EMAIL"),
            std::env::var("INVITATION_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) => {
                ctx.session
                    .login(&LoginCredentials { email, password })
                    .await?;
            }
            _ => {
                warn!("No active session; set INVITATION_EMAIL and INVITATION_PASSWORD to sign in");
                return Ok(());
            }
        }
    }

    let state = ctx.session.state();
    info!(
        "Signed in as {} (home: {})",
        state.user.as_ref().map(|u| u.display_name.as_str()).unwrap_or("unknown"),
        guards::home_for(state.user.as_ref())
    );

    let weddings = ctx.weddings.fetch_all().await?;
    info!("{} wedding(s) found", weddings.len());

    for wedding in &weddings {
        let theme = ctx.resolve_theme(wedding.theme.as_ref());
        let guests = ctx.guests.fetch(wedding.id).await?;
        info!(
            "{} [/{}] {:?}: template {} (dark: {}), {} guest(s), {} attending",
            wedding.title,
            wedding.slug,
            wedding.status,
            theme.template_id(),
            theme.is_dark,
            guests.len(),
            ctx.guests.stats().attending_headcount
        );
    }

    Ok(())
}
