use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_backend::{config::Config, router, state::AppState};

fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(4).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinema_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!(
        login_url = %config.endpoints.login_url,
        registration_url = %config.endpoints.registration_url,
        check_email_url = %config.endpoints.check_email_url,
        vk_bridge_url = %config.endpoints.vk_bridge_url,
        refresh_url = %config.endpoints.refresh_url,
        session_secret = %mask_secret(&config.session_secret),
        google_client_secret = %mask_secret(&config.google.client_secret),
        vk_client_secret = %mask_secret(&config.vk.client_secret),
        session_max_age_secs = config.session_max_age_secs,
        default_locale = %config.default_locale,
        "Loaded configuration from environment/.env"
    );

    let addr: SocketAddr = config.bind_addr.parse()?;
    let app = router(AppState::from_config(config));

    tracing::info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
