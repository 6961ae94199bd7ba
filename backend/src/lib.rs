//! Session authority of the movie-catalog frontend.
//!
//! Exchanges first-party, Google and VK credentials for tokens issued by the
//! external auth backend, keeps them in a signed session cookie and refreshes
//! the access token shortly before it expires.

rust_i18n::i18n!("locales", fallback = "ru");

use axum::{
    http::Method,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/signin/login", post(handlers::auth::sign_in_login))
        .route(
            "/api/auth/signin/register",
            post(handlers::auth::sign_in_register),
        )
        .route(
            "/api/auth/signin/{provider}",
            get(handlers::oauth::oauth_sign_in),
        )
        .route(
            "/api/auth/callback/{provider}",
            get(handlers::oauth::oauth_callback),
        )
        .route("/api/auth/session", get(handlers::session::get_session))
        .route("/api/auth/signout", post(handlers::auth::sign_out))
        .route("/api/auth/providers", get(handlers::auth::providers))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_id))
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                        .allow_headers(Any)
                        .max_age(std::time::Duration::from_secs(24 * 60 * 60)),
                ),
        )
        .with_state(state)
}
