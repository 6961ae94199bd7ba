#![allow(dead_code)]
use std::sync::Arc;

use axum::{body::Body, http::Response};
use cinema_backend::{
    config::{BackendEndpoints, Config, OAuthClientConfig},
    models::{ClaimId, Provider, Role, SessionRecord},
    services::{HttpAuthBackend, I18nLocalizer},
    state::AppState,
    utils::cookies::SESSION_COOKIE_NAME,
};
use httpmock::MockServer;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

pub const SESSION_SECRET: &str = "test-session-secret";

pub fn endpoints(server: &MockServer) -> BackendEndpoints {
    BackendEndpoints {
        login_url: server.url("/auth/login"),
        registration_url: server.url("/auth/registration"),
        check_email_url: server.url("/auth/check-email"),
        vk_bridge_url: server.url("/auth/vk"),
        refresh_url: server.url("/auth/refresh"),
    }
}

pub fn test_config(server: &MockServer) -> Config {
    Config {
        endpoints: endpoints(server),
        google: OAuthClientConfig {
            client_id: "google-client".into(),
            client_secret: "google-secret".into(),
            authorize_url: server.url("/google/auth"),
            token_url: server.url("/google/token"),
            userinfo_url: Some(server.url("/google/userinfo")),
        },
        vk: OAuthClientConfig {
            client_id: "vk-client".into(),
            client_secret: "vk-secret".into(),
            authorize_url: server.url("/vk/authorize"),
            token_url: server.url("/vk/access_token"),
            userinfo_url: None,
        },
        session_secret: SESSION_SECRET.into(),
        session_max_age_secs: 7 * 24 * 60 * 60,
        public_base_url: "http://localhost:3000".into(),
        cookie_secure: false,
        default_locale: "en".into(),
        bind_addr: "127.0.0.1:0".into(),
    }
}

pub fn backend(server: &MockServer) -> HttpAuthBackend {
    HttpAuthBackend::new(reqwest::Client::new(), endpoints(server))
}

pub fn app_state(server: &MockServer) -> AppState {
    let http = reqwest::Client::new();
    AppState::new(
        test_config(server),
        Arc::new(HttpAuthBackend::new(http.clone(), endpoints(server))),
        Arc::new(I18nLocalizer::new("en")),
        http,
    )
}

/// Access token shaped like the ones the auth backend issues.
pub fn access_token(user_id: i64, exp: i64) -> String {
    encode(
        &Header::default(),
        &json!({
            "id": user_id,
            "exp": exp,
            "roles": [{"id": 1, "value": "USER", "description": "Regular user"}]
        }),
        &EncodingKey::from_secret(b"auth-backend-key"),
    )
    .expect("encode access token")
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn record(expires_at: i64) -> SessionRecord {
    SessionRecord {
        provider: Provider::Database,
        user_id: ClaimId::Number(7),
        access_token: access_token(7, expires_at),
        refresh_token: Some("refresh-1".into()),
        expires_at,
        roles: vec![Role {
            id: ClaimId::Number(1),
            value: "USER".into(),
        }],
    }
}

/// All `Set-Cookie` values of a response.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

/// `name=value` pair of the session cookie, ready for a `Cookie` header.
pub fn session_cookie_pair(response: &Response<Body>) -> Option<String> {
    set_cookies(response)
        .into_iter()
        .find(|c| c.starts_with(&format!("{}=", SESSION_COOKIE_NAME)))
        .and_then(|c| c.split(';').next().map(str::to_string))
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json")
}
