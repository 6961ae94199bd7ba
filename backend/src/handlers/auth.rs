use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    handlers::session::{clear_session_cookie, session_cookie},
    models::{Credential, SessionView},
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct ProviderInfo {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

pub async fn sign_in_login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;
    let credential = Credential::DatabaseLogin {
        email: payload.email,
        password: payload.password,
    };
    establish_session(&state, credential).await
}

pub async fn sign_in_register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;
    let credential = Credential::DatabaseRegister {
        email: payload.email,
        password: payload.password,
    };
    establish_session(&state, credential).await
}

async fn establish_session(state: &AppState, credential: Credential) -> Result<Response, AppError> {
    let record = state.authority.establish(credential).await?;
    let cookie = session_cookie(&state.config, &record)?;
    let view = SessionView::project(&record, None);
    Ok(([(header::SET_COOKIE, cookie)], Json(view)).into_response())
}

pub async fn sign_out(State(state): State<AppState>) -> impl IntoResponse {
    tracing::debug!("Signing out");
    (
        [(header::SET_COOKIE, clear_session_cookie(&state.config))],
        Json(json!({"message": "Signed out"})),
    )
}

pub async fn providers(State(state): State<AppState>) -> Json<Vec<ProviderInfo>> {
    let mut providers = vec![
        ProviderInfo {
            id: "login",
            kind: "credentials",
        },
        ProviderInfo {
            id: "register",
            kind: "credentials",
        },
    ];
    if state.config.google.is_configured() {
        providers.push(ProviderInfo {
            id: "google",
            kind: "oauth",
        });
    }
    if state.config.vk.is_configured() {
        providers.push(ProviderInfo {
            id: "vk",
            kind: "oauth",
        });
    }
    Json(providers)
}
