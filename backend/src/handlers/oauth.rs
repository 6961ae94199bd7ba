use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    config::OAuthClientConfig,
    error::AppError,
    handlers::session::{cookie_from_headers, session_cookie},
    services::{oauth::authorization_url, OAuthProvider},
    state::AppState,
    utils::cookies::{
        build_clear_cookie, build_cookie, OAUTH_STATE_COOKIE_NAME, OAUTH_STATE_COOKIE_PATH,
        OAUTH_STATE_MAX_AGE,
    },
};

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

fn configured_provider<'a>(
    state: &'a AppState,
    tag: &str,
) -> Result<(OAuthProvider, &'a OAuthClientConfig), AppError> {
    let provider = OAuthProvider::parse(tag)
        .ok_or_else(|| AppError::NotFound(format!("Unknown provider: {}", tag)))?;
    let client = match provider {
        OAuthProvider::Google => &state.config.google,
        OAuthProvider::Vk => &state.config.vk,
    };
    if !client.is_configured() {
        return Err(AppError::NotFound(format!(
            "Provider not configured: {}",
            tag
        )));
    }
    Ok((provider, client))
}

pub async fn oauth_sign_in(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<Response, AppError> {
    let (provider, client) = configured_provider(&state, &tag)?;
    let csrf_state = Uuid::new_v4().to_string();
    let redirect_uri = state.config.oauth_redirect_uri(provider.as_str());
    let url = authorization_url(provider, client, &redirect_uri, &csrf_state)?;

    let cookie = build_cookie(
        OAUTH_STATE_COOKIE_NAME,
        &csrf_state,
        OAUTH_STATE_MAX_AGE,
        OAUTH_STATE_COOKIE_PATH,
        state.config.cookie_options(),
    );
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to(&url)).into_response())
}

pub async fn oauth_callback(
    State(state): State<AppState>,
    Path(tag): Path<String>,
    Query(query): Query<CallbackQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let (provider, client) = configured_provider(&state, &tag)?;

    if let Some(error) = query.error {
        tracing::warn!(provider = provider.as_str(), %error, "OAuth provider returned an error");
        return Err(AppError::Unauthorized(format!("OAuth sign-in failed: {}", error)));
    }

    let expected = cookie_from_headers(&headers, OAUTH_STATE_COOKIE_NAME)
        .ok_or_else(|| AppError::BadRequest("Missing OAuth state".to_string()))?;
    if query.state.as_deref() != Some(expected.as_str()) {
        return Err(AppError::BadRequest("OAuth state mismatch".to_string()));
    }
    let code = query
        .code
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

    let redirect_uri = state.config.oauth_redirect_uri(provider.as_str());
    let credential = state
        .oauth
        .exchange_code(provider, client, &redirect_uri, &code)
        .await?;
    let record = state.authority.establish(credential).await?;

    let session = session_cookie(&state.config, &record)?;
    let clear_state = build_clear_cookie(
        OAUTH_STATE_COOKIE_NAME,
        OAUTH_STATE_COOKIE_PATH,
        state.config.cookie_options(),
    );
    Ok((
        AppendHeaders([
            (header::SET_COOKIE, session),
            (header::SET_COOKIE, clear_state),
        ]),
        Redirect::to("/"),
    )
        .into_response())
}
