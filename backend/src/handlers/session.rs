use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    config::Config,
    error::AppError,
    models::{SessionRecord, SessionView},
    services::localization::negotiate_locale,
    state::AppState,
    utils::{
        cookies::{
            build_clear_cookie, build_cookie, extract_cookie_value, SESSION_COOKIE_NAME,
            SESSION_COOKIE_PATH,
        },
        jwt::{decode_session, encode_session},
        time::now_timestamp,
    },
};

/// Signs `record` and wraps it in a `Set-Cookie` value.
pub fn session_cookie(config: &Config, record: &SessionRecord) -> Result<String, AppError> {
    let artifact = encode_session(record, &config.session_secret, config.session_max_age_secs)?;
    Ok(build_cookie(
        SESSION_COOKIE_NAME,
        &artifact,
        Duration::from_secs(config.session_max_age_secs),
        SESSION_COOKIE_PATH,
        config.cookie_options(),
    ))
}

pub fn clear_session_cookie(config: &Config) -> String {
    build_clear_cookie(
        SESSION_COOKIE_NAME,
        SESSION_COOKIE_PATH,
        config.cookie_options(),
    )
}

pub fn cookie_from_headers(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| extract_cookie_value(raw, name))
        .filter(|value| !value.is_empty())
}

enum StoredSession {
    Missing,
    Invalid,
    Present(SessionRecord),
}

fn stored_session(headers: &HeaderMap, config: &Config) -> StoredSession {
    let Some(artifact) = cookie_from_headers(headers, SESSION_COOKIE_NAME) else {
        return StoredSession::Missing;
    };
    match decode_session(&artifact, &config.session_secret) {
        Ok(record) => StoredSession::Present(record),
        Err(err) => {
            tracing::debug!(error = %err, "Discarding unreadable session cookie");
            StoredSession::Invalid
        }
    }
}

/// Returns the current session, refreshing its access token when due.
///
/// Responds with `null` when there is no usable session. Every successful
/// read re-issues the cookie so the artifact tracks the refreshed record.
/// A refresh-failure notice follows the request's `Accept-Language`.
pub async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let record = match stored_session(&headers, &state.config) {
        StoredSession::Missing => return Ok(Json(None::<SessionView>).into_response()),
        StoredSession::Invalid => {
            let clear = clear_session_cookie(&state.config);
            return Ok((
                [(header::SET_COOKIE, clear)],
                Json(None::<SessionView>),
            )
                .into_response());
        }
        StoredSession::Present(record) => record,
    };

    let locale = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .and_then(negotiate_locale);
    let read = state
        .authority
        .read(record, now_timestamp(), locale.as_deref())
        .await;
    tracing::debug!(
        user_id = %read.record.user_id,
        refreshed = read.refreshed,
        stale = read.notice.is_some(),
        "Session read"
    );
    let cookie = session_cookie(&state.config, &read.record)?;
    let view = SessionView::project(&read.record, read.notice);

    Ok(([(header::SET_COOKIE, cookie)], Json(Some(view))).into_response())
}
