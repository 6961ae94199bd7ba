use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use tracing::Instrument;

use crate::{
    config::BackendEndpoints,
    error::AuthError,
    models::{BackendToken, Provider},
    utils::password::SHADOW_EMAIL_SUFFIX,
};

/// Characters left alone by `encodeURIComponent`, which the backend expects.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// VK bridge always receives a one-day lifetime.
pub const VK_TOKEN_LIFETIME_SECS: u64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    pub email: String,
    pub password: String,
}

impl AccountPayload {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            provider: None,
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VkExchange {
    pub access_token: String,
    pub expires_in: u64,
    pub user_id: String,
}

impl VkExchange {
    pub fn new(access_token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_in: VK_TOKEN_LIFETIME_SECS,
            user_id: user_id.into(),
        }
    }
}

/// Whether a shadow OAuth address is still free in the auth backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailVacancy {
    Vacant,
    Taken,
}

/// Calls into the external auth backend. None of them time out or retry.
///
/// First-party `login`/`register` succeed only on `201 Created`. The shadow
/// variants used for Google accounts hit the same endpoints but accept any
/// `2xx` carrying a token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, account: AccountPayload) -> Result<BackendToken, AuthError>;
    async fn register(&self, account: AccountPayload) -> Result<BackendToken, AuthError>;
    async fn shadow_login(&self, account: AccountPayload) -> Result<BackendToken, AuthError>;
    async fn shadow_register(&self, account: AccountPayload)
        -> Result<BackendToken, AuthError>;
    /// Probes `{email}.oauth`; `email` is the plain OAuth address.
    async fn check_email_vacancy(&self, email: String) -> Result<EmailVacancy, AuthError>;
    async fn exchange_vk(&self, exchange: VkExchange) -> Result<BackendToken, AuthError>;
    async fn refresh(
        &self,
        user_id: String,
        refresh_token: String,
    ) -> Result<BackendToken, AuthError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AcceptStatus {
    Created,
    AnySuccess,
}

impl AcceptStatus {
    fn accepts(self, status: StatusCode) -> bool {
        match self {
            AcceptStatus::Created => status == StatusCode::CREATED,
            AcceptStatus::AnySuccess => status.is_success(),
        }
    }
}

pub struct HttpAuthBackend {
    client: Client,
    endpoints: BackendEndpoints,
}

impl HttpAuthBackend {
    pub fn new(client: Client, endpoints: BackendEndpoints) -> Self {
        Self { client, endpoints }
    }

    async fn post_account(
        &self,
        url: &str,
        account: &AccountPayload,
        accept: AcceptStatus,
    ) -> Result<BackendToken, AuthError> {
        let response = self.client.post(url).json(account).send().await?;
        if !accept.accepts(response.status()) {
            tracing::debug!(status = %response.status(), url, "Auth backend rejected credentials");
            return Err(AuthError::CredentialRejected);
        }
        issued_token(response).await.ok_or(AuthError::CredentialRejected)
    }
}

/// Refresh endpoint scoped to one user; text ids are URI-encoded.
fn refresh_url(base: &str, user_id: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        utf8_percent_encode(user_id, URI_COMPONENT)
    )
}

/// Reads a token body, treating a missing or empty `token` as no token.
async fn issued_token(response: reqwest::Response) -> Option<BackendToken> {
    response
        .json::<BackendToken>()
        .await
        .ok()
        .filter(|token| !token.access_token.is_empty())
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn login(&self, account: AccountPayload) -> Result<BackendToken, AuthError> {
        let span = tracing::debug_span!("auth_backend_login", email = %account.email);
        self.post_account(&self.endpoints.login_url, &account, AcceptStatus::Created)
            .instrument(span)
            .await
    }

    async fn register(&self, account: AccountPayload) -> Result<BackendToken, AuthError> {
        let span = tracing::debug_span!("auth_backend_register", email = %account.email);
        self.post_account(
            &self.endpoints.registration_url,
            &account,
            AcceptStatus::Created,
        )
        .instrument(span)
        .await
    }

    async fn shadow_login(&self, account: AccountPayload) -> Result<BackendToken, AuthError> {
        let span = tracing::debug_span!("auth_backend_shadow_login", email = %account.email);
        self.post_account(
            &self.endpoints.login_url,
            &account,
            AcceptStatus::AnySuccess,
        )
        .instrument(span)
        .await
    }

    async fn shadow_register(
        &self,
        account: AccountPayload,
    ) -> Result<BackendToken, AuthError> {
        let span = tracing::debug_span!("auth_backend_shadow_register", email = %account.email);
        self.post_account(
            &self.endpoints.registration_url,
            &account,
            AcceptStatus::AnySuccess,
        )
        .instrument(span)
        .await
    }

    async fn check_email_vacancy(&self, email: String) -> Result<EmailVacancy, AuthError> {
        let url = format!(
            "{}/{}{}",
            self.endpoints.check_email_url.trim_end_matches('/'),
            utf8_percent_encode(&email, URI_COMPONENT),
            SHADOW_EMAIL_SUFFIX
        );
        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::OK => Ok(EmailVacancy::Vacant),
            StatusCode::BAD_REQUEST => Ok(EmailVacancy::Taken),
            other => Err(AuthError::ProbeAmbiguous(other.as_u16())),
        }
    }

    async fn exchange_vk(&self, exchange: VkExchange) -> Result<BackendToken, AuthError> {
        let response = self
            .client
            .post(&self.endpoints.vk_bridge_url)
            .json(&exchange)
            .send()
            .await?;
        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "VK bridge rejected token");
            return Err(AuthError::CredentialRejected);
        }
        issued_token(response).await.ok_or(AuthError::CredentialRejected)
    }

    async fn refresh(
        &self,
        user_id: String,
        refresh_token: String,
    ) -> Result<BackendToken, AuthError> {
        let url = refresh_url(&self.endpoints.refresh_url, &user_id);
        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", refresh_token))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::RefreshFailed(format!(
                "refresh endpoint returned {}",
                status
            )));
        }
        issued_token(response)
            .await
            .ok_or_else(|| AuthError::RefreshFailed("refresh response carried no token".into()))
    }
}
