//! Authorization-code handshake with the Google and VK OAuth providers.
//!
//! The handshake only yields a [`Credential`]; issuing backend tokens is left
//! to the session authority.

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::{config::OAuthClientConfig, error::AuthError, models::Credential};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Vk,
}

impl OAuthProvider {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "google" => Some(OAuthProvider::Google),
            "vk" => Some(OAuthProvider::Vk),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Vk => "vk",
        }
    }

    fn extra_authorize_params(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            OAuthProvider::Google => &[
                ("scope", "openid email profile"),
                ("prompt", "consent"),
                ("access_type", "offline"),
            ],
            OAuthProvider::Vk => &[("scope", "email")],
        }
    }
}

/// URL the browser is sent to in order to start the handshake.
pub fn authorization_url(
    provider: OAuthProvider,
    client: &OAuthClientConfig,
    redirect_uri: &str,
    state: &str,
) -> anyhow::Result<String> {
    let mut params = vec![
        ("client_id", client.client_id.as_str()),
        ("redirect_uri", redirect_uri),
        ("response_type", "code"),
        ("state", state),
    ];
    params.extend_from_slice(provider.extra_authorize_params());
    let url = Url::parse_with_params(&client.authorize_url, &params)?;
    Ok(url.to_string())
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    email: String,
}

#[derive(Debug, Deserialize)]
struct VkTokenResponse {
    access_token: String,
    user_id: serde_json::Value,
}

pub struct OAuthClient {
    http: Client,
}

impl OAuthClient {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Trades an authorization code for the provider profile.
    pub async fn exchange_code(
        &self,
        provider: OAuthProvider,
        client: &OAuthClientConfig,
        redirect_uri: &str,
        code: &str,
    ) -> Result<Credential, AuthError> {
        match provider {
            OAuthProvider::Google => self.google_profile(client, redirect_uri, code).await,
            OAuthProvider::Vk => self.vk_profile(client, redirect_uri, code).await,
        }
    }

    async fn google_profile(
        &self,
        client: &OAuthClientConfig,
        redirect_uri: &str,
        code: &str,
    ) -> Result<Credential, AuthError> {
        let response = self
            .http
            .post(&client.token_url)
            .form(&[
                ("code", code),
                ("client_id", client.client_id.as_str()),
                ("client_secret", client.client_secret.as_str()),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Google rejected authorization code");
            return Err(AuthError::CredentialRejected);
        }
        let token: GoogleTokenResponse = response
            .json()
            .await
            .map_err(|_| AuthError::CredentialRejected)?;

        let userinfo_url = client
            .userinfo_url
            .as_deref()
            .ok_or(AuthError::CredentialRejected)?;
        let response = self
            .http
            .get(userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Google userinfo request failed");
            return Err(AuthError::CredentialRejected);
        }
        let profile: GoogleUserInfo = response
            .json()
            .await
            .map_err(|_| AuthError::CredentialRejected)?;

        Ok(Credential::GoogleProfile {
            email: profile.email,
        })
    }

    async fn vk_profile(
        &self,
        client: &OAuthClientConfig,
        redirect_uri: &str,
        code: &str,
    ) -> Result<Credential, AuthError> {
        let response = self
            .http
            .get(&client.token_url)
            .query(&[
                ("client_id", client.client_id.as_str()),
                ("client_secret", client.client_secret.as_str()),
                ("redirect_uri", redirect_uri),
                ("code", code),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "VK rejected authorization code");
            return Err(AuthError::CredentialRejected);
        }
        let token: VkTokenResponse = response
            .json()
            .await
            .map_err(|_| AuthError::CredentialRejected)?;

        let user_id = match token.user_id {
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => s,
            _ => return Err(AuthError::CredentialRejected),
        };

        Ok(Credential::VkProfile {
            access_token: token.access_token,
            user_id,
        })
    }
}
