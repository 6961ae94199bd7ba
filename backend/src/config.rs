use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::env;

use crate::utils::cookies::{CookieOptions, SameSite};

const DEFAULT_SESSION_MAX_AGE_SECS: u64 = 7 * 24 * 60 * 60;

/// URLs of the external auth backend that issues access/refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendEndpoints {
    pub login_url: String,
    pub registration_url: String,
    pub check_email_url: String,
    pub vk_bridge_url: String,
    pub refresh_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub userinfo_url: Option<String>,
}

impl OAuthClientConfig {
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub endpoints: BackendEndpoints,
    pub google: OAuthClientConfig,
    pub vk: OAuthClientConfig,
    pub session_secret: String,
    pub session_max_age_secs: u64,
    pub public_base_url: String,
    pub cookie_secure: bool,
    pub default_locale: String,
    pub bind_addr: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let endpoints = BackendEndpoints {
            login_url: required("LOGIN")?,
            registration_url: required("REGISTRATION")?,
            check_email_url: required("CHECK_EMAIL_VACANCY")?,
            vk_bridge_url: required("VK")?,
            refresh_url: required("REFRESH_TOKEN")?,
        };

        let google = OAuthClientConfig {
            client_id: env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            client_secret: env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default(),
            authorize_url: env::var("GOOGLE_AUTHORIZE_URL")
                .unwrap_or_else(|_| "https://accounts.google.com/o/oauth2/v2/auth".to_string()),
            token_url: env::var("GOOGLE_TOKEN_URL")
                .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string()),
            userinfo_url: Some(
                env::var("GOOGLE_USERINFO_URL").unwrap_or_else(|_| {
                    "https://openidconnect.googleapis.com/v1/userinfo".to_string()
                }),
            ),
        };

        let vk = OAuthClientConfig {
            client_id: env::var("VK_CLIENT_ID").unwrap_or_default(),
            client_secret: env::var("VK_CLIENT_SECRET").unwrap_or_default(),
            authorize_url: env::var("VK_AUTHORIZE_URL")
                .unwrap_or_else(|_| "https://oauth.vk.com/authorize".to_string()),
            token_url: env::var("VK_TOKEN_URL")
                .unwrap_or_else(|_| "https://oauth.vk.com/access_token".to_string()),
            userinfo_url: None,
        };

        let session_secret = env::var("SESSION_SECRET")
            .unwrap_or_else(|_| "your-secret-key-change-this-in-production".to_string());

        let session_max_age_secs = env::var("SESSION_MAX_AGE_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_SESSION_MAX_AGE_SECS);

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        let cookie_secure = env::var("COOKIE_SECURE")
            .map(|raw| matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let default_locale = env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "ru".to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Ok(Config {
            endpoints,
            google,
            vk,
            session_secret,
            session_max_age_secs,
            public_base_url,
            cookie_secure,
            default_locale,
            bind_addr,
        })
    }

    pub fn cookie_options(&self) -> CookieOptions {
        CookieOptions {
            secure: self.cookie_secure,
            same_site: SameSite::Lax,
        }
    }

    /// Redirect URI registered with the OAuth provider for `provider`.
    pub fn oauth_redirect_uri(&self, provider: &str) -> String {
        format!("{}/api/auth/callback/{}", self.public_base_url, provider)
    }
}

fn required(name: &str) -> anyhow::Result<String> {
    env::var(name).map_err(|_| anyhow!("Missing required environment variable {}", name))
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        endpoints: BackendEndpoints {
            login_url: "http://auth/login".into(),
            registration_url: "http://auth/registration".into(),
            check_email_url: "http://auth/check".into(),
            vk_bridge_url: "http://auth/vk".into(),
            refresh_url: "http://auth/refresh".into(),
        },
        google: OAuthClientConfig {
            client_id: "gid".into(),
            client_secret: "gsecret".into(),
            authorize_url: "https://accounts.example/auth".into(),
            token_url: "https://accounts.example/token".into(),
            userinfo_url: Some("https://accounts.example/userinfo".into()),
        },
        vk: OAuthClientConfig {
            client_id: String::new(),
            client_secret: String::new(),
            authorize_url: "https://oauth.vk.example/authorize".into(),
            token_url: "https://oauth.vk.example/access_token".into(),
            userinfo_url: None,
        },
        session_secret: "secret".into(),
        session_max_age_secs: DEFAULT_SESSION_MAX_AGE_SECS,
        public_base_url: "http://localhost:3000".into(),
        cookie_secure: false,
        default_locale: "ru".into(),
        bind_addr: "127.0.0.1:3000".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oauth_redirect_uri_points_at_callback_route() {
        let config = test_config();
        assert_eq!(
            config.oauth_redirect_uri("google"),
            "http://localhost:3000/api/auth/callback/google"
        );
    }

    #[test]
    fn oauth_client_requires_both_id_and_secret() {
        let config = test_config();
        assert!(config.google.is_configured());
        assert!(!config.vk.is_configured());
    }
}
