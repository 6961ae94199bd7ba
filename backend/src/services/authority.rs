//! Session authority: turns credentials into sessions and keeps their access
//! tokens fresh.
//!
//! Sign-in is dispatched over [`Credential`], one handler per variant. Each
//! handler ends in the same backend issuance path (login, register or the VK
//! bridge) and yields a [`SessionSeed`]; [`SessionAuthority::materialize`]
//! decodes the access token into a [`SessionRecord`].
//!
//! Reads go through [`SessionAuthority::read`]. A record whose token is more
//! than [`REFRESH_MARGIN_SECS`] away from expiry is returned untouched.
//! Otherwise the refresh endpoint is called once. A failed refresh keeps the
//! stale record and attaches a localized notice; it never signs the user out.

use std::sync::Arc;

use crate::{
    error::AuthError,
    models::{Credential, Provider, SessionRecord, SessionSeed},
    services::{
        auth_backend::{AccountPayload, AuthBackend, EmailVacancy, VkExchange},
        localization::{Localizer, Message},
    },
    utils::{
        jwt::decode_access_claims,
        password::{derive_password, shadow_email},
    },
};

/// Seconds before `exp` at which a token is already treated as expired.
pub const REFRESH_MARGIN_SECS: i64 = 30;

/// Result of reading a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRead {
    pub record: SessionRecord,
    pub refreshed: bool,
    /// Set at most once per read, when a refresh failed.
    pub notice: Option<String>,
}

pub struct SessionAuthority {
    backend: Arc<dyn AuthBackend>,
    localizer: Arc<dyn Localizer>,
}

impl SessionAuthority {
    pub fn new(backend: Arc<dyn AuthBackend>, localizer: Arc<dyn Localizer>) -> Self {
        Self { backend, localizer }
    }

    /// Exchanges a credential for backend tokens.
    pub async fn sign_in(&self, credential: Credential) -> Result<SessionSeed, AuthError> {
        match credential {
            Credential::DatabaseLogin { email, password } => {
                self.database_login(email, password).await
            }
            Credential::DatabaseRegister { email, password } => {
                self.database_register(email, password).await
            }
            Credential::GoogleProfile { email } => self.google(email).await,
            Credential::VkProfile {
                access_token,
                user_id,
            } => self.vk(access_token, user_id).await,
        }
    }

    /// Signs in and decodes the resulting access token.
    pub async fn establish(&self, credential: Credential) -> Result<SessionRecord, AuthError> {
        let provider = credential.provider();
        let seed = self.sign_in(credential).await?;
        let email = seed.email.clone();
        let record = Self::materialize(seed)?;
        tracing::info!(
            %provider,
            user_id = %record.user_id,
            email = email.as_deref().unwrap_or("-"),
            "first login"
        );
        Ok(record)
    }

    /// First materialization after sign-in.
    pub fn materialize(seed: SessionSeed) -> Result<SessionRecord, AuthError> {
        let claims = decode_access_claims(&seed.access_token)?;
        Ok(SessionRecord {
            provider: seed.provider,
            user_id: claims.id.clone(),
            roles: claims.roles(),
            expires_at: claims.exp,
            access_token: seed.access_token,
            refresh_token: seed.refresh_token,
        })
    }

    /// Applies the refresh policy to `record` at unix time `now`.
    ///
    /// `locale` selects the language of a refresh-failure notice.
    pub async fn read(
        &self,
        record: SessionRecord,
        now: i64,
        locale: Option<&str>,
    ) -> SessionRead {
        if now < record.expires_at - REFRESH_MARGIN_SECS {
            tracing::debug!(user_id = %record.user_id, "still logged in");
            return SessionRead {
                record,
                refreshed: false,
                notice: None,
            };
        }

        tracing::debug!(user_id = %record.user_id, "refreshing token");
        match self.refresh(&record).await {
            Ok(updated) => {
                tracing::info!(
                    user_id = %updated.user_id,
                    expires_at = updated.expires_at,
                    "refreshed token"
                );
                SessionRead {
                    record: updated,
                    refreshed: true,
                    notice: None,
                }
            }
            Err(err) => {
                tracing::error!(user_id = %record.user_id, error = %err, "Token refresh failed");
                SessionRead {
                    record,
                    refreshed: false,
                    notice: Some(self.localizer.message(Message::RefreshTokenError, locale)),
                }
            }
        }
    }

    async fn refresh(&self, record: &SessionRecord) -> Result<SessionRecord, AuthError> {
        let refresh_token = record
            .refresh_token
            .clone()
            .ok_or_else(|| AuthError::RefreshFailed("session holds no refresh token".into()))?;

        let issued = self
            .backend
            .refresh(record.user_id.to_string(), refresh_token)
            .await?;
        let claims = decode_access_claims(&issued.access_token)?;

        let mut updated = record.clone();
        updated.expires_at = claims.exp;
        updated.access_token = issued.access_token;
        if let Some(rotated) = issued.refresh_token {
            updated.refresh_token = Some(rotated);
        }
        Ok(updated)
    }

    async fn database_login(
        &self,
        email: String,
        password: String,
    ) -> Result<SessionSeed, AuthError> {
        let issued = self
            .backend
            .login(AccountPayload::new(email.clone(), password))
            .await?;
        Ok(SessionSeed {
            provider: Provider::Database,
            email: Some(email),
            access_token: issued.access_token,
            refresh_token: issued.refresh_token,
        })
    }

    async fn database_register(
        &self,
        email: String,
        password: String,
    ) -> Result<SessionSeed, AuthError> {
        let account =
            AccountPayload::new(email.clone(), password).with_provider(Provider::Database);
        let issued = self.backend.register(account).await?;
        Ok(SessionSeed {
            provider: Provider::Database,
            email: Some(email),
            access_token: issued.access_token,
            refresh_token: issued.refresh_token,
        })
    }

    /// Google users live in the backend as a shadow account. A vacant shadow
    /// address is registered, an occupied one is logged into.
    async fn google(&self, email: String) -> Result<SessionSeed, AuthError> {
        let account = AccountPayload::new(shadow_email(&email), derive_password(&email));
        let issued = match self.backend.check_email_vacancy(email.clone()).await? {
            EmailVacancy::Vacant => {
                tracing::debug!(%email, "Registering shadow account");
                self.backend.shadow_register(account).await?
            }
            EmailVacancy::Taken => {
                tracing::debug!(%email, "Logging into shadow account");
                self.backend.shadow_login(account).await?
            }
        };
        Ok(SessionSeed {
            provider: Provider::Google,
            email: Some(email),
            access_token: issued.access_token,
            refresh_token: issued.refresh_token,
        })
    }

    async fn vk(&self, access_token: String, user_id: String) -> Result<SessionSeed, AuthError> {
        let issued = self
            .backend
            .exchange_vk(VkExchange::new(access_token, user_id))
            .await?;
        Ok(SessionSeed {
            provider: Provider::Vk,
            email: None,
            access_token: issued.access_token,
            refresh_token: issued.refresh_token,
        })
    }
}
