//! Session state held in the signed cookie and its outward projection.

use serde::{Deserialize, Serialize};

use super::credential::Provider;

/// Identifier as issued by the backend, which uses numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for ClaimId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimId::Number(n) => write!(f, "{}", n),
            ClaimId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: ClaimId,
    pub value: String,
}

/// Outcome of a successful sign-in, before the access token is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSeed {
    pub provider: Provider,
    /// Account address; VK sign-ins carry none.
    pub email: Option<String>,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// The single active session of a browser.
///
/// `expires_at` is always the `exp` claim of `access_token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub provider: Provider,
    pub user_id: ClaimId,
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_at: i64,
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: ClaimId,
    pub roles: Vec<Role>,
}

/// What consumers of `/api/auth/session` see. Carries no refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub provider: Provider,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    pub expires_at: i64,
    pub user: SessionUser,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl SessionView {
    pub fn project(record: &SessionRecord, notice: Option<String>) -> Self {
        Self {
            provider: record.provider,
            access_token: record.access_token.clone(),
            expires_at: record.expires_at,
            user: SessionUser {
                id: record.user_id.clone(),
                roles: record.roles.clone(),
            },
            notice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SessionRecord {
        SessionRecord {
            provider: Provider::Google,
            user_id: ClaimId::Number(42),
            access_token: "access".into(),
            refresh_token: Some("refresh-secret".into()),
            expires_at: 1_700_000_000,
            roles: vec![Role {
                id: ClaimId::Number(1),
                value: "USER".into(),
            }],
        }
    }

    #[test]
    fn projection_never_exposes_refresh_token() {
        let view = SessionView::project(&record(), None);
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("refresh-secret"));
        assert!(!json.contains("notice"));
        assert!(json.contains("\"accessToken\":\"access\""));
        assert!(json.contains("\"provider\":\"google\""));
    }

    #[test]
    fn claim_id_keeps_backend_shape() {
        assert_eq!(serde_json::to_value(ClaimId::Number(5)).unwrap(), 5);
        assert_eq!(serde_json::to_value(ClaimId::Text("u-1".into())).unwrap(), "u-1");
        assert_eq!(ClaimId::Text("u-1".into()).to_string(), "u-1");
    }
}
