//! Token payloads exchanged with the external auth backend.

use serde::{Deserialize, Serialize};

use super::session::{ClaimId, Role};

/// Body returned by the login, registration, VK bridge and refresh endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendToken {
    #[serde(rename = "token")]
    pub access_token: String,
    #[serde(
        rename = "refreshToken",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub refresh_token: Option<String>,
}

/// Role entry as it appears in the access token; extra fields are dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleClaim {
    pub id: ClaimId,
    pub value: String,
}

/// Standard claims read from a backend access token.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessClaims {
    pub id: ClaimId,
    pub exp: i64,
    #[serde(default)]
    pub roles: Vec<RoleClaim>,
}

impl AccessClaims {
    pub fn roles(&self) -> Vec<Role> {
        self.roles
            .iter()
            .map(|claim| Role {
                id: claim.id.clone(),
                value: claim.value.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn backend_token_reads_camel_case_refresh_token() {
        let token: BackendToken =
            serde_json::from_value(json!({"token": "a", "refreshToken": "r"})).unwrap();
        assert_eq!(token.access_token, "a");
        assert_eq!(token.refresh_token.as_deref(), Some("r"));

        let token: BackendToken = serde_json::from_value(json!({"token": "a"})).unwrap();
        assert!(token.refresh_token.is_none());
    }

    #[test]
    fn access_claims_project_roles_in_order() {
        let claims: AccessClaims = serde_json::from_value(json!({
            "id": 7,
            "exp": 1_700_000_000,
            "roles": [
                {"id": 1, "value": "USER", "description": "ignored"},
                {"id": 2, "value": "ADMIN"}
            ]
        }))
        .unwrap();
        let roles = claims.roles();
        assert_eq!(roles.len(), 2);
        assert_eq!(roles[0].value, "USER");
        assert_eq!(roles[1].id, ClaimId::Number(2));
    }
}
