use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{error::AuthError, models::token::AccessClaims, models::SessionRecord};

/// Reads the claims of a backend access token.
///
/// The token is signed by the auth backend with a key this service does not
/// hold, so only the payload is decoded. Expiry is not enforced here; the
/// refresh policy compares `exp` itself.
pub fn decode_access_claims(token: &str) -> Result<AccessClaims, AuthError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<AccessClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::ClaimDecode(e.to_string()))
}

/// Payload of the signed session cookie.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(flatten)]
    pub record: SessionRecord,
    pub iat: i64,
    pub exp: i64,
}

pub fn encode_session(
    record: &SessionRecord,
    secret: &str,
    max_age_secs: u64,
) -> anyhow::Result<String> {
    let now = Utc::now().timestamp();
    let claims = SessionClaims {
        record: record.clone(),
        iat: now,
        exp: now + max_age_secs as i64,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;

    Ok(token)
}

pub fn decode_session(token: &str, secret: &str) -> anyhow::Result<SessionRecord> {
    let validation = Validation::new(Algorithm::HS256);
    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )?;

    Ok(token_data.claims.record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClaimId, Provider, Role};
    use serde_json::json;

    fn backend_token(payload: serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS512),
            &payload,
            &EncodingKey::from_secret(b"backend-only-key"),
        )
        .expect("encode backend token")
    }

    fn record() -> SessionRecord {
        SessionRecord {
            provider: Provider::Database,
            user_id: ClaimId::Number(3),
            access_token: "access".into(),
            refresh_token: Some("refresh".into()),
            expires_at: 1_700_000_000,
            roles: vec![Role {
                id: ClaimId::Number(1),
                value: "USER".into(),
            }],
        }
    }

    #[test]
    fn decode_access_claims_ignores_foreign_signature_and_past_expiry() {
        let token = backend_token(json!({
            "id": 3,
            "exp": 1_000,
            "roles": [{"id": 1, "value": "USER"}]
        }));
        let claims = decode_access_claims(&token).expect("decode claims");
        assert_eq!(claims.id, ClaimId::Number(3));
        assert_eq!(claims.exp, 1_000);
        assert_eq!(claims.roles().len(), 1);
    }

    #[test]
    fn decode_access_claims_rejects_garbage() {
        let err = decode_access_claims("not-a-jwt").expect_err("garbage must fail");
        assert!(matches!(err, AuthError::ClaimDecode(_)));
    }

    #[test]
    fn decode_access_claims_requires_id_and_exp() {
        let token = backend_token(json!({"sub": "x"}));
        assert!(decode_access_claims(&token).is_err());
    }

    #[test]
    fn session_round_trips_with_matching_secret() {
        let token = encode_session(&record(), "secret", 60).expect("encode session");
        let decoded = decode_session(&token, "secret").expect("decode session");
        assert_eq!(decoded, record());
    }

    #[test]
    fn session_with_wrong_secret_is_rejected() {
        let token = encode_session(&record(), "secret", 60).expect("encode session");
        assert!(decode_session(&token, "other").is_err());
    }

    #[test]
    fn expired_session_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            record: record(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .expect("encode expired session");
        assert!(decode_session(&token, "secret").is_err());
    }
}
