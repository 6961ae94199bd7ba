use sha2::{Digest, Sha256};

const SHADOW_PASSWORD_DOMAIN: &str = "cinema-oauth-shadow:";

/// Suffix that turns an OAuth email into its shadow account login.
pub const SHADOW_EMAIL_SUFFIX: &str = ".oauth";

pub fn shadow_email(email: &str) -> String {
    format!("{}{}", email, SHADOW_EMAIL_SUFFIX)
}

/// Password of the shadow account that backs an OAuth identity.
///
/// Pure: the same email always yields the same password.
pub fn derive_password(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(SHADOW_PASSWORD_DOMAIN.as_bytes());
    hasher.update(email.as_bytes());
    hex::encode(hasher.finalize())
}
