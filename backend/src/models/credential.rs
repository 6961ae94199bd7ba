//! Credentials accepted by the session authority and the provider they map to.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Identity source a session was established through.
pub enum Provider {
    /// First-party account stored in the auth backend.
    Database,
    /// Google OAuth, backed by a shadow database account.
    Google,
    /// VK OAuth, exchanged through the VK bridge endpoint.
    Vk,
}

impl Provider {
    /// Returns the canonical lowercase tag used in URLs and session payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Database => "database",
            Provider::Google => "google",
            Provider::Vk => "vk",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single sign-in attempt. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    DatabaseLogin { email: String, password: String },
    DatabaseRegister { email: String, password: String },
    GoogleProfile { email: String },
    VkProfile { access_token: String, user_id: String },
}

impl Credential {
    pub fn provider(&self) -> Provider {
        match self {
            Credential::DatabaseLogin { .. } | Credential::DatabaseRegister { .. } => {
                Provider::Database
            }
            Credential::GoogleProfile { .. } => Provider::Google,
            Credential::VkProfile { .. } => Provider::Vk,
        }
    }
}

// Hand-written so passwords and provider tokens never reach the logs.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::DatabaseLogin { email, .. } => f
                .debug_struct("DatabaseLogin")
                .field("email", email)
                .finish_non_exhaustive(),
            Credential::DatabaseRegister { email, .. } => f
                .debug_struct("DatabaseRegister")
                .field("email", email)
                .finish_non_exhaustive(),
            Credential::GoogleProfile { email } => f
                .debug_struct("GoogleProfile")
                .field("email", email)
                .finish(),
            Credential::VkProfile { user_id, .. } => f
                .debug_struct("VkProfile")
                .field("user_id", user_id)
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_tag_matches_serialized_form() {
        for provider in [Provider::Database, Provider::Google, Provider::Vk] {
            assert_eq!(serde_json::to_value(provider).unwrap(), provider.as_str());
            assert_eq!(provider.to_string(), provider.as_str());
        }
    }

    #[test]
    fn provider_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Provider::Vk).unwrap(), "vk");
    }

    #[test]
    fn credential_debug_hides_secrets() {
        let credential = Credential::DatabaseLogin {
            email: "user@example.com".into(),
            password: "hunter2".into(),
        };
        let rendered = format!("{:?}", credential);
        assert!(rendered.contains("user@example.com"));
        assert!(!rendered.contains("hunter2"));
        assert_eq!(credential.provider(), Provider::Database);
    }
}
